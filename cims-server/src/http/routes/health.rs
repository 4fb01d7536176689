//! Liveness and database reachability

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

use crate::db::Statement;
use crate::http::error::ApiError;
use crate::http::server::AppState;

const DATABASE_UNAVAILABLE: &str = "Base de datos no disponible";

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
    pub environment: String,
    pub version: &'static str,
}

/// GET /health
///
/// 503 when `SELECT 1` does not come back; the cause is only logged.
async fn health(State(state): State<Arc<AppState>>) -> Result<Json<HealthResponse>, ApiError> {
    if let Err(failure) = state.store.fetch(&Statement::new("SELECT 1 AS ok")).await {
        tracing::warn!(error = %failure.info.message, "database unreachable");
        return Err(ApiError::operational(
            StatusCode::SERVICE_UNAVAILABLE,
            DATABASE_UNAVAILABLE,
        ));
    }

    Ok(Json(HealthResponse {
        status: "ok",
        database: "ok",
        environment: state.environment.to_string(),
        version: env!("CARGO_PKG_VERSION"),
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health))
}
