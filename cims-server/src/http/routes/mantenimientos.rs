//! Maintenance endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;

use super::message;
use crate::db::{MantenimientoRepo, Row};
use crate::http::error::ApiError;
use crate::http::extractors::ApiJson;
use crate::http::server::AppState;
use crate::models::{today, MantenimientoRequest};

const NOT_FOUND: &str = "Incidencia no encontrada";

/// GET /api/mantenimientos
async fn list_mantenimientos(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Row>>, ApiError> {
    Ok(Json(MantenimientoRepo::new(state.store.as_ref()).list().await?))
}

/// POST /api/mantenimientos/iniciar
async fn start(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<MantenimientoRequest>,
) -> Result<Json<Value>, ApiError> {
    let params = body.start_params(&today())?;
    let affected = MantenimientoRepo::new(state.store.as_ref())
        .start(params)
        .await?;
    if affected == 0 {
        return Err(ApiError::not_found(NOT_FOUND));
    }
    Ok(message("✅ Mantenimiento iniciado"))
}

/// POST /api/mantenimientos/finalizar
async fn finish(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<MantenimientoRequest>,
) -> Result<Json<Value>, ApiError> {
    let params = body.finish_params(&today())?;
    let affected = MantenimientoRepo::new(state.store.as_ref())
        .finish(params)
        .await?;
    if affected == 0 {
        return Err(ApiError::not_found(NOT_FOUND));
    }
    Ok(message("✅ Mantenimiento finalizado"))
}

/// Maintenance routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/mantenimientos", get(list_mantenimientos))
        .route("/api/mantenimientos/iniciar", post(start))
        .route("/api/mantenimientos/finalizar", post(finish))
}
