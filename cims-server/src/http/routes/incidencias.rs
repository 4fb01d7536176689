//! Incident endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::Value;

use super::message;
use crate::db::{IncidenciaRepo, Row};
use crate::http::error::ApiError;
use crate::http::extractors::{ApiJson, ApiPath, AuthUser};
use crate::http::server::AppState;
use crate::models::NewIncidencia;

/// GET /api/incidencias
async fn list_incidencias(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Row>>, ApiError> {
    Ok(Json(IncidenciaRepo::new(state.store.as_ref()).list().await?))
}

/// GET /api/incidencias/historico - joined view with maintenance state
async fn history(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Row>>, ApiError> {
    Ok(Json(IncidenciaRepo::new(state.store.as_ref()).history().await?))
}

/// GET /api/incidencias/{id}
async fn get_incidencia(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<String>,
) -> Result<Json<Row>, ApiError> {
    IncidenciaRepo::new(state.store.as_ref())
        .find_by_id(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Incidencia no encontrada"))
}

/// POST /api/incidencias
async fn create_incidencia(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    ApiJson(body): ApiJson<NewIncidencia>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let params = body.register_params()?;
    IncidenciaRepo::new(state.store.as_ref())
        .register(params)
        .await?;

    tracing::info!(by = %user.username, "incident registered");
    Ok((
        StatusCode::CREATED,
        message("✅ Incidencia registrada exitosamente"),
    ))
}

/// Incident routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/incidencias", get(list_incidencias).post(create_incidencia))
        .route("/api/incidencias/historico", get(history))
        .route("/api/incidencias/{id}", get(get_incidencia))
}
