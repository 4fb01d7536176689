//! Assignment endpoints

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};

use crate::db::{AsignacionRepo, Row};
use crate::http::error::ApiError;
use crate::http::extractors::ApiPath;
use crate::http::server::AppState;

/// GET /api/asignaciones - active assignments only
async fn list_active(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Row>>, ApiError> {
    Ok(Json(
        AsignacionRepo::new(state.store.as_ref())
            .list_active()
            .await?,
    ))
}

/// GET /api/asignaciones/empleado/{empleado_id}
async fn list_for_employee(
    State(state): State<Arc<AppState>>,
    ApiPath(empleado_id): ApiPath<String>,
) -> Result<Json<Vec<Row>>, ApiError> {
    Ok(Json(
        AsignacionRepo::new(state.store.as_ref())
            .list_for_employee(&empleado_id)
            .await?,
    ))
}

/// Assignment routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/asignaciones", get(list_active))
        .route("/api/asignaciones/empleado/{empleado_id}", get(list_for_employee))
}
