//! Area endpoints

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde_json::Value;

use super::message;
use crate::db::{AreaRepo, Row};
use crate::http::error::ApiError;
use crate::http::extractors::{AdminUser, ApiJson};
use crate::http::server::AppState;
use crate::models::NewArea;

/// GET /api/areas
async fn list_areas(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Row>>, ApiError> {
    Ok(Json(AreaRepo::new(state.store.as_ref()).list().await?))
}

/// POST /api/areas - admin only
async fn create_area(
    State(state): State<Arc<AppState>>,
    AdminUser(_): AdminUser,
    ApiJson(body): ApiJson<NewArea>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let nombre = body.nombre()?;
    AreaRepo::new(state.store.as_ref())
        .create(nombre)
        .await
        .map_err(|e| {
            if e.is_duplicate_entry() {
                ApiError::conflict("El área ya existe")
            } else {
                e.into()
            }
        })?;
    Ok((StatusCode::CREATED, message("✅ Área creada exitosamente")))
}

/// Area routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/api/areas", get(list_areas).post(create_area))
}
