//! Employee endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};

use super::message;
use crate::db::{EmpleadoRepo, Row};
use crate::http::error::ApiError;
use crate::http::extractors::{AdminUser, ApiJson, ApiPath};
use crate::http::server::AppState;
use crate::models::scalar::truthy;
use crate::models::{today, EmpleadoUpdate, NewEmpleado};

/// GET /api/empleados
async fn list_empleados(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Row>>, ApiError> {
    Ok(Json(EmpleadoRepo::new(state.store.as_ref()).list().await?))
}

/// GET /api/empleados/{id}
async fn get_empleado(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<String>,
) -> Result<Json<Row>, ApiError> {
    EmpleadoRepo::new(state.store.as_ref())
        .find_by_id(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Empleado no encontrado"))
}

/// POST /api/empleados - admin only; creates the employee and its area
/// assignment in one procedure call
async fn create_empleado(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    ApiJson(body): ApiJson<NewEmpleado>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let params = body.create_params(&today())?;
    let created = EmpleadoRepo::new(state.store.as_ref())
        .create_with_area(params)
        .await?;
    let empleado_id = created
        .and_then(|mut row| row.remove("empleado_id"))
        .unwrap_or(Value::Null);

    tracing::info!(by = %admin.username, empleado_id = %empleado_id, "employee created");
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "✅ Empleado y asignación registrados correctamente.",
            "empleado_id": empleado_id,
        })),
    ))
}

/// PUT /api/empleados/{id}
///
/// Personal data first; the area of the active assignment second. A
/// failure on the second step is logged and does not fail the request.
async fn update_empleado(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<String>,
    ApiJson(body): ApiJson<EmpleadoUpdate>,
) -> Result<Json<Value>, ApiError> {
    let repo = EmpleadoRepo::new(state.store.as_ref());
    repo.update_personal(
        &id,
        body.nombre.as_deref(),
        body.correo.as_deref(),
        body.fecha_ingreso.as_deref(),
    )
    .await?;

    if let Some(area_id) = truthy(body.area_id.as_ref()) {
        if let Err(e) = repo.update_active_area(&id, area_id.into()).await {
            tracing::error!(empleado_id = %id, "error al actualizar área del empleado: {}", e);
        }
    }

    Ok(message("✅ Empleado y área actualizados correctamente"))
}

/// Employee routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/empleados", get(list_empleados).post(create_empleado))
        .route("/api/empleados/{id}", get(get_empleado).put(update_empleado))
}
