//! Asset endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use futures::future::join_all;
use serde_json::{json, Value};

use super::message;
use crate::db::{ActivoRepo, Row};
use crate::http::error::ApiError;
use crate::http::extractors::{ApiJson, ApiPath};
use crate::http::server::AppState;
use crate::models::scalar::truthy;
use crate::models::{
    non_blank, today, ActivoInput, AsignarRequest, AssetStatus, EstadoRequest, OneOrMany,
    ValidationError,
};

const NOT_FOUND: &str = "Activo no encontrado";

/// POST /api/activos - one asset or an array of them
///
/// Every element is inserted independently: a failure is logged and
/// counted but does not undo the others.
async fn create_activos(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<OneOrMany<ActivoInput>>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let activos = body.into_vec();
    if activos.is_empty() {
        return Err(ValidationError::required("Se requiere al menos un activo").into());
    }

    let today = today();
    let repo = ActivoRepo::new(state.store.as_ref());
    let results = join_all(
        activos
            .iter()
            .map(|activo| repo.insert(activo.insert_params(&today))),
    )
    .await;

    let mut insertados = 0usize;
    let mut errores = 0usize;
    for (index, result) in results.into_iter().enumerate() {
        match result {
            Ok(_) => insertados += 1,
            Err(e) => {
                errores += 1;
                tracing::error!(
                    index = index + 1,
                    code = e.driver.code().unwrap_or("-"),
                    "error al registrar activo: {}",
                    e.driver
                );
            }
        }
    }

    if errores > 0 {
        return Ok((
            StatusCode::INTERNAL_SERVER_ERROR,
            message(format!(
                "Activos procesados: {}. Insertados: {}. Errores: {}",
                activos.len(),
                insertados,
                errores
            )),
        ));
    }

    Ok((
        StatusCode::CREATED,
        message(format!(
            "✅ Todos los activos ({}) registrados exitosamente.",
            insertados
        )),
    ))
}

/// GET /api/activos
async fn list_activos(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Row>>, ApiError> {
    Ok(Json(ActivoRepo::new(state.store.as_ref()).list().await?))
}

/// GET /api/activos/numero-serie/{item_code}
async fn get_by_item_code(
    State(state): State<Arc<AppState>>,
    ApiPath(item_code): ApiPath<String>,
) -> Result<Json<Row>, ApiError> {
    ActivoRepo::new(state.store.as_ref())
        .find_by_item_code(&item_code)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))
}

/// GET /api/activos/{id}
async fn get_activo(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<String>,
) -> Result<Json<Row>, ApiError> {
    ActivoRepo::new(state.store.as_ref())
        .find_by_id(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))
}

/// GET /api/activos/{id}/empleado
async fn get_assigned_employee(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<String>,
) -> Result<Json<Row>, ApiError> {
    ActivoRepo::new(state.store.as_ref())
        .assigned_employee(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("No hay empleado asignado a este activo"))
}

/// PUT /api/activos/{id}
async fn update_activo(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<String>,
    ApiJson(body): ApiJson<ActivoInput>,
) -> Result<Json<Value>, ApiError> {
    let affected = ActivoRepo::new(state.store.as_ref())
        .update(body.update_params(&id))
        .await?;
    if affected == 0 {
        return Err(ApiError::not_found(NOT_FOUND));
    }
    Ok(message("✅ Activo actualizado exitosamente"))
}

/// PUT /api/activos/{id}/estado
async fn update_estado(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<String>,
    ApiJson(body): ApiJson<EstadoRequest>,
) -> Result<Json<Value>, ApiError> {
    let estado = AssetStatus::parse(body.estado.as_deref())?;
    let affected = ActivoRepo::new(state.store.as_ref())
        .set_status(&id, estado.as_str())
        .await?;
    if affected == 0 {
        return Err(ApiError::not_found(NOT_FOUND));
    }
    Ok(message("✅ Estado del activo actualizado exitosamente"))
}

/// POST /api/activos/{id}/asignar
async fn asignar_activo(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<String>,
    ApiJson(body): ApiJson<AsignarRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let (Some(empleado_id), Some(fecha)) = (
        truthy(body.empleado_id.as_ref()),
        non_blank(body.fecha_asignacion.as_deref()),
    ) else {
        return Err(ValidationError::required("empleado_id y fecha_asignacion son requeridos").into());
    };

    ActivoRepo::new(state.store.as_ref())
        .assign(&id, empleado_id.into(), fecha)
        .await?;
    Ok((StatusCode::CREATED, message("✅ Activo asignado exitosamente")))
}

/// GET /api/activos/por-empleado/{empleado_id}
async fn get_by_employee(
    State(state): State<Arc<AppState>>,
    ApiPath(empleado_id): ApiPath<String>,
) -> Result<Json<Value>, ApiError> {
    let found = ActivoRepo::new(state.store.as_ref())
        .find_by_employee(&empleado_id)
        .await?;
    Ok(Json(match found {
        Some(row) => Value::Object(row),
        None => json!({ "nombre_activo": "Desconocido" }),
    }))
}

/// Asset routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/activos", post(create_activos).get(list_activos))
        .route("/api/activos/numero-serie/{item_code}", get(get_by_item_code))
        .route("/api/activos/por-empleado/{empleado_id}", get(get_by_employee))
        .route("/api/activos/{id}", get(get_activo).put(update_activo))
        .route("/api/activos/{id}/empleado", get(get_assigned_employee))
        .route("/api/activos/{id}/estado", put(update_estado))
        .route("/api/activos/{id}/asignar", post(asignar_activo))
}
