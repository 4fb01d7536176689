//! User account endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::Value;

use super::message;
use crate::db::{Row, UsuarioRepo};
use crate::http::auth::hash_password;
use crate::http::error::ApiError;
use crate::http::extractors::{ApiJson, ApiPath};
use crate::http::server::AppState;
use crate::models::{NewUsuario, UsuarioUpdate};

const NOT_FOUND: &str = "Usuario no encontrado";

/// GET /api/usuarios
async fn list_usuarios(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Row>>, ApiError> {
    Ok(Json(UsuarioRepo::new(state.store.as_ref()).list().await?))
}

/// GET /api/usuarios/noadmin
async fn list_non_admin(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Row>>, ApiError> {
    Ok(Json(
        UsuarioRepo::new(state.store.as_ref())
            .list_non_admin()
            .await?,
    ))
}

/// GET /api/usuarios/{correo}
async fn get_usuario(
    State(state): State<Arc<AppState>>,
    ApiPath(correo): ApiPath<String>,
) -> Result<Json<Row>, ApiError> {
    UsuarioRepo::new(state.store.as_ref())
        .find_by_email(&correo)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))
}

/// POST /api/usuarios
async fn create_usuario(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<NewUsuario>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let (username, correo, contrasena) = body.credentials()?;
    let hash = hash_password(contrasena).await?;

    UsuarioRepo::new(state.store.as_ref())
        .create(username, correo, &hash, body.is_admin())
        .await
        .map_err(|e| {
            if e.is_duplicate_entry() {
                ApiError::conflict("El usuario o correo ya existe")
            } else {
                e.into()
            }
        })?;

    Ok((StatusCode::CREATED, message("Usuario registrado exitosamente")))
}

/// PUT /api/usuarios/{correo}
async fn update_usuario(
    State(state): State<Arc<AppState>>,
    ApiPath(correo): ApiPath<String>,
    ApiJson(body): ApiJson<UsuarioUpdate>,
) -> Result<Json<Value>, ApiError> {
    let hash = match body.new_password() {
        Some(plain) => Some(hash_password(plain).await?),
        None => None,
    };

    let affected = UsuarioRepo::new(state.store.as_ref())
        .update(&correo, body.username(), hash.as_deref(), body.admin_flag())
        .await?;
    if affected == 0 {
        return Err(ApiError::not_found(NOT_FOUND));
    }
    Ok(message("Usuario actualizado"))
}

/// DELETE /api/usuarios/{correo}
async fn delete_usuario(
    State(state): State<Arc<AppState>>,
    ApiPath(correo): ApiPath<String>,
) -> Result<Json<Value>, ApiError> {
    let affected = UsuarioRepo::new(state.store.as_ref())
        .delete(&correo)
        .await?;
    if affected == 0 {
        return Err(ApiError::not_found(NOT_FOUND));
    }
    Ok(message("Usuario eliminado"))
}

/// User routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/usuarios", get(list_usuarios).post(create_usuario))
        .route("/api/usuarios/noadmin", get(list_non_admin))
        .route(
            "/api/usuarios/{correo}",
            get(get_usuario).put(update_usuario).delete(delete_usuario),
        )
}
