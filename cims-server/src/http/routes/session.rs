//! Login and current-user endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    http::header::SET_COOKIE,
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use crate::db::{Row, UsuarioRepo};
use crate::http::auth::{session_cookie, verify_password, Identity};
use crate::http::error::ApiError;
use crate::http::extractors::{ApiJson, AuthUser};
use crate::http::rate_limit::{limit_requests, ClientLimiter};
use crate::http::server::AppState;
use crate::models::LoginRequest;

const INVALID_CREDENTIALS: &str = "Credenciales inválidas";

/// POST /api/login
///
/// Answers with the token in the body and as an HttpOnly cookie.
async fn login(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (identifier, password) = body.credentials()?;

    let row = UsuarioRepo::new(state.store.as_ref())
        .find_for_login(identifier)
        .await?
        .ok_or_else(|| ApiError::unauthenticated(INVALID_CREDENTIALS))?;
    let hash = row
        .get("contrasena")
        .and_then(Value::as_str)
        .ok_or_else(|| ApiError::unauthenticated(INVALID_CREDENTIALS))?;

    if !verify_password(password, hash).await? {
        tracing::warn!(identifier, "failed login");
        return Err(ApiError::unauthenticated(INVALID_CREDENTIALS));
    }

    let identity = identity_from_row(&row);
    let token = state.tokens.issue(&identity)?;
    let cookie = session_cookie(
        &token,
        state.tokens.ttl_secs(),
        state.environment.is_production(),
    );

    tracing::info!(user = %identity.username, "login");
    Ok((
        [(SET_COOKIE, cookie)],
        Json(json!({
            "message": "Login exitoso",
            "token": token,
            "user": {
                "id": identity.id,
                "username": identity.username,
                "correo": identity.correo,
                "administrador": identity.administrador,
            },
        })),
    ))
}

/// GET /api/user - claims of the current session
async fn current_user(AuthUser(claims): AuthUser) -> Json<Value> {
    Json(json!({ "user": claims }))
}

fn identity_from_row(row: &Row) -> Identity {
    let text = |key: &str| {
        row.get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned()
    };
    let administrador = match row.get("administrador") {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_i64() == Some(1),
        Some(Value::String(s)) => s == "1" || s == "true",
        _ => false,
    };

    Identity {
        id: row.get("id").and_then(Value::as_i64).unwrap_or_default(),
        username: text("username"),
        correo: text("correo"),
        administrador,
    }
}

/// Public session routes; login attempts are limited per client
pub fn router(login_limiter: ClientLimiter) -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/login", post(login))
        .route_layer(middleware::from_fn_with_state(login_limiter, limit_requests))
}

/// Session routes behind authentication
pub fn protected_router() -> Router<Arc<AppState>> {
    Router::new().route("/api/user", get(current_user))
}
