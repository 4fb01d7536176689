//! Session tokens
//!
//! HS256 JWTs carried either as `Authorization: Bearer <token>` or in the
//! `authToken` cookie set at login.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use chrono::Utc;
use cims_core::RawError;
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use super::server::AppState;
use crate::models::usuario::BCRYPT_COST;

pub const AUTH_COOKIE: &str = "authToken";

pub const ADMIN_REQUIRED: &str = "Acceso denegado: se requieren permisos de administrador";

/// Token payload; also what `GET /api/user` returns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub id: i64,
    pub username: String,
    pub correo: String,
    pub administrador: bool,
    pub iat: i64,
    pub exp: i64,
}

/// Who a token is issued for
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub id: i64,
    pub username: String,
    pub correo: String,
    pub administrador: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Token no proporcionado")]
    Missing,

    #[error("jwt expired")]
    Expired,

    #[error("invalid token: {0}")]
    Invalid(jsonwebtoken::errors::Error),

    #[error("could not sign token: {0}")]
    Encode(jsonwebtoken::errors::Error),
}

impl TokenError {
    /// `jsonwebtoken` failures use the names the classifier knows.
    pub fn to_raw(&self) -> RawError {
        match self {
            Self::Missing => RawError::named("AuthenticationError", self.to_string()),
            Self::Expired => RawError::named("TokenExpiredError", self.to_string()),
            Self::Invalid(_) => RawError::named("JsonWebTokenError", "Token inválido"),
            Self::Encode(_) => RawError::from_error(self),
        }
    }
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            JwtErrorKind::ExpiredSignature => Self::Expired,
            _ => Self::Invalid(e),
        }
    }
}

/// Issues and verifies session tokens
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl_secs: i64,
}

impl TokenService {
    pub fn new(secret: &str, ttl_hours: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl_secs: i64::try_from(ttl_hours.saturating_mul(3600)).unwrap_or(i64::MAX),
        }
    }

    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }

    pub fn issue(&self, identity: &Identity) -> Result<String, TokenError> {
        self.issue_at(identity, Utc::now().timestamp())
    }

    pub(crate) fn issue_at(&self, identity: &Identity, now: i64) -> Result<String, TokenError> {
        let claims = Claims {
            id: identity.id,
            username: identity.username.clone(),
            correo: identity.correo.clone(),
            administrador: identity.administrador,
            iat: now,
            exp: now.saturating_add(self.ttl_secs),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(TokenError::Encode)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        Ok(decode::<Claims>(token, &self.decoding, &self.validation)?.claims)
    }
}

/// Bearer header first, then the session cookie.
pub fn token_from_headers(headers: &HeaderMap) -> Option<&str> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());

    bearer.or_else(|| {
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(';'))
            .find_map(|pair| {
                let (name, value) = pair.trim().split_once('=')?;
                (name == AUTH_COOKIE && !value.is_empty()).then_some(value)
            })
    })
}

/// Reject requests without a valid token; valid claims are stored in the
/// request extensions for the `AuthUser` extractor.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = token_from_headers(request.headers()).ok_or(TokenError::Missing)?;
    let claims = state.tokens.verify(token)?;

    tracing::debug!(user = %claims.username, "authenticated request");
    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// Reject sessions without the administrator flag. Runs inside
/// [`require_auth`], which has already stored the claims.
pub async fn require_admin(request: Request, next: Next) -> Result<Response, ApiError> {
    let administrador = request
        .extensions()
        .get::<Claims>()
        .is_some_and(|claims| claims.administrador);
    if !administrador {
        return Err(ApiError::forbidden(ADMIN_REQUIRED));
    }
    Ok(next.run(request).await)
}

/// `Set-Cookie` value for a freshly issued token
pub fn session_cookie(token: &str, max_age_secs: i64, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Strict; Max-Age={}",
        AUTH_COOKIE, token, max_age_secs
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// bcrypt hash on the blocking pool
pub async fn hash_password(plain: &str) -> Result<String, ApiError> {
    let plain = plain.to_owned();
    tokio::task::spawn_blocking(move || bcrypt::hash(plain, BCRYPT_COST))
        .await
        .map_err(|e| ApiError::internal(&e))?
        .map_err(|e| ApiError::internal(&e))
}

/// Compare against a stored bcrypt hash; a malformed hash never matches.
pub async fn verify_password(plain: &str, hash: &str) -> Result<bool, ApiError> {
    let (plain, hash) = (plain.to_owned(), hash.to_owned());
    let verified = tokio::task::spawn_blocking(move || bcrypt::verify(plain, &hash))
        .await
        .map_err(|e| ApiError::internal(&e))?;
    Ok(verified.unwrap_or_else(|e| {
        tracing::warn!("stored password hash is not valid bcrypt: {}", e);
        false
    }))
}
