//! Custom Axum extractors
//!
//! Rejections are turned into [`ApiError`]s so that malformed bodies, bad
//! path segments and missing sessions go through the same classification
//! as every other failure.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{FromRequest, FromRequestParts, Json, Path, Request};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use super::auth::{Claims, TokenError, ADMIN_REQUIRED};
use super::error::ApiError;
use crate::models::ValidationError;

/// JSON body; parse failures are Validation errors
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e: JsonRejection| {
                ApiError::Validation(ValidationError::Malformed {
                    reason: e.body_text(),
                })
            })?;
        Ok(Self(value))
    }
}

/// Path parameters; a mismatch is a Validation error
pub struct ApiPath<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e: PathRejection| {
                ApiError::Validation(ValidationError::Malformed {
                    reason: e.body_text(),
                })
            })?;
        Ok(Self(value))
    }
}

/// Claims of the authenticated caller, set by `require_auth`
pub struct AuthUser(pub Claims);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(Self)
            .ok_or(ApiError::Token(TokenError::Missing))
    }
}

/// Authenticated caller with the admin flag set
pub struct AdminUser(pub Claims);

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthUser(claims) = AuthUser::from_request_parts(parts, state).await?;
        if !claims.administrador {
            return Err(ApiError::forbidden(ADMIN_REQUIRED));
        }
        Ok(Self(claims))
    }
}
