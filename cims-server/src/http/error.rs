//! API error type
//!
//! Handlers return `Result<_, ApiError>`. An `ApiError` never decides the
//! final status or message itself: it describes the failure as a
//! [`RawError`] and the error responder classifies it with the configured
//! environment. The response built here is the production-safe rendering,
//! used as-is only if the responder layer is missing.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use cims_core::{classify, Environment, RawError};
use serde_json::json;

use crate::db::DbFailure;
use crate::http::auth::TokenError;
use crate::models::ValidationError;

/// Failure description waiting for the error responder
#[derive(Debug, Clone)]
pub struct PendingError(pub RawError);

#[derive(Debug)]
pub enum ApiError {
    /// Bad or missing input (400)
    Validation(ValidationError),

    /// Lookup found nothing (404)
    NotFound { message: String },

    /// Unique constraint hit (409)
    Conflict { message: String },

    /// No or wrong credentials (401)
    Unauthenticated { message: String },

    /// Token could not be verified or issued
    Token(TokenError),

    /// Authenticated but not allowed (403)
    Forbidden { message: String },

    /// Failed database call, already mapped by the shim
    Database(DbFailure),

    /// Expected failure with a message safe to show in any environment
    Operational { status: u16, message: String },

    /// Programming or infrastructure error
    Internal(RawError),
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::Unauthenticated {
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    pub fn operational(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Operational {
            status: status.as_u16(),
            message: message.into(),
        }
    }

    /// Wrap any error as an internal failure, keeping its source chain.
    pub fn internal(error: &(dyn std::error::Error + 'static)) -> Self {
        Self::Internal(RawError::from_error(error))
    }

    /// Describe this failure for the classifier.
    pub fn to_raw(&self) -> RawError {
        match self {
            Self::Validation(e) => {
                let raw = RawError::named("ValidationError", e.to_string());
                match e {
                    ValidationError::InvalidVariant {
                        field,
                        value,
                        allowed,
                    } => raw.with_details(json!({
                        "field": field,
                        "value": value,
                        "allowed": allowed,
                    })),
                    _ => raw,
                }
            }
            Self::NotFound { message } => RawError::named("NotFoundError", message.clone()),
            Self::Conflict { message } => RawError::named("ConflictError", message.clone()),
            Self::Unauthenticated { message } => {
                RawError::named("AuthenticationError", message.clone())
            }
            Self::Token(e) => e.to_raw(),
            Self::Forbidden { message } => RawError::named("AuthorizationError", message.clone()),
            Self::Database(failure) => failure.to_raw(),
            Self::Operational { status, message } => RawError::new(message.clone())
                .with_status_code(*status)
                .operational(),
            Self::Internal(raw) => raw.clone(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let raw = self.to_raw();
        let classified = classify(&raw, Environment::Production);
        let status =
            StatusCode::from_u16(classified.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let mut response = (status, Json(classified.to_body())).into_response();
        response.extensions_mut().insert(PendingError(raw));
        response
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<DbFailure> for ApiError {
    fn from(e: DbFailure) -> Self {
        Self::Database(e)
    }
}

impl From<TokenError> for ApiError {
    fn from(e: TokenError) -> Self {
        Self::Token(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use cims_core::DriverError;
    use serde_json::Value;

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn validation_error_is_400() {
        let err = ApiError::Validation(ValidationError::required("Faltan campos obligatorios"));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(response.extensions().get::<PendingError>().is_some());

        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Faltan campos obligatorios");
    }

    #[tokio::test]
    async fn not_found_is_404() {
        let response = ApiError::not_found("Activo no encontrado").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn forbidden_is_403() {
        let response = ApiError::forbidden("Acceso denegado").into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn default_rendering_hides_database_detail() {
        let failure = DbFailure::from_driver(DriverError::new("ER_LOCK_DEADLOCK", "Deadlock found"));
        let response = ApiError::Database(failure).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["error"], "Error interno del servidor");
        assert!(body.get("stack").is_none());
    }

    #[test]
    fn invalid_variant_carries_details() {
        let raw = ApiError::Validation(ValidationError::InvalidVariant {
            field: "Estado",
            value: "Roto".into(),
            allowed: &["Disponible", "Pérdida"],
        })
        .to_raw();
        assert_eq!(raw.details.unwrap()["value"], "Roto");
    }

    #[test]
    fn operational_keeps_status() {
        let raw = ApiError::operational(StatusCode::BAD_GATEWAY, "upstream").to_raw();
        assert!(raw.is_operational);
        assert_eq!(raw.incoming_status(), 502);
    }
}
