//! Centralised error responder
//!
//! The only place where a failure's HTTP status and client-visible message
//! are decided. Runs after the handler: if the response carries a
//! [`PendingError`], the error is classified for the configured
//! environment, logged, and the body is rendered again.

use std::any::Any;

use axum::extract::{Request, State};
use axum::http::{Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{SecondsFormat, Utc};
use cims_core::{classify, ClassifiedError, Environment, ErrorKind, RawError};

use super::error::{ApiError, PendingError};

pub async fn respond_to_errors(
    State(environment): State<Environment>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();

    let response = next.run(request).await;
    let Some(PendingError(raw)) = response.extensions().get::<PendingError>().cloned() else {
        return response;
    };

    let classified = classify(&raw, environment);
    log_error(&classified, &raw, &method, &path, environment);
    render(&classified)
}

fn render(classified: &ClassifiedError) -> Response {
    let status = StatusCode::from_u16(classified.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(classified.to_body())).into_response()
}

fn log_error(
    classified: &ClassifiedError,
    raw: &RawError,
    method: &Method,
    path: &str,
    environment: Environment,
) {
    // Unknown errors are programming errors: full detail in every environment
    let detailed = !environment.is_production() || classified.kind == ErrorKind::Unknown;
    let stack = raw.stack.as_deref().filter(|_| detailed);
    let code = raw.code.as_deref().filter(|_| detailed);
    let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    let label = classified.kind.log_label();

    if classified.status >= 500 {
        tracing::error!(
            kind = label,
            status = classified.status,
            path,
            method = %method,
            timestamp = %timestamp,
            stack,
            code,
            "{}",
            raw
        );
    } else {
        tracing::warn!(
            kind = label,
            status = classified.status,
            path,
            method = %method,
            timestamp = %timestamp,
            stack,
            code,
            "{}",
            raw
        );
    }
}

/// Response for a handler panic; classified as Unknown by the responder.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "handler panicked".to_owned()
    };

    ApiError::Internal(RawError::named("Panic", message.clone()).with_stack(format!("panic: {}", message)))
        .into_response()
}
