//! Error classification
//!
//! Every failed request ends up here: a [`RawError`] describing what went
//! wrong is turned into a [`ClassifiedError`] carrying the HTTP status and
//! the message the client is allowed to see. Classification is a pure
//! function of the error and the [`Environment`].

mod rules;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::error::Error as StdError;
use std::fmt;

use crate::config::Environment;
use crate::driver::{map_driver_error, DriverError, DEFAULT_DB_MESSAGE};

/// Message shown instead of internal detail
pub const GENERIC_MESSAGE: &str = "Error interno del servidor";

/// Fixed message for expired tokens
pub const TOKEN_EXPIRED_MESSAGE: &str = "Token expirado";

/// Error taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Authentication,
    TokenExpired,
    Authorization,
    NotFound,
    Conflict,
    Database,
    Operational,
    Unknown,
}

impl ErrorKind {
    /// Label used for the operational log line
    pub fn log_label(&self) -> &'static str {
        match self {
            Self::Validation => "Error de validación",
            Self::Authentication => "Error de autenticación",
            Self::TokenExpired => "Token expirado",
            Self::Authorization => "Error de autorización",
            Self::NotFound => "Recurso no encontrado",
            Self::Conflict => "Error de conflicto",
            Self::Database => "Error de base de datos",
            Self::Operational => "Error operacional",
            Self::Unknown => "Error desconocido",
        }
    }

    /// Kinds whose detail is hidden from clients in production
    pub fn is_sensitive(&self) -> bool {
        matches!(self, Self::Database | Self::Unknown)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.log_label())
    }
}

/// Loose description of a failure, as produced by handlers, extractors and
/// the database shim. Field names follow the JSON shape used on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawError {
    pub name: Option<String>,
    pub code: Option<String>,
    pub status_code: Option<u16>,
    pub status: Option<u16>,
    pub message: Option<String>,
    pub is_database: bool,
    pub is_operational: bool,
    pub details: Option<Value>,
    pub stack: Option<String>,
}

impl RawError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn named(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            message: Some(message.into()),
            ..Self::default()
        }
    }

    /// Build from any Rust error; the source chain becomes the stack.
    pub fn from_error(error: &(dyn StdError + 'static)) -> Self {
        Self {
            message: Some(error.to_string()),
            stack: Some(render_chain(error)),
            ..Self::default()
        }
    }

    /// Rejection produced by the database shim for a driver failure.
    pub fn from_driver(error: &DriverError) -> Self {
        let info = map_driver_error(error, DEFAULT_DB_MESSAGE);
        Self {
            code: error.code.clone(),
            status_code: Some(info.status),
            message: Some(info.message),
            is_database: true,
            stack: Some(error.to_string()),
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_status_code(mut self, status: u16) -> Self {
        self.status_code = Some(status);
        self
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    pub fn database(mut self) -> Self {
        self.is_database = true;
        self
    }

    pub fn operational(mut self) -> Self {
        self.is_operational = true;
        self
    }

    /// `statusCode`, then `status`, then 500.
    pub fn incoming_status(&self) -> u16 {
        self.status_code.or(self.status).unwrap_or(500)
    }

    pub(crate) fn has_name(&self, name: &str) -> bool {
        self.name.as_deref() == Some(name)
    }

    fn message_or_default(&self) -> String {
        self.message
            .clone()
            .unwrap_or_else(|| GENERIC_MESSAGE.to_owned())
    }

    fn debug_info(&self) -> DebugInfo {
        let name = self.name.clone().unwrap_or_else(|| "Error".to_owned());
        let stack = self
            .stack
            .clone()
            .unwrap_or_else(|| format!("{}: {}", name, self.message_or_default()));
        DebugInfo {
            name,
            code: self.code.clone(),
            stack,
        }
    }
}

impl fmt::Display for RawError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.name, &self.message) {
            (Some(name), Some(msg)) => write!(f, "{}: {}", name, msg),
            (None, Some(msg)) => f.write_str(msg),
            (Some(name), None) => f.write_str(name),
            (None, None) => f.write_str(GENERIC_MESSAGE),
        }
    }
}

/// Internal detail exposed only outside production
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DebugInfo {
    pub name: String,
    pub code: Option<String>,
    pub stack: String,
}

/// Result of classification: consumed once by the response writer.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedError {
    pub kind: ErrorKind,
    pub status: u16,
    pub message: String,
    pub details: Option<Value>,
    pub debug: Option<DebugInfo>,
}

impl ClassifiedError {
    pub fn is_sensitive(&self) -> bool {
        self.kind.is_sensitive()
    }

    /// Response body: `{success: false, error, ...}`
    pub fn to_body(&self) -> Value {
        let mut body = Map::new();
        body.insert("success".into(), Value::Bool(false));
        body.insert("error".into(), Value::String(self.message.clone()));
        if let Some(details) = &self.details {
            body.insert("details".into(), details.clone());
        }
        if let Some(debug) = &self.debug {
            body.insert("name".into(), json!(debug.name));
            body.insert("stack".into(), json!(debug.stack));
            if let Some(code) = &debug.code {
                body.insert("code".into(), json!(code));
            }
        }
        Value::Object(body)
    }
}

/// Classify `error` for `env`.
///
/// Pure: the same input and environment always give the same output.
pub fn classify(error: &RawError, env: Environment) -> ClassifiedError {
    let kind = rules::first_match(error);
    let production = env.is_production();

    let (status, message) = match kind {
        ErrorKind::Validation => (400, error.message_or_default()),
        ErrorKind::Authentication => (401, error.message_or_default()),
        ErrorKind::TokenExpired => (401, TOKEN_EXPIRED_MESSAGE.to_owned()),
        ErrorKind::Authorization => (403, error.message_or_default()),
        ErrorKind::NotFound => (404, error.message_or_default()),
        ErrorKind::Conflict => (409, error.message_or_default()),
        ErrorKind::Operational => (error.incoming_status(), error.message_or_default()),
        ErrorKind::Database | ErrorKind::Unknown if production => (500, GENERIC_MESSAGE.to_owned()),
        ErrorKind::Database | ErrorKind::Unknown => (500, error.message_or_default()),
    };

    let details = match kind {
        ErrorKind::Validation => error.details.clone(),
        _ => None,
    };

    let debug = (kind.is_sensitive() && !production).then(|| error.debug_info());

    ClassifiedError {
        kind,
        status,
        message,
        details,
        debug,
    }
}

/// Render an error and its sources, one per line.
pub fn render_chain(error: &(dyn StdError + 'static)) -> String {
    let mut out = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        out.push_str("\n    caused by: ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}
