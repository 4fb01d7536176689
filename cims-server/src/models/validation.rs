//! Validation error types
//!
//! Messages are shown to the client verbatim.

use std::fmt;

/// Validation error for request bodies and path parameters
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// One or more required fields are absent or empty
    Required { message: &'static str },

    /// Value outside the accepted set
    InvalidVariant {
        field: &'static str,
        value: String,
        allowed: &'static [&'static str],
    },

    /// Body or path could not be parsed at all
    Malformed { reason: String },
}

impl ValidationError {
    pub fn required(message: &'static str) -> Self {
        Self::Required { message }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required { message } => f.write_str(message),
            Self::InvalidVariant { field, allowed, .. } => {
                let quoted: Vec<String> = allowed.iter().map(|a| format!("\"{}\"", a)).collect();
                write!(f, "{} inválido. Debe ser {}.", field, quoted.join(" o "))
            }
            Self::Malformed { reason } => write!(f, "Solicitud inválida: {}", reason),
        }
    }
}

impl std::error::Error for ValidationError {}
