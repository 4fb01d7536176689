//! Structured error types for cims-core.
//!
//! Library consumers get composable `thiserror` errors; the `cims` binary
//! wraps them in `anyhow` with context.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for cims-core operations
#[derive(Error, Debug)]
pub enum CoreError {
    /// I/O operation failed
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// Config file exists but is not valid TOML for `CimsConfig`
    #[error("Invalid config file {path:?}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// Required setting absent from file and environment
    #[error("Missing required setting '{name}'")]
    MissingSetting { name: &'static str },

    /// Setting present but unusable
    #[error("Invalid value for '{name}': {reason}")]
    InvalidSetting { name: &'static str, reason: String },
}

/// Result type alias for cims-core operations
pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    /// Create a config parse error
    pub fn config_parse(path: impl Into<PathBuf>, source: toml::de::Error) -> Self {
        Self::ConfigParse {
            path: path.into(),
            source,
        }
    }

    /// Create a missing setting error
    pub fn missing(name: &'static str) -> Self {
        Self::MissingSetting { name }
    }

    /// Create an invalid setting error
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidSetting {
            name,
            reason: reason.into(),
        }
    }
}
