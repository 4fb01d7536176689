//! Database driver error mapping
//!
//! Turns a raw MySQL failure into the status/message pair the service
//! reports. Only four server errors get a specific treatment; everything
//! else is a generic database failure.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix shared by every symbolic MySQL server error name
pub const DRIVER_CODE_PREFIX: &str = "ER_";

pub const ER_DUP_ENTRY: &str = "ER_DUP_ENTRY";
pub const ER_NO_REFERENCED_ROW_2: &str = "ER_NO_REFERENCED_ROW_2";
pub const ER_ROW_IS_REFERENCED_2: &str = "ER_ROW_IS_REFERENCED_2";
pub const ER_BAD_NULL_ERROR: &str = "ER_BAD_NULL_ERROR";
pub const ER_DATA_TOO_LONG: &str = "ER_DATA_TOO_LONG";

/// Message used when the caller does not supply one
pub const DEFAULT_DB_MESSAGE: &str = "Error de base de datos";

/// Extracts the offending key from a duplicate-entry message.
static DUPLICATE_ENTRY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Duplicate entry '(.+?)' for key '(.+?)'").expect("invalid duplicate entry regex")
});

/// A failure reported by the database driver, before any interpretation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverError {
    /// Symbolic server error name (`ER_DUP_ENTRY`, ...), absent for
    /// transport/pool failures that never reached the server.
    pub code: Option<String>,
    /// Message as reported by the server or the driver
    pub message: String,
}

impl DriverError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }

    /// A driver failure without a server error code (connection, pool, decode).
    pub fn uncoded(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub fn is_duplicate_entry(&self) -> bool {
        self.code() == Some(ER_DUP_ENTRY)
    }
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.code {
            Some(code) => write!(f, "{}: {}", code, self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for DriverError {}

/// What kind of database failure a mapping produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DbErrorCategory {
    Conflict,
    Constraint,
    Validation,
    Database,
}

/// Interpreted driver failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbErrorInfo {
    pub status: u16,
    pub message: String,
    pub category: DbErrorCategory,
}

/// Symbolic name for a MySQL server error number.
///
/// Unknown numbers render as `ER_<number>` so they still carry the driver prefix.
pub fn mysql_code_name(number: u16) -> String {
    let name = match number {
        1045 => "ER_ACCESS_DENIED_ERROR",
        1048 => ER_BAD_NULL_ERROR,
        1054 => "ER_BAD_FIELD_ERROR",
        1062 => ER_DUP_ENTRY,
        1064 => "ER_PARSE_ERROR",
        1146 => "ER_NO_SUCH_TABLE",
        1205 => "ER_LOCK_WAIT_TIMEOUT",
        1213 => "ER_LOCK_DEADLOCK",
        1292 => "ER_TRUNCATED_WRONG_VALUE",
        1305 => "ER_SP_DOES_NOT_EXIST",
        1318 => "ER_SP_WRONG_NO_OF_ARGS",
        1364 => "ER_NO_DEFAULT_FOR_FIELD",
        1366 => "ER_TRUNCATED_WRONG_VALUE_FOR_FIELD",
        1406 => ER_DATA_TOO_LONG,
        1451 => ER_ROW_IS_REFERENCED_2,
        1452 => ER_NO_REFERENCED_ROW_2,
        1644 => "ER_SIGNAL_EXCEPTION",
        other => return format!("{}{}", DRIVER_CODE_PREFIX, other),
    };
    name.to_owned()
}

/// Map a driver failure to a status and user message.
pub fn map_driver_error(error: &DriverError, default_message: &str) -> DbErrorInfo {
    match error.code() {
        Some(ER_DUP_ENTRY) => {
            let field = DUPLICATE_ENTRY_RE
                .captures(&error.message)
                .and_then(|caps| caps.get(2))
                .map_or("campo", |m| m.as_str());
            DbErrorInfo {
                status: 409,
                message: format!("El {} ya existe", field),
                category: DbErrorCategory::Conflict,
            }
        }
        Some(ER_NO_REFERENCED_ROW_2) | Some(ER_ROW_IS_REFERENCED_2) => DbErrorInfo {
            status: 400,
            message: "No se puede realizar la operación debido a referencias en otras tablas"
                .to_owned(),
            category: DbErrorCategory::Constraint,
        },
        Some(ER_BAD_NULL_ERROR) => DbErrorInfo {
            status: 400,
            message: "Faltan campos obligatorios".to_owned(),
            category: DbErrorCategory::Validation,
        },
        Some(ER_DATA_TOO_LONG) => DbErrorInfo {
            status: 400,
            message: "Los datos exceden el tamaño máximo permitido".to_owned(),
            category: DbErrorCategory::Validation,
        },
        _ => DbErrorInfo {
            status: 500,
            message: default_message.to_owned(),
            category: DbErrorCategory::Database,
        },
    }
}
