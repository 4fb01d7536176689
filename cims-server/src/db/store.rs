//! Statement shim
//!
//! `Store` is the seam between handlers and the database: one call, one
//! result. A failed call never escapes as a bare driver error; it is
//! wrapped in a [`DbFailure`] that already carries the mapped status and
//! message while keeping the driver error for the log.

use std::borrow::Cow;
use std::fmt;

use async_trait::async_trait;
use cims_core::driver::DEFAULT_DB_MESSAGE;
use cims_core::{map_driver_error, DbErrorInfo, DriverError, RawError};
use serde_json::{Map, Value};

/// One result row, column name to value
pub type Row = Map<String, Value>;

/// Positional statement parameter
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
}

impl From<&str> for Param {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

impl From<String> for Param {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<i64> for Param {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Param {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for Param {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl<T: Into<Param>> From<Option<T>> for Param {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

/// SQL text plus its bound parameters
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    sql: Cow<'static, str>,
    params: Vec<Param>,
}

impl Statement {
    pub fn new(sql: impl Into<Cow<'static, str>>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// `CALL procedure(?, ?, ...)` with one placeholder per parameter.
    pub fn call(procedure: &str, params: Vec<Param>) -> Self {
        let placeholders = vec!["?"; params.len()].join(", ");
        Self {
            sql: Cow::Owned(format!("CALL {}({})", procedure, placeholders)),
            params,
        }
    }

    pub fn bind(mut self, param: impl Into<Param>) -> Self {
        self.params.push(param.into());
        self
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// Procedure name for `CALL` statements
    pub fn procedure(&self) -> Option<&str> {
        let rest = self.sql.trim_start().strip_prefix("CALL ")?;
        rest.split('(').next().map(str::trim)
    }
}

/// A failed database call, already mapped for the client.
#[derive(Debug, Clone)]
pub struct DbFailure {
    pub info: DbErrorInfo,
    pub driver: DriverError,
}

impl DbFailure {
    pub fn from_driver(driver: DriverError) -> Self {
        let info = map_driver_error(&driver, DEFAULT_DB_MESSAGE);
        tracing::debug!(
            code = driver.code().unwrap_or("-"),
            status = info.status,
            "database call failed: {}",
            driver.message
        );
        Self { info, driver }
    }

    pub fn is_duplicate_entry(&self) -> bool {
        self.driver.is_duplicate_entry()
    }

    /// Shape handed to the classifier: mapped status and message,
    /// `isDatabase`, driver code, driver message as stack.
    pub fn to_raw(&self) -> RawError {
        RawError::from_driver(&self.driver)
    }
}

impl fmt::Display for DbFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.info.message, self.driver)
    }
}

impl std::error::Error for DbFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.driver)
    }
}

/// Database access used by every handler.
#[async_trait]
pub trait Store: Send + Sync {
    /// Run a statement and collect its rows.
    async fn fetch(&self, statement: &Statement) -> Result<Vec<Row>, DbFailure>;

    /// Run a statement and report affected rows.
    async fn execute(&self, statement: &Statement) -> Result<u64, DbFailure>;

    /// First row, if any.
    async fn fetch_first(&self, statement: &Statement) -> Result<Option<Row>, DbFailure> {
        Ok(self.fetch(statement).await?.into_iter().next())
    }
}
