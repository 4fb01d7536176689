//! MySQL-backed [`Store`]
//!
//! Rows are converted to JSON by column type. DECIMAL values stay strings
//! (the driver reports them as text and callers expect them verbatim).

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};
use cims_core::{mysql_code_name, DriverError};
use serde_json::Value;
use std::str::FromStr;
use std::time::Duration;

use sqlx::mysql::{
    MySqlArguments, MySqlConnectOptions, MySqlDatabaseError, MySqlPoolOptions, MySqlRow,
};
use sqlx::query::Query;
use sqlx::{Column, MySql, MySqlPool, Row as _, TypeInfo, ValueRef};

use super::store::{DbFailure, Param, Row, Statement, Store};

/// Store over an sqlx MySQL pool
#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

/// Pool size when the configuration does not set one
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection options for a `mysql://` URL. Spanish text in procedure
/// messages needs utf8mb4.
pub fn connect_options(database_url: &str) -> Result<MySqlConnectOptions, sqlx::Error> {
    Ok(MySqlConnectOptions::from_str(database_url)?.charset("utf8mb4"))
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Open a pool of at most `max_connections` and wrap it.
    ///
    /// # Errors
    ///
    /// Fails on a malformed URL or when the first connection cannot be made.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = MySqlPoolOptions::new()
            .max_connections(max_connections.max(1))
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect_with(connect_options(database_url)?)
            .await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

#[async_trait]
impl Store for MySqlStore {
    async fn fetch(&self, statement: &Statement) -> Result<Vec<Row>, DbFailure> {
        let rows = bind_all(sqlx::query(statement.sql()), statement.params())
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(row_to_json)
            .collect::<Result<Vec<_>, _>>()
            .map_err(DbFailure::from)
    }

    async fn execute(&self, statement: &Statement) -> Result<u64, DbFailure> {
        let result = bind_all(sqlx::query(statement.sql()), statement.params())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

impl From<sqlx::Error> for DbFailure {
    fn from(e: sqlx::Error) -> Self {
        Self::from_driver(driver_error(&e))
    }
}

/// Interpret an sqlx error as a driver error with a symbolic code.
pub fn driver_error(e: &sqlx::Error) -> DriverError {
    match e {
        sqlx::Error::Database(db) => match db.try_downcast_ref::<MySqlDatabaseError>() {
            Some(mysql) => DriverError::new(mysql_code_name(mysql.number()), mysql.message()),
            None => DriverError::uncoded(db.message()),
        },
        other => DriverError::uncoded(other.to_string()),
    }
}

fn bind_all<'q>(
    mut query: Query<'q, MySql, MySqlArguments>,
    params: &'q [Param],
) -> Query<'q, MySql, MySqlArguments> {
    for param in params {
        query = match param {
            Param::Null => query.bind(None::<String>),
            Param::Int(v) => query.bind(*v),
            Param::Float(v) => query.bind(*v),
            Param::Text(v) => query.bind(v.as_str()),
            Param::Bool(v) => query.bind(*v),
        };
    }
    query
}

fn row_to_json(row: &MySqlRow) -> Result<Row, sqlx::Error> {
    let mut out = Row::new();
    for (idx, column) in row.columns().iter().enumerate() {
        let value = if row.try_get_raw(idx)?.is_null() {
            Value::Null
        } else {
            column_value(row, idx, column.type_info().name())?
        };
        out.insert(column.name().to_owned(), value);
    }
    Ok(out)
}

fn column_value(row: &MySqlRow, idx: usize, type_name: &str) -> Result<Value, sqlx::Error> {
    let value = match type_name {
        "BOOLEAN" | "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" | "YEAR" => {
            Value::from(row.try_get_unchecked::<i64, _>(idx)?)
        }
        t if t.ends_with("UNSIGNED") => Value::from(row.try_get_unchecked::<u64, _>(idx)?),
        "FLOAT" => Value::from(f64::from(row.try_get::<f32, _>(idx)?)),
        "DOUBLE" => Value::from(row.try_get::<f64, _>(idx)?),
        "DATE" => Value::String(row.try_get::<NaiveDate, _>(idx)?.to_string()),
        "DATETIME" => Value::String(
            row.try_get::<NaiveDateTime, _>(idx)?
                .and_utc()
                .to_rfc3339_opts(SecondsFormat::Millis, true),
        ),
        "TIMESTAMP" => Value::String(
            row.try_get::<DateTime<Utc>, _>(idx)?
                .to_rfc3339_opts(SecondsFormat::Millis, true),
        ),
        "TIME" => Value::String(row.try_get::<NaiveTime, _>(idx)?.to_string()),
        "JSON" => {
            let text = row.try_get_unchecked::<String, _>(idx)?;
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        }
        _ => match row.try_get_unchecked::<String, _>(idx) {
            Ok(text) => Value::String(text),
            Err(_) => {
                let bytes = row.try_get_unchecked::<Vec<u8>, _>(idx)?;
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            }
        },
    };
    Ok(value)
}
