//! Database layer - connection pool, statement shim and repositories
//!
//! Persistence logic lives in stored procedures; this layer only formats
//! calls, binds parameters and hands back rows as JSON objects. Rows are
//! not reshaped or validated on the way out.

pub mod mysql;
pub mod repos;
pub mod store;

pub use mysql::{MySqlStore, DEFAULT_MAX_CONNECTIONS};
pub use repos::*;
pub use store::{DbFailure, Param, Row, Statement, Store};
