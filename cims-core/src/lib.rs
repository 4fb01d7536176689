//! cims-core: error taxonomy and configuration for CIMS Gestor
//!
//! Everything in this crate is synchronous and free of I/O except
//! configuration loading. The HTTP layer lives in `cims-server`.

pub mod classify;
pub mod config;
pub mod driver;
pub mod error;

pub use classify::{classify, ClassifiedError, DebugInfo, ErrorKind, RawError};
pub use config::{CimsConfig, Environment, RateLimitSettings};
pub use driver::{map_driver_error, mysql_code_name, DbErrorCategory, DbErrorInfo, DriverError};
pub use error::{CoreError, Result};
