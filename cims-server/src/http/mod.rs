//! HTTP layer - Axum routes, authentication and the error responder

pub mod auth;
pub mod error;
pub mod extractors;
pub mod rate_limit;
pub mod responder;
pub mod routes;
pub mod server;

#[cfg(test)]
mod tests;

pub use auth::{Claims, TokenService};
pub use error::ApiError;
pub use server::{build_router, run_server, AppState, ServerConfig, ServerError};
