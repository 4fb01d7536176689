//! cims-server: REST API for CIMS Gestor
//!
//! Assets, employees, areas, incidents, maintenance and user accounts over
//! a MySQL database whose logic lives mostly in stored procedures, plus a
//! small LLM-backed support assistant.
//!
//! Every failure flows to one place, the error responder in
//! [`http::responder`], which classifies it with [`cims_core::classify`].

pub mod db;
pub mod http;
pub mod llm;
pub mod models;

#[cfg(test)]
pub(crate) mod test_support;

pub use db::{MySqlStore, Store};
pub use http::{build_router, run_server, AppState, ServerConfig, ServerError, TokenService};
pub use llm::{ChatCompletion, OpenAiCompatClient};
