//! Route handlers organized by resource

pub mod activos;
pub mod areas;
pub mod asignaciones;
pub mod assistant;
pub mod empleados;
pub mod health;
pub mod incidencias;
pub mod mantenimientos;
pub mod pages;
pub mod session;
pub mod usuarios;

use axum::Json;
use serde_json::{json, Value};

/// `{message}` success envelope
pub(crate) fn message(text: impl Into<String>) -> Json<Value> {
    Json(json!({ "message": text.into() }))
}
