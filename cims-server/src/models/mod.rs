//! Request bodies and the normalisation applied before they reach a
//! stored procedure
//!
//! Rows coming back from the database are not modelled; they pass through
//! as JSON objects.

pub mod activo;
pub mod empleado;
pub mod incidencia;
pub mod scalar;
pub mod usuario;
pub mod validation;

pub use activo::{ActivoInput, AsignarRequest, AssetStatus, EstadoRequest, OneOrMany};
pub use empleado::{EmpleadoUpdate, NewArea, NewEmpleado};
pub use incidencia::{MantenimientoRequest, NewIncidencia};
pub use scalar::Scalar;
pub use usuario::{LoginRequest, NewUsuario, UsuarioUpdate};
pub use validation::ValidationError;

use chrono::{Local, NaiveDate};

/// Today's date as `YYYY-MM-DD`, the default for every date field.
pub fn today() -> String {
    format_date(Local::now().date_naive())
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Text that is present and not empty
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
