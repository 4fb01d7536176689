//! Repository implementations for database access
//!
//! Each repository owns the SQL text and stored-procedure names for one
//! resource and borrows the shared [`Store`](super::Store):
//! - lookups return `Option<Row>`; mapping "no row" to 404 is the caller's job
//! - writes return affected rows
//! - list queries JOIN in a single statement (no N+1)

pub mod activos;
pub mod areas;
pub mod asignaciones;
pub mod empleados;
pub mod incidencias;
pub mod mantenimientos;
pub mod usuarios;

pub use activos::ActivoRepo;
pub use areas::AreaRepo;
pub use asignaciones::AsignacionRepo;
pub use empleados::EmpleadoRepo;
pub use incidencias::IncidenciaRepo;
pub use mantenimientos::MantenimientoRepo;
pub use usuarios::UsuarioRepo;
