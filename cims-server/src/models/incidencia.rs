//! Incident and maintenance request bodies

use serde::Deserialize;

use super::scalar::{truthy, Scalar};
use super::{non_blank, ValidationError};
use crate::db::Param;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewIncidencia {
    pub descripcion: Option<String>,
    pub activo_id: Option<Scalar>,
    pub usuario_id: Option<Scalar>,
    /// Employee holding the asset when the incident was reported
    pub empleado_id: Option<Scalar>,
}

impl NewIncidencia {
    /// Parameters for `RegistrarIncidencia`: asset, employee, reporting user,
    /// description.
    pub fn register_params(&self) -> Result<Vec<Param>, ValidationError> {
        let descripcion = self.descripcion.as_deref().map(str::trim);
        let (Some(descripcion), Some(activo_id), Some(usuario_id)) = (
            non_blank(descripcion),
            truthy(self.activo_id.as_ref()),
            truthy(self.usuario_id.as_ref()),
        ) else {
            return Err(ValidationError::required(
                "descripcion, activo_id y usuario_id son obligatorios",
            ));
        };

        Ok(vec![
            activo_id.into(),
            truthy(self.empleado_id.as_ref()).into(),
            usuario_id.into(),
            descripcion.into(),
        ])
    }
}

/// Start or finish maintenance for an incident
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MantenimientoRequest {
    pub incidencia_id: Option<Scalar>,
    pub init_mantenimiento: Option<String>,
    pub fin_mantenimiento: Option<String>,
}

impl MantenimientoRequest {
    fn params(&self, date: Option<&str>, today: &str) -> Result<Vec<Param>, ValidationError> {
        let incidencia_id = truthy(self.incidencia_id.as_ref())
            .ok_or_else(|| ValidationError::required("incidencia_id es obligatorio"))?;
        Ok(vec![
            incidencia_id.into(),
            non_blank(date).unwrap_or(today).into(),
        ])
    }

    /// Parameters for `IniciarMantenimiento`.
    pub fn start_params(&self, today: &str) -> Result<Vec<Param>, ValidationError> {
        self.params(self.init_mantenimiento.as_deref(), today)
    }

    /// Parameters for `FinalizarMantenimiento`.
    pub fn finish_params(&self, today: &str) -> Result<Vec<Param>, ValidationError> {
        self.params(self.fin_mantenimiento.as_deref(), today)
    }
}
