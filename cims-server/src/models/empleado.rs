//! Employee and area request bodies

use serde::Deserialize;

use super::scalar::{truthy, Scalar};
use super::{non_blank, ValidationError};
use crate::db::Param;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewEmpleado {
    pub codigo: Option<String>,
    pub nombre: Option<String>,
    pub correo: Option<String>,
    pub fecha_ingreso: Option<String>,
    pub area_id: Option<Scalar>,
}

impl NewEmpleado {
    /// Parameters for `CrearEmpleadoConArea`.
    ///
    /// Code and name are upper-cased; the hire date defaults to `today`.
    pub fn create_params(&self, today: &str) -> Result<Vec<Param>, ValidationError> {
        let (Some(codigo), Some(nombre), Some(area_id)) = (
            non_blank(self.codigo.as_deref()),
            non_blank(self.nombre.as_deref()),
            truthy(self.area_id.as_ref()),
        ) else {
            return Err(ValidationError::required(
                "El nombre, código y área_id son obligatorios",
            ));
        };

        Ok(vec![
            codigo.to_uppercase().into(),
            nombre.to_uppercase().into(),
            non_blank(self.correo.as_deref()).into(),
            non_blank(self.fecha_ingreso.as_deref()).unwrap_or(today).into(),
            area_id.into(),
        ])
    }
}

/// Personal data plus the area of the active assignment
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmpleadoUpdate {
    pub nombre: Option<String>,
    pub correo: Option<String>,
    pub fecha_ingreso: Option<String>,
    pub area_id: Option<Scalar>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewArea {
    pub nombre: Option<String>,
}

impl NewArea {
    pub fn nombre(&self) -> Result<&str, ValidationError> {
        self.nombre
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| ValidationError::required("El nombre del área es obligatorio"))
    }
}
