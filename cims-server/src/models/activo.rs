//! Asset request bodies
//!
//! Field names match what the inventory export produces (`ItemCode`,
//! `ItemName`, ...), mixed with the app's own snake_case fields.

use serde::Deserialize;

use super::scalar::{truthy, Scalar};
use super::{non_blank, ValidationError};
use crate::db::Param;

const NO_ESPECIFICADO: &str = "NO ESPECIFICADO";
const NO_ESPECIFICADA: &str = "NO ESPECIFICADA";
const DEFAULT_CURRENCY: &str = "USD";

/// Asset as submitted for creation or update
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActivoInput {
    #[serde(rename = "ItemCode")]
    pub item_code: Option<Scalar>,
    #[serde(rename = "ItemName")]
    pub item_name: Option<String>,
    pub marca: Option<String>,
    pub modelo: Option<String>,
    pub fecha_compra: Option<String>,
    #[serde(rename = "Price")]
    pub price: Option<Scalar>,
    #[serde(rename = "Currency")]
    pub currency: Option<String>,
    #[serde(rename = "BarCode")]
    pub bar_code: Option<Scalar>,
    #[serde(rename = "QuantityOnStock")]
    pub quantity_on_stock: Option<Scalar>,
    #[serde(rename = "ItemsGroupCode")]
    pub items_group_code: Option<Scalar>,
    #[serde(rename = "FechaBaja")]
    pub fecha_baja: Option<String>,
    #[serde(rename = "MotivoBaja")]
    pub motivo_baja: Option<String>,
}

impl ActivoInput {
    /// Parameters for `InsertarActivo`, with every default filled in.
    pub fn insert_params(&self, today: &str) -> Vec<Param> {
        vec![
            self.item_code.as_ref().into(),
            self.item_name_upper().into(),
            upper_trimmed_or(self.marca.as_deref(), NO_ESPECIFICADA).into(),
            upper_trimmed_or(self.modelo.as_deref(), NO_ESPECIFICADO).into(),
            non_blank(self.fecha_compra.as_deref()).unwrap_or(today).into(),
            truthy(self.price.as_ref()).map_or(Param::Float(0.0), Param::from),
            non_blank(self.currency.as_deref())
                .unwrap_or(DEFAULT_CURRENCY)
                .into(),
            truthy(self.bar_code.as_ref()).into(),
            truthy(self.quantity_on_stock.as_ref()).map_or(Param::Int(0), Param::from),
            truthy(self.items_group_code.as_ref()).into(),
            non_blank(self.fecha_baja.as_deref()).into(),
            non_blank(self.motivo_baja.as_deref()).into(),
        ]
    }

    /// Parameters for `ActualizarActivo`: names are normalised, everything
    /// else is forwarded as sent.
    pub fn update_params(&self, id: &str) -> Vec<Param> {
        vec![
            id.into(),
            self.item_code.as_ref().into(),
            self.item_name_upper().into(),
            upper_trimmed_or(self.marca.as_deref(), NO_ESPECIFICADA).into(),
            upper_trimmed_or(self.modelo.as_deref(), NO_ESPECIFICADO).into(),
            self.fecha_compra.as_deref().into(),
            self.price.as_ref().into(),
            self.currency.as_deref().into(),
            self.bar_code.as_ref().into(),
            self.quantity_on_stock.as_ref().into(),
            self.items_group_code.as_ref().into(),
            self.fecha_baja.as_deref().into(),
            self.motivo_baja.as_deref().into(),
        ]
    }

    fn item_name_upper(&self) -> String {
        non_blank(self.item_name.as_deref())
            .map_or_else(|| NO_ESPECIFICADO.to_owned(), str::to_uppercase)
    }
}

fn upper_trimmed_or(value: Option<&str>, default: &str) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_uppercase(),
        _ => default.to_owned(),
    }
}

/// A single object or an array of them
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::Many(items) => items,
            Self::One(item) => vec![item],
        }
    }
}

/// Asset availability
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetStatus {
    Disponible,
    /// Stolen, lost or out of service
    Perdida,
}

impl AssetStatus {
    const ALLOWED: &'static [&'static str] = &["Disponible", "Pérdida"];

    pub fn parse(value: Option<&str>) -> Result<Self, ValidationError> {
        match value {
            Some("Disponible") => Ok(Self::Disponible),
            Some("Pérdida") => Ok(Self::Perdida),
            other => Err(ValidationError::InvalidVariant {
                field: "Estado",
                value: other.unwrap_or_default().to_owned(),
                allowed: Self::ALLOWED,
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disponible => "Disponible",
            Self::Perdida => "Pérdida",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EstadoRequest {
    pub estado: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AsignarRequest {
    pub empleado_id: Option<Scalar>,
    pub fecha_asignacion: Option<String>,
}
