//! Loosely typed JSON scalars
//!
//! Browser forms send ids and amounts either as numbers or as strings, so
//! these fields accept both and are forwarded to the database as given.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::db::Param;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    /// `false`, `0`, `NaN` and `""` count as absent
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Int(n) => *n != 0,
            Self::Float(x) => *x != 0.0 && !x.is_nan(),
            Self::Text(s) => !s.is_empty(),
        }
    }

    /// `true`, `"true"`, `1` and `"1"` are set; anything else is not.
    pub fn as_flag(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Int(n) => *n == 1,
            Self::Text(s) => s == "true" || s == "1",
            Self::Float(x) => *x == 1.0,
        }
    }
}

/// The value when present and truthy
pub fn truthy(value: Option<&Scalar>) -> Option<&Scalar> {
    value.filter(|v| v.is_truthy())
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int(n) => write!(f, "{}", n),
            Self::Float(x) => write!(f, "{}", x),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&Scalar> for Param {
    fn from(v: &Scalar) -> Self {
        match v {
            Scalar::Bool(b) => Param::Bool(*b),
            Scalar::Int(n) => Param::Int(*n),
            Scalar::Float(x) => Param::Float(*x),
            Scalar::Text(s) => Param::Text(s.clone()),
        }
    }
}

impl From<Scalar> for Param {
    fn from(v: Scalar) -> Self {
        Param::from(&v)
    }
}
