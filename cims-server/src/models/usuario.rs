//! User account request bodies

use serde::Deserialize;

use super::scalar::Scalar;
use super::{non_blank, ValidationError};

/// bcrypt work factor for stored passwords
pub const BCRYPT_COST: u32 = 10;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewUsuario {
    pub username: Option<String>,
    pub correo: Option<String>,
    pub contrasena: Option<String>,
    pub administrador: Option<Scalar>,
}

impl NewUsuario {
    /// Username, email and plain password, all required.
    pub fn credentials(&self) -> Result<(&str, &str, &str), ValidationError> {
        match (
            non_blank(self.username.as_deref()),
            non_blank(self.correo.as_deref()),
            non_blank(self.contrasena.as_deref()),
        ) {
            (Some(u), Some(c), Some(p)) => Ok((u, c, p)),
            _ => Err(ValidationError::required("Faltan campos obligatorios")),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.administrador.as_ref().is_some_and(Scalar::as_flag)
    }
}

/// Partial update; absent fields keep their stored value
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UsuarioUpdate {
    pub username: Option<String>,
    pub contrasena: Option<String>,
    pub administrador: Option<Scalar>,
}

impl UsuarioUpdate {
    pub fn username(&self) -> Option<&str> {
        non_blank(self.username.as_deref())
    }

    pub fn new_password(&self) -> Option<&str> {
        non_blank(self.contrasena.as_deref())
    }

    /// `None` when the flag was not sent
    pub fn admin_flag(&self) -> Option<bool> {
        self.administrador.as_ref().map(Scalar::as_flag)
    }
}

/// Login accepts either the username or the email as identifier.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    pub usuario: Option<String>,
    pub correo: Option<String>,
    pub contrasena: Option<String>,
}

impl LoginRequest {
    pub fn credentials(&self) -> Result<(&str, &str), ValidationError> {
        let identifier = non_blank(self.usuario.as_deref()).or(non_blank(self.correo.as_deref()));
        match (identifier, non_blank(self.contrasena.as_deref())) {
            (Some(id), Some(pw)) => Ok((id, pw)),
            _ => Err(ValidationError::required("Usuario y contraseña son obligatorios")),
        }
    }
}
