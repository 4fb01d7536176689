//! User repository
//!
//! Listings never select the password hash; only the login lookup does.

use crate::db::{DbFailure, Row, Statement, Store};

const PUBLIC_COLUMNS: &str = "id, username, correo, administrador";

pub struct UsuarioRepo<'a> {
    store: &'a dyn Store,
}

impl<'a> UsuarioRepo<'a> {
    pub fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Vec<Row>, DbFailure> {
        let sql = format!("SELECT {} FROM usuario", PUBLIC_COLUMNS);
        self.store.fetch(&Statement::new(sql)).await
    }

    pub async fn list_non_admin(&self) -> Result<Vec<Row>, DbFailure> {
        let sql = format!("SELECT {} FROM usuario WHERE administrador = 0", PUBLIC_COLUMNS);
        self.store.fetch(&Statement::new(sql)).await
    }

    pub async fn find_by_email(&self, correo: &str) -> Result<Option<Row>, DbFailure> {
        let row = self
            .store
            .fetch_first(&Statement::call("sp_obtener_usuario_por_correo", vec![correo.into()]))
            .await?;
        Ok(row.map(without_password))
    }

    /// Row including the stored hash, by username or email
    pub async fn find_for_login(&self, identifier: &str) -> Result<Option<Row>, DbFailure> {
        let st = Statement::new(
            "SELECT id, username, correo, contrasena, administrador FROM usuario \
             WHERE username = ? OR correo = ? LIMIT 1",
        )
        .bind(identifier)
        .bind(identifier);
        self.store.fetch_first(&st).await
    }

    /// Plain insert; a duplicate username or email surfaces as a
    /// duplicate-entry failure.
    pub async fn create(
        &self,
        username: &str,
        correo: &str,
        password_hash: &str,
        administrador: bool,
    ) -> Result<u64, DbFailure> {
        let st = Statement::new(
            "INSERT INTO usuario (username, correo, contrasena, administrador) VALUES (?, ?, ?, ?)",
        )
        .bind(username)
        .bind(correo)
        .bind(password_hash)
        .bind(i64::from(administrador));
        self.store.execute(&st).await
    }

    /// `None` arguments leave the column untouched.
    pub async fn update(
        &self,
        correo: &str,
        username: Option<&str>,
        password_hash: Option<&str>,
        administrador: Option<bool>,
    ) -> Result<u64, DbFailure> {
        self.store
            .execute(&Statement::call(
                "sp_actualizar_usuario_por_correo",
                vec![
                    correo.into(),
                    username.into(),
                    password_hash.into(),
                    administrador.map(i64::from).into(),
                ],
            ))
            .await
    }

    pub async fn delete(&self, correo: &str) -> Result<u64, DbFailure> {
        self.store
            .execute(&Statement::call("sp_eliminar_usuario_por_correo", vec![correo.into()]))
            .await
    }
}

fn without_password(mut row: Row) -> Row {
    row.remove("contrasena");
    row
}
