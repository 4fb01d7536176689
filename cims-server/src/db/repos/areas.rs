//! Area repository

use crate::db::{DbFailure, Row, Statement, Store};

pub struct AreaRepo<'a> {
    store: &'a dyn Store,
}

impl<'a> AreaRepo<'a> {
    pub fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Vec<Row>, DbFailure> {
        self.store
            .fetch(&Statement::new("SELECT id, nombre FROM area ORDER BY nombre"))
            .await
    }

    pub async fn create(&self, nombre: &str) -> Result<u64, DbFailure> {
        self.store
            .execute(&Statement::new("INSERT INTO area (nombre) VALUES (?)").bind(nombre))
            .await
    }
}
