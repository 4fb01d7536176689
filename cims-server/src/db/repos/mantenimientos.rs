//! Maintenance repository

use crate::db::{DbFailure, Param, Row, Statement, Store};

pub struct MantenimientoRepo<'a> {
    store: &'a dyn Store,
}

impl<'a> MantenimientoRepo<'a> {
    pub fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Vec<Row>, DbFailure> {
        self.store
            .fetch(&Statement::new("SELECT * FROM mantenimiento ORDER BY id DESC"))
            .await
    }

    /// `incidencia_id, init_mantenimiento`
    pub async fn start(&self, params: Vec<Param>) -> Result<u64, DbFailure> {
        self.store
            .execute(&Statement::call("IniciarMantenimiento", params))
            .await
    }

    /// `incidencia_id, fin_mantenimiento`
    pub async fn finish(&self, params: Vec<Param>) -> Result<u64, DbFailure> {
        self.store
            .execute(&Statement::call("FinalizarMantenimiento", params))
            .await
    }
}
