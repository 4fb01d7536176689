//! Employee repository

use crate::db::{DbFailure, Param, Row, Statement, Store};

pub struct EmpleadoRepo<'a> {
    store: &'a dyn Store,
}

impl<'a> EmpleadoRepo<'a> {
    pub fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Vec<Row>, DbFailure> {
        self.store
            .fetch(&Statement::call("sp_obtener_empleados", vec![]))
            .await
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Row>, DbFailure> {
        self.store
            .fetch_first(&Statement::call("sp_obtener_empleado_por_id", vec![id.into()]))
            .await
    }

    /// Create the employee and its first area assignment. The procedure
    /// answers with a row holding the new `empleado_id`.
    pub async fn create_with_area(&self, params: Vec<Param>) -> Result<Option<Row>, DbFailure> {
        self.store
            .fetch_first(&Statement::call("CrearEmpleadoConArea", params))
            .await
    }

    pub async fn update_personal(
        &self,
        id: &str,
        nombre: Option<&str>,
        correo: Option<&str>,
        fecha_ingreso: Option<&str>,
    ) -> Result<u64, DbFailure> {
        let st = Statement::new("UPDATE empleado SET nombre = ?, correo = ?, fecha_ingreso = ? WHERE id = ?")
            .bind(nombre)
            .bind(correo)
            .bind(fecha_ingreso)
            .bind(id);
        self.store.execute(&st).await
    }

    /// Move the employee's active assignment to another area.
    pub async fn update_active_area(&self, id: &str, area_id: Param) -> Result<u64, DbFailure> {
        let st = Statement::new(
            "UPDATE activo_empleado_area SET area_id = ? WHERE empleado_id = ? AND fecha_retiro IS NULL",
        )
        .bind(area_id)
        .bind(id);
        self.store.execute(&st).await
    }
}
