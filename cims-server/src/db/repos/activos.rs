//! Asset repository

use crate::db::{DbFailure, Param, Row, Statement, Store};

/// Assets with incident count, current holder and area
const LIST_SQL: &str = r#"
    SELECT
        a.*,
        (SELECT COUNT(*) FROM mantenimiento WHERE activo_id = a.id) AS total_incidencias,
        aea.empleado_id AS empleado_id_asignado,
        emp.nombre AS nombre_empleado,
        ar.nombre AS area
    FROM activo a
    LEFT JOIN activo_empleado_area aea ON aea.activo_id = a.id AND aea.fecha_retiro IS NULL
    LEFT JOIN empleado emp ON emp.id = aea.empleado_id
    LEFT JOIN area ar ON ar.id = aea.area_id
"#;

pub struct ActivoRepo<'a> {
    store: &'a dyn Store,
}

impl<'a> ActivoRepo<'a> {
    pub fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    /// Insert one asset. Parameters come from `ActivoInput::insert_params`.
    pub async fn insert(&self, params: Vec<Param>) -> Result<u64, DbFailure> {
        self.store
            .execute(&Statement::call("InsertarActivo", params))
            .await
    }

    pub async fn list(&self) -> Result<Vec<Row>, DbFailure> {
        self.store.fetch(&Statement::new(LIST_SQL)).await
    }

    pub async fn find_by_item_code(&self, item_code: &str) -> Result<Option<Row>, DbFailure> {
        self.store
            .fetch_first(&Statement::call("BuscarActivoPorItemCode", vec![item_code.into()]))
            .await
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Row>, DbFailure> {
        self.store
            .fetch_first(&Statement::call("BuscarActivoPorID", vec![id.into()]))
            .await
    }

    /// Employee currently holding the asset
    pub async fn assigned_employee(&self, id: &str) -> Result<Option<Row>, DbFailure> {
        self.store
            .fetch_first(&Statement::call("ObtenerEmpleadoDeActivo", vec![id.into()]))
            .await
    }

    /// Parameters come from `ActivoInput::update_params`.
    pub async fn update(&self, params: Vec<Param>) -> Result<u64, DbFailure> {
        self.store
            .execute(&Statement::call("ActualizarActivo", params))
            .await
    }

    pub async fn set_status(&self, id: &str, estado: &str) -> Result<u64, DbFailure> {
        self.store
            .execute(&Statement::call(
                "ActualizarEstadoActivo",
                vec![id.into(), estado.into()],
            ))
            .await
    }

    /// Close the current assignment (if any) and open a new one.
    pub async fn assign(
        &self,
        id: &str,
        empleado_id: Param,
        fecha_asignacion: &str,
    ) -> Result<u64, DbFailure> {
        self.store
            .execute(&Statement::call(
                "AsignarActivo",
                vec![id.into(), empleado_id, fecha_asignacion.into()],
            ))
            .await
    }

    pub async fn find_by_employee(&self, empleado_id: &str) -> Result<Option<Row>, DbFailure> {
        self.store
            .fetch_first(&Statement::call("ObtenerActivoPorEmpleado", vec![empleado_id.into()]))
            .await
    }
}
