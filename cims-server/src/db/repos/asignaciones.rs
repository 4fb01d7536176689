//! Active asset assignments (`activo_empleado_area` rows without a
//! retirement date)

use crate::db::{DbFailure, Row, Statement, Store};

const ACTIVE_SQL: &str = r#"
    SELECT
        aea.*,
        a.ItemCode,
        a.ItemName AS nombre_activo,
        e.nombre AS nombre_empleado,
        ar.nombre AS area
    FROM activo_empleado_area aea
    JOIN activo a ON a.id = aea.activo_id
    JOIN empleado e ON e.id = aea.empleado_id
    LEFT JOIN area ar ON ar.id = aea.area_id
    WHERE aea.fecha_retiro IS NULL
"#;

pub struct AsignacionRepo<'a> {
    store: &'a dyn Store,
}

impl<'a> AsignacionRepo<'a> {
    pub fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    pub async fn list_active(&self) -> Result<Vec<Row>, DbFailure> {
        let sql = format!("{} ORDER BY aea.fecha_asignacion DESC", ACTIVE_SQL);
        self.store.fetch(&Statement::new(sql)).await
    }

    pub async fn list_for_employee(&self, empleado_id: &str) -> Result<Vec<Row>, DbFailure> {
        let sql = format!(
            "{} AND aea.empleado_id = ? ORDER BY aea.fecha_asignacion DESC",
            ACTIVE_SQL
        );
        self.store
            .fetch(&Statement::new(sql).bind(empleado_id))
            .await
    }
}
