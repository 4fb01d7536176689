//! Incident repository

use crate::db::{DbFailure, Param, Row, Statement, Store};

/// Incidents with asset, holder, area and maintenance state, as the
/// incident history view expects them
const HISTORY_SQL: &str = r#"
    SELECT
        i.id,
        i.descripcion,
        i.fecha_reporte,
        a.ItemCode AS itemcode_popup,
        a.ItemName AS nombre_activo,
        ar.nombre AS nombre_area,
        e.nombre AS nombre_empleado,
        m.init_mantenimiento,
        m.fin_mantenimiento,
        CASE
            WHEN m.fin_mantenimiento IS NOT NULL THEN 'verde'
            WHEN m.init_mantenimiento IS NOT NULL THEN 'amarillo'
            ELSE 'rojo'
        END AS estado_equipo
    FROM incidencia i
    LEFT JOIN activo a ON a.id = i.activo_id
    LEFT JOIN empleado e ON e.id = i.empleado_id
    LEFT JOIN activo_empleado_area aea ON aea.activo_id = i.activo_id AND aea.fecha_retiro IS NULL
    LEFT JOIN area ar ON ar.id = aea.area_id
    LEFT JOIN mantenimiento m ON m.incidencia_id = i.id
    ORDER BY i.fecha_reporte DESC, i.id DESC
"#;

pub struct IncidenciaRepo<'a> {
    store: &'a dyn Store,
}

impl<'a> IncidenciaRepo<'a> {
    pub fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Vec<Row>, DbFailure> {
        self.store
            .fetch(&Statement::new(
                "SELECT * FROM incidencia ORDER BY fecha_reporte DESC, id DESC",
            ))
            .await
    }

    pub async fn history(&self) -> Result<Vec<Row>, DbFailure> {
        self.store.fetch(&Statement::new(HISTORY_SQL)).await
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Row>, DbFailure> {
        self.store
            .fetch_first(&Statement::new("SELECT * FROM incidencia WHERE id = ?").bind(id))
            .await
    }

    /// Parameters come from `NewIncidencia::register_params`.
    pub async fn register(&self, params: Vec<Param>) -> Result<u64, DbFailure> {
        self.store
            .execute(&Statement::call("RegistrarIncidencia", params))
            .await
    }
}
