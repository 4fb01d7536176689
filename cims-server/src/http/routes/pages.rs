//! Front-end pages behind the session check
//!
//! Only mounted when a static directory is configured. Everything else in
//! that directory stays public through the fallback file service.

use std::path::Path;
use std::sync::Arc;

use axum::{middleware, routing::get_service, Router};
use tower_http::services::ServeFile;

use crate::http::auth::{require_admin, require_auth};
use crate::http::server::AppState;

/// Page route and the file it serves; any signed-in user
const SESSION_PAGES: [(&str, &str); 6] = [
    ("/index.html", "index.html"),
    ("/ver-activos", "ver-activos.html"),
    ("/consultar-empleados", "consultar-empleados.html"),
    ("/registrar-activo", "registrar-activo.html"),
    ("/registrar-incidencia", "registrar-incidencia.html"),
    ("/incidencias.html", "consultar-incidencias.html"),
];

/// Administrators only
const ADMIN_PAGES: [(&str, &str); 2] = [
    ("/registrar-empleado", "registrar-empleado.html"),
    ("/registrar-usuario", "registrar-usuario.html"),
];

const LOGIN_PAGE: &str = "login.html";

fn pages(dir: &Path, table: &[(&str, &str)]) -> Router<Arc<AppState>> {
    table.iter().fold(Router::new(), |router, (route, file)| {
        router.route(route, get_service(ServeFile::new(dir.join(file))))
    })
}

pub fn router(dir: &Path, state: Arc<AppState>) -> Router<Arc<AppState>> {
    let admin = pages(dir, &ADMIN_PAGES).route_layer(middleware::from_fn(require_admin));

    let gated = pages(dir, &SESSION_PAGES)
        .merge(admin)
        .route_layer(middleware::from_fn_with_state(state, require_auth));

    Router::new()
        .route("/", get_service(ServeFile::new(dir.join(LOGIN_PAGE))))
        .merge(gated)
}
