//! Router-level tests: the full middleware stack over in-memory doubles

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use chrono::Utc;
use cims_core::{DriverError, Environment};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::auth::{Identity, TokenService};
use super::server::{build_router, AppState, ServerConfig};
use crate::db::{DbFailure, Param};
use crate::test_support::{row, FakeLlm, FakeStore, Reply};

const SECRET: &str = "router-tests-secret-router-tests-secret";

struct TestApp {
    router: Router,
    store: Arc<FakeStore>,
    tokens: TokenService,
}

impl TestApp {
    fn new(store: FakeStore) -> Self {
        Self::with(store, FakeLlm::replying("{}"), Environment::Development)
    }

    fn with(store: FakeStore, llm: FakeLlm, environment: Environment) -> Self {
        let config = ServerConfig {
            environment,
            ..ServerConfig::default()
        };
        Self::with_config(store, llm, config)
    }

    fn with_config(store: FakeStore, llm: FakeLlm, config: ServerConfig) -> Self {
        let store = Arc::new(store);
        let tokens = TokenService::new(SECRET, 8);
        let state = Arc::new(AppState {
            store: store.clone(),
            tokens: tokens.clone(),
            llm: Arc::new(llm),
            environment: config.environment,
        });
        Self {
            router: build_router(state, &config),
            store,
            tokens,
        }
    }

    fn token(&self, administrador: bool) -> String {
        self.tokens
            .issue(&Identity {
                id: 1,
                username: "ana".into(),
                correo: "ana@cims.cl".into(),
                administrador,
            })
            .unwrap()
    }

    async fn send_text(&self, request: Request<Body>) -> (StatusCode, String) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, HeaderMap, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, headers, body)
    }
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

fn send_json(method: Method, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn driver_failure(code: &str, message: &str) -> DbFailure {
    DbFailure::from_driver(DriverError::new(code, message))
}

#[tokio::test]
async fn health_is_public() {
    let app = TestApp::new(FakeStore::empty());
    let (status, _, body) = app.send(get("/health", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn health_is_503_when_database_is_down() {
    let store = FakeStore::new(|_| Err(driver_failure("ECONNREFUSED", "connect ECONNREFUSED")));
    let app = TestApp::with(store, FakeLlm::replying("{}"), Environment::Production);
    let (status, _, body) = app.send(get("/health", None)).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Base de datos no disponible");
}

#[tokio::test]
async fn unknown_route_reports_original_url() {
    let app = TestApp::new(FakeStore::empty());
    let (status, _, body) = app.send(get("/api/nada?x=1", None)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Ruta no encontrada: /api/nada?x=1");
}

#[tokio::test]
async fn missing_token_is_401() {
    let app = TestApp::new(FakeStore::empty());
    let (status, _, body) = app.send(get("/api/activos", None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Token no proporcionado");
    assert!(app.store.calls().is_empty());
}

#[tokio::test]
async fn invalid_and_expired_tokens_are_401() {
    let app = TestApp::new(FakeStore::empty());

    let (status, _, body) = app.send(get("/api/activos", Some("not.a.jwt"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Token inválido");

    let expired = app
        .tokens
        .issue_at(
            &Identity {
                id: 1,
                username: "ana".into(),
                correo: "ana@cims.cl".into(),
                administrador: false,
            },
            Utc::now().timestamp() - 9 * 3600,
        )
        .unwrap();
    let (status, _, body) = app.send(get("/api/activos", Some(&expired))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Token expirado");
}

#[tokio::test]
async fn cookie_token_is_accepted() {
    let app = TestApp::new(FakeStore::empty());
    let request = Request::builder()
        .uri("/api/user")
        .header(header::COOKIE, format!("authToken={}", app.token(false)))
        .body(Body::empty())
        .unwrap();
    let (status, _, body) = app.send(request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["username"], "ana");
    assert_eq!(body["user"]["administrador"], false);
}

#[tokio::test]
async fn bulk_insert_reports_partial_failure() {
    let store = FakeStore::new(|st| {
        if st.params().first() == Some(&Param::Text("B".into())) {
            Err(driver_failure("ER_DATA_TOO_LONG", "Data too long for column 'ItemName'"))
        } else {
            Ok(Reply::Affected(1))
        }
    });
    let app = TestApp::new(store);
    let token = app.token(false);

    let (status, _, body) = app
        .send(send_json(
            Method::POST,
            "/api/activos",
            Some(&token),
            json!([{ "ItemCode": "A" }, { "ItemCode": "B" }, { "ItemCode": "C" }]),
        ))
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Activos procesados: 3. Insertados: 2. Errores: 1");
    assert_eq!(app.store.calls().len(), 3);
}

#[tokio::test]
async fn bulk_insert_all_ok() {
    let app = TestApp::new(FakeStore::empty());
    let token = app.token(false);

    let (status, _, body) = app
        .send(send_json(
            Method::POST,
            "/api/activos",
            Some(&token),
            json!({ "ItemCode": "A", "ItemName": "notebook" }),
        ))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "✅ Todos los activos (1) registrados exitosamente.");

    let calls = app.store.calls();
    assert_eq!(calls[0].procedure(), Some("InsertarActivo"));
    assert_eq!(calls[0].params()[1], Param::Text("NOTEBOOK".into()));
}

#[tokio::test]
async fn empty_asset_array_is_400() {
    let app = TestApp::new(FakeStore::empty());
    let token = app.token(false);

    let (status, _, body) = app
        .send(send_json(Method::POST, "/api/activos", Some(&token), json!([])))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Se requiere al menos un activo");
}

#[tokio::test]
async fn malformed_json_is_validation_error() {
    let app = TestApp::new(FakeStore::empty());
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/activos")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", app.token(false)))
        .body(Body::from("{\"ItemCode\": "))
        .unwrap();
    let (status, _, body) = app.send(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().starts_with("Solicitud inválida"));
}

#[tokio::test]
async fn duplicate_user_is_409() {
    let store = FakeStore::new(|st| {
        if st.sql().starts_with("INSERT INTO usuario") {
            Err(driver_failure(
                "ER_DUP_ENTRY",
                "Duplicate entry 'ana@cims.cl' for key 'usuario.correo'",
            ))
        } else {
            Ok(Reply::Affected(1))
        }
    });
    let app = TestApp::new(store);
    let token = app.token(true);

    let (status, _, body) = app
        .send(send_json(
            Method::POST,
            "/api/usuarios",
            Some(&token),
            json!({ "username": "ana", "correo": "ana@cims.cl", "contrasena": "s3creta" }),
        ))
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "El usuario o correo ya existe");
}

#[tokio::test]
async fn create_user_hashes_password() {
    let app = TestApp::new(FakeStore::empty());
    let token = app.token(true);

    let (status, _, body) = app
        .send(send_json(
            Method::POST,
            "/api/usuarios",
            Some(&token),
            json!({ "username": "ana", "correo": "ana@cims.cl", "contrasena": "s3creta", "administrador": "1" }),
        ))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Usuario registrado exitosamente");

    let params = app.store.calls()[0].params().to_vec();
    match &params[2] {
        Param::Text(hash) => assert!(hash.starts_with("$2") && hash != "s3creta"),
        other => panic!("expected hash, got {:?}", other),
    }
    assert_eq!(params[3], Param::Int(1));
}

#[tokio::test]
async fn missing_user_fields_are_400() {
    let app = TestApp::new(FakeStore::empty());
    let token = app.token(true);

    let (status, _, body) = app
        .send(send_json(
            Method::POST,
            "/api/usuarios",
            Some(&token),
            json!({ "username": "ana" }),
        ))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Faltan campos obligatorios");
    assert!(app.store.calls().is_empty());
}

#[tokio::test]
async fn employee_creation_requires_admin() {
    let app = TestApp::new(FakeStore::empty());
    let token = app.token(false);

    let (status, _, _) = app
        .send(send_json(
            Method::POST,
            "/api/empleados",
            Some(&token),
            json!({ "nombre": "Luis", "codigo": "1-9", "area_id": 2 }),
        ))
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(app.store.calls().is_empty());
}

#[tokio::test]
async fn employee_creation_returns_new_id() {
    let store = FakeStore::new(|_| Ok(Reply::Rows(vec![row(json!({ "empleado_id": 42 }))])));
    let app = TestApp::new(store);
    let token = app.token(true);

    let (status, _, body) = app
        .send(send_json(
            Method::POST,
            "/api/empleados",
            Some(&token),
            json!({ "nombre": "luis", "codigo": "1-k", "area_id": 2 }),
        ))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["empleado_id"], 42);
    assert_eq!(app.store.calls()[0].params()[0], Param::Text("1-K".into()));
}

#[tokio::test]
async fn employee_area_failure_does_not_fail_update() {
    let store = FakeStore::new(|st| {
        if st.sql().contains("activo_empleado_area") {
            Err(driver_failure("ER_NO_REFERENCED_ROW_2", "Cannot add or update a child row"))
        } else {
            Ok(Reply::Affected(1))
        }
    });
    let app = TestApp::new(store);
    let token = app.token(false);

    let (status, _, body) = app
        .send(send_json(
            Method::PUT,
            "/api/empleados/5",
            Some(&token),
            json!({ "nombre": "LUIS", "correo": "luis@cims.cl", "fecha_ingreso": "2024-01-01", "area_id": 99 }),
        ))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "✅ Empleado y área actualizados correctamente");
    assert_eq!(app.store.calls().len(), 2);
}

#[tokio::test]
async fn asset_lookup_not_found() {
    let app = TestApp::new(FakeStore::empty());
    let token = app.token(false);

    let (status, _, body) = app.send(get("/api/activos/77", Some(&token))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Activo no encontrado");

    let (status, _, body) = app
        .send(get("/api/activos/77/empleado", Some(&token)))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "No hay empleado asignado a este activo");
}

#[tokio::test]
async fn asset_by_employee_defaults_to_unknown() {
    let app = TestApp::new(FakeStore::empty());
    let token = app.token(false);

    let (status, _, body) = app
        .send(get("/api/activos/por-empleado/3", Some(&token)))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "nombre_activo": "Desconocido" }));
}

#[tokio::test]
async fn asset_by_serial_returns_row() {
    let store = FakeStore::new(|_| {
        Ok(Reply::Rows(vec![row(json!({ "id": 3, "ItemCode": "SN-3", "Price": "10.00" }))]))
    });
    let app = TestApp::new(store);
    let token = app.token(false);

    let (status, _, body) = app
        .send(get("/api/activos/numero-serie/SN-3", Some(&token)))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["Price"], "10.00");
    assert_eq!(app.store.calls()[0].procedure(), Some("BuscarActivoPorItemCode"));
}

#[tokio::test]
async fn invalid_status_is_400_with_details() {
    let app = TestApp::new(FakeStore::empty());
    let token = app.token(false);

    let (status, _, body) = app
        .send(send_json(
            Method::PUT,
            "/api/activos/4/estado",
            Some(&token),
            json!({ "estado": "Roto" }),
        ))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Estado inválido. Debe ser \"Disponible\" o \"Pérdida\".");
    assert_eq!(body["details"]["value"], "Roto");
}

#[tokio::test]
async fn status_update_with_no_rows_is_404() {
    let app = TestApp::new(FakeStore::new(|_| Ok(Reply::Affected(0))));
    let token = app.token(false);

    let (status, _, _) = app
        .send(send_json(
            Method::PUT,
            "/api/activos/4/estado",
            Some(&token),
            json!({ "estado": "Pérdida" }),
        ))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn database_errors_depend_on_environment() {
    let failing = || {
        FakeStore::new(|_| Err(driver_failure("ER_LOCK_DEADLOCK", "Deadlock found when trying to get lock")))
    };

    let dev = TestApp::with(failing(), FakeLlm::replying("{}"), Environment::Development);
    let token = dev.token(false);
    let (status, _, body) = dev.send(get("/api/empleados", Some(&token))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Error de base de datos");
    assert_eq!(body["code"], "ER_LOCK_DEADLOCK");
    assert!(body["stack"].as_str().unwrap().contains("Deadlock found"));

    let prod = TestApp::with(failing(), FakeLlm::replying("{}"), Environment::Production);
    let token = prod.token(false);
    let (status, _, body) = prod.send(get("/api/empleados", Some(&token))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Error interno del servidor");
    assert!(body.get("stack").is_none());
    assert!(!body.to_string().contains("Deadlock"));
}

#[tokio::test]
async fn foreign_key_failure_is_400() {
    let app = TestApp::new(FakeStore::new(|_| {
        Err(driver_failure("ER_NO_REFERENCED_ROW_2", "Cannot add or update a child row"))
    }));
    let token = app.token(false);

    let (status, _, body) = app
        .send(send_json(
            Method::POST,
            "/api/activos/4/asignar",
            Some(&token),
            json!({ "empleado_id": 999, "fecha_asignacion": "2026-10-18" }),
        ))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "No se puede realizar la operación debido a referencias en otras tablas"
    );
}

#[tokio::test]
async fn maintenance_requires_incident() {
    let app = TestApp::new(FakeStore::empty());
    let token = app.token(false);

    let (status, _, body) = app
        .send(send_json(
            Method::POST,
            "/api/mantenimientos/iniciar",
            Some(&token),
            json!({}),
        ))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "incidencia_id es obligatorio");
}

#[tokio::test]
async fn diagnosis_passes_model_json_through() {
    let llm = FakeLlm::replying(r#"{"diagnostico":"Disco dañado","pasos":["Cambiar disco"],"riesgo":"alto"}"#);
    let app = TestApp::with(FakeStore::empty(), llm, Environment::Development);
    let token = app.token(false);

    let (status, _, body) = app
        .send(send_json(
            Method::POST,
            "/api/sugerir-solucion",
            Some(&token),
            json!({ "descripcion": "Hace ruido y no arranca", "activo_modelo": "OPTIPLEX" }),
        ))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["riesgo"], "alto");
}

#[tokio::test]
async fn assistant_failures_use_fixed_messages() {
    let app = TestApp::with(FakeStore::empty(), FakeLlm::failing(), Environment::Production);
    let token = app.token(false);

    let (status, _, body) = app
        .send(send_json(
            Method::POST,
            "/api/sugerir-solucion",
            Some(&token),
            json!({ "descripcion": "No enciende" }),
        ))
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "El asistente virtual no pudo procesar la solicitud.");

    let (status, _, body) = app
        .send(send_json(
            Method::POST,
            "/api/chat-guia",
            Some(&token),
            json!({ "mensaje": "hola" }),
        ))
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["error"],
        "El asistente está reiniciando sus sistemas. Intenta en un momento."
    );

    let (status, _, body) = app
        .send(send_json(Method::POST, "/api/chat-guia", Some(&token), json!({})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Mensaje vacío");
}

#[tokio::test]
async fn login_sets_cookie_and_returns_token() {
    let hash = bcrypt::hash("s3creta", 4).unwrap();
    let store = FakeStore::new(move |_| {
        Ok(Reply::Rows(vec![row(json!({
            "id": 9,
            "username": "ana",
            "correo": "ana@cims.cl",
            "contrasena": hash,
            "administrador": 1
        }))]))
    });
    let app = TestApp::new(store);

    let (status, headers, body) = app
        .send(send_json(
            Method::POST,
            "/api/login",
            None,
            json!({ "usuario": "ana", "contrasena": "s3creta" }),
        ))
        .await;

    assert_eq!(status, StatusCode::OK);
    let cookie = headers[header::SET_COOKIE].to_str().unwrap();
    assert!(cookie.starts_with("authToken="));
    assert!(cookie.contains("HttpOnly"));

    let claims = app.tokens.verify(body["token"].as_str().unwrap()).unwrap();
    assert_eq!(claims.id, 9);
    assert!(claims.administrador);
    assert!(body["user"].get("contrasena").is_none());
}

#[tokio::test]
async fn login_with_wrong_password_is_401() {
    let hash = bcrypt::hash("s3creta", 4).unwrap();
    let store = FakeStore::new(move |_| {
        Ok(Reply::Rows(vec![row(json!({ "id": 9, "username": "ana", "contrasena": hash }))]))
    });
    let app = TestApp::new(store);

    let (status, headers, body) = app
        .send(send_json(
            Method::POST,
            "/api/login",
            None,
            json!({ "correo": "ana@cims.cl", "contrasena": "otra" }),
        ))
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Credenciales inválidas");
    assert!(headers.get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn security_headers_follow_environment() {
    let dev = TestApp::new(FakeStore::empty());
    let (_, headers, _) = dev.send(get("/health", None)).await;
    assert_eq!(headers[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
    assert!(headers.get(header::CONTENT_SECURITY_POLICY).is_none());

    let prod = TestApp::with(FakeStore::empty(), FakeLlm::replying("{}"), Environment::Production);
    let (_, headers, _) = prod.send(get("/health", None)).await;
    assert!(headers[header::CONTENT_SECURITY_POLICY]
        .to_str()
        .unwrap()
        .starts_with("default-src 'self'"));
}

#[tokio::test]
async fn login_attempts_are_limited() {
    let hash = bcrypt::hash("s3creta", 4).unwrap();
    let store = FakeStore::new(move |_| {
        Ok(Reply::Rows(vec![row(json!({ "id": 9, "username": "ana", "contrasena": hash }))]))
    });
    let mut config = ServerConfig::default();
    config.rate_limit.login_max_attempts = 3;
    let app = TestApp::with_config(store, FakeLlm::replying("{}"), config);
    let attempt = || {
        send_json(
            Method::POST,
            "/api/login",
            None,
            json!({ "usuario": "ana", "contrasena": "otra" }),
        )
    };

    for _ in 0..3 {
        let (status, _, _) = app.send(attempt()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
    let (status, _, body) = app.send(attempt()).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["success"], false);
    assert_eq!(
        body["error"],
        "Demasiados intentos de inicio de sesión. Intenta nuevamente más tarde."
    );

    // Other routes keep working for the same client
    let (status, _, _) = app.send(get("/health", None)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn general_limit_applies_to_every_route() {
    let mut config = ServerConfig::default();
    config.rate_limit.max_requests = 2;
    let app = TestApp::with_config(FakeStore::empty(), FakeLlm::replying("{}"), config);

    app.send(get("/health", None)).await;
    app.send(get("/api/nada", None)).await;
    let (status, _, body) = app.send(get("/health", None)).await;

    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(
        body["error"],
        "Demasiadas solicitudes desde esta IP, intenta nuevamente más tarde."
    );
}

struct Site {
    _dir: tempfile::TempDir,
    app: TestApp,
}

fn site() -> Site {
    let dir = tempfile::tempdir().unwrap();
    for file in [
        "login.html",
        "index.html",
        "ver-activos.html",
        "consultar-incidencias.html",
        "registrar-usuario.html",
        "estilos.css",
    ] {
        std::fs::write(dir.path().join(file), format!("<!-- {} -->", file)).unwrap();
    }
    let config = ServerConfig {
        static_dir: Some(dir.path().to_path_buf()),
        ..ServerConfig::default()
    };
    let app = TestApp::with_config(FakeStore::empty(), FakeLlm::replying("{}"), config);
    Site { _dir: dir, app }
}

#[tokio::test]
async fn root_serves_login_page() {
    let site = site();
    let (status, body) = site.app.send_text(get("/", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "<!-- login.html -->");

    let (status, _) = site.app.send_text(get("/estilos.css", None)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn session_pages_require_login() {
    let site = site();

    let (status, _, body) = site.app.send(get("/ver-activos", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Token no proporcionado");

    let token = site.app.token(false);
    let (status, body) = site.app.send_text(get("/ver-activos", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "<!-- ver-activos.html -->");

    // Browsers send the session cookie rather than a bearer header
    let request = Request::builder()
        .uri("/incidencias.html")
        .header(header::COOKIE, format!("authToken={}", token))
        .body(Body::empty())
        .unwrap();
    let (status, body) = site.app.send_text(request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "<!-- consultar-incidencias.html -->");
}

#[tokio::test]
async fn admin_pages_require_administrator() {
    let site = site();

    let (status, _, body) = site
        .app
        .send(get("/registrar-usuario", Some(&site.app.token(false))))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        body["error"],
        "Acceso denegado: se requieren permisos de administrador"
    );

    let (status, _, _) = site.app.send(get("/registrar-usuario", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = site
        .app
        .send_text(get("/registrar-usuario", Some(&site.app.token(true))))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "<!-- registrar-usuario.html -->");
}
