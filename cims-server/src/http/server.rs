//! Axum server setup
//!
//! Server skeleton with:
//! - Localhost-only CORS by default
//! - Security headers (CSP only in production)
//! - Tracing middleware
//! - Per-client rate limits (general and login)
//! - Centralised error responder and panic catcher
//! - Graceful shutdown on SIGTERM/Ctrl+C

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{DefaultBodyLimit, OriginalUri};
use axum::handler::HandlerWithoutStateExt;
use axum::http::header::{self, HeaderName, HeaderValue};
use axum::http::Method;
use axum::{middleware, Router};
use cims_core::{CimsConfig, Environment, RateLimitSettings};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use super::auth::{require_auth, TokenService};
use super::error::ApiError;
use super::rate_limit::{limit_requests, ClientLimiter};
use super::responder::{panic_response, respond_to_errors};
use super::routes;
use crate::db::Store;
use crate::llm::ChatCompletion;

const CONTENT_SECURITY_POLICY: &str = "default-src 'self'; \
    script-src 'self' 'unsafe-inline' https://cdn.jsdelivr.net/; \
    style-src 'self' 'unsafe-inline' https://cdn.jsdelivr.net/; \
    img-src 'self' data: https://*; \
    connect-src 'self' https://cdn.jsdelivr.net https://cdnjs.cloudflare.com";

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:3000)
    pub bind_addr: SocketAddr,

    /// Allowed CORS origins; empty = localhost only, `*` = any origin
    pub cors_origins: Vec<String>,

    /// Front-end files served for every non-API path
    pub static_dir: Option<PathBuf>,

    /// Maximum request body size
    pub body_limit_bytes: usize,

    pub rate_limit: RateLimitSettings,

    pub environment: Environment,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            cors_origins: Vec::new(),
            static_dir: None,
            body_limit_bytes: 10 * 1024 * 1024,
            rate_limit: RateLimitSettings::default(),
            environment: Environment::Development,
        }
    }
}

impl ServerConfig {
    pub fn from_settings(config: &CimsConfig) -> Result<Self, ServerError> {
        Ok(Self {
            bind_addr: config
                .bind_addr()
                .map_err(|e| ServerError::Config(e.to_string()))?,
            cors_origins: config.server.cors_origins.clone(),
            static_dir: config.server.static_dir.clone(),
            body_limit_bytes: config.server.body_limit_bytes,
            rate_limit: config.rate_limit.clone(),
            environment: config.environment,
        })
    }

    pub fn cors_permissive(&self) -> bool {
        self.cors_origins.iter().any(|o| o == "*")
    }

    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_secs(self.rate_limit.window_secs)
    }
}

/// Shared application state
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub tokens: TokenService,
    pub llm: Arc<dyn ChatCompletion>,
    pub environment: Environment,
}

/// Build the full application router.
pub fn build_router(state: Arc<AppState>, config: &ServerConfig) -> Router {
    let protected = Router::new()
        .merge(routes::activos::router())
        .merge(routes::empleados::router())
        .merge(routes::usuarios::router())
        .merge(routes::incidencias::router())
        .merge(routes::mantenimientos::router())
        .merge(routes::asignaciones::router())
        .merge(routes::areas::router())
        .merge(routes::assistant::router())
        .merge(routes::session::protected_router())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    let window = config.rate_limit_window();
    let general_limiter = ClientLimiter::general(config.rate_limit.max_requests, window);
    let login_limiter = ClientLimiter::login(config.rate_limit.login_max_attempts, window);

    let app = Router::new()
        .merge(routes::health::router())
        .merge(routes::session::router(login_limiter))
        .merge(protected);

    let app = match &config.static_dir {
        Some(dir) => {
            tracing::info!(static_dir = %dir.display(), "serving static files");
            app.merge(routes::pages::router(dir, state.clone())).fallback_service(
                ServeDir::new(dir)
                    .call_fallback_on_method_not_allowed(true)
                    .fallback(not_found.into_service()),
            )
        }
        None => app.fallback(not_found),
    };

    let csp = config
        .environment
        .is_production()
        .then_some(HeaderValue::from_static(CONTENT_SECURITY_POLICY));

    // Outermost first
    let layers = ServiceBuilder::new()
        .layer(cors_layer(config))
        .map_response(|res: axum::response::Response<_>| res.map(axum::body::Body::new))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("SAMEORIGIN"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::REFERRER_POLICY,
            HeaderValue::from_static("no-referrer"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            HeaderName::from_static("x-dns-prefetch-control"),
            HeaderValue::from_static("off"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CONTENT_SECURITY_POLICY,
            csp,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(config.body_limit_bytes))
        .layer(middleware::from_fn_with_state(
            config.environment,
            respond_to_errors,
        ))
        .layer(middleware::from_fn_with_state(
            general_limiter,
            limit_requests,
        ))
        .layer(CatchPanicLayer::custom(panic_response));

    app.layer(layers).with_state(state)
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    if config.cors_permissive() {
        tracing::warn!("CORS: Permissive mode enabled - all origins allowed");
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = if config.cors_origins.is_empty() {
        vec![
            HeaderValue::from_static("http://localhost:3000"),
            HeaderValue::from_static("http://127.0.0.1:3000"),
        ]
    } else {
        config
            .cors_origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                    None
                }
            })
            .collect()
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

/// Any request that matched no route
async fn not_found(OriginalUri(uri): OriginalUri) -> ApiError {
    ApiError::not_found(format!("Ruta no encontrada: {}", uri))
}

/// Run the HTTP server.
///
/// # Example
///
/// ```ignore
/// let state = Arc::new(AppState { store, tokens, llm, environment });
/// run_server(state, ServerConfig::from_settings(&config)?).await?;
/// ```
pub async fn run_server(state: Arc<AppState>, config: ServerConfig) -> Result<(), ServerError> {
    let app = build_router(state, &config);

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!(
        environment = %config.environment,
        "Server listening on {}",
        config.bind_addr
    );

    // Peer addresses key the rate limiters
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid server configuration: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr.port(), 3000);
        assert!(!config.cors_permissive());
        assert_eq!(config.body_limit_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn star_origin_is_permissive() {
        let config = ServerConfig {
            cors_origins: vec!["*".into()],
            ..ServerConfig::default()
        };
        assert!(config.cors_permissive());
    }

    #[test]
    fn config_from_settings() {
        let mut settings = CimsConfig::default();
        settings.environment = Environment::Production;
        settings.server.port = 8080;

        let config = ServerConfig::from_settings(&settings).unwrap();
        assert_eq!(config.bind_addr.port(), 8080);
        assert!(config.environment.is_production());
    }

    #[test]
    fn rate_limits_come_from_settings() {
        let mut settings = CimsConfig::default();
        settings.rate_limit.login_max_attempts = 2;
        settings.rate_limit.window_secs = 60;

        let config = ServerConfig::from_settings(&settings).unwrap();
        assert_eq!(config.rate_limit.login_max_attempts, 2);
        assert_eq!(config.rate_limit_window(), Duration::from_secs(60));
    }
}
