//! HTTP server command
//!
//! Flags override the config file and environment.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use cims_core::{CimsConfig, Environment};
use cims_server::{
    run_server, AppState, MySqlStore, OpenAiCompatClient, ServerConfig, TokenService,
};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to (default: HOST:PORT from config, else 127.0.0.1:3000)
    #[arg(long, short = 'b')]
    pub bind: Option<SocketAddr>,

    /// Database URL (overrides config/environment)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Deployment environment: production hides error details
    #[arg(long = "env", value_name = "ENV")]
    pub environment: Option<String>,

    /// Directory of front-end files served outside /api
    #[arg(long, value_name = "DIR")]
    pub static_dir: Option<PathBuf>,
}

impl ServeArgs {
    fn apply(&self, config: &mut CimsConfig) {
        if let Some(env) = &self.environment {
            config.environment = Environment::parse(env);
        }
        if let Some(url) = &self.database_url {
            config.database.url = Some(url.clone());
        }
        if self.cors_permissive {
            config.server.cors_origins = vec!["*".to_string()];
        }
        if let Some(dir) = &self.static_dir {
            config.server.static_dir = Some(dir.clone());
        }
    }
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let mut config = CimsConfig::load().context("Failed to load configuration")?;
    args.apply(&mut config);

    for warning in config.validate().context("Invalid configuration")? {
        tracing::warn!("{}", warning);
    }

    let mut server_config = ServerConfig::from_settings(&config)?;
    if let Some(bind) = args.bind {
        server_config.bind_addr = bind;
    }

    let database_url = config
        .database
        .url
        .as_deref()
        .context("DATABASE_URL not set. Set via --database-url, DATABASE_URL env, or config file")?;
    let secret = config
        .auth
        .jwt_secret
        .as_deref()
        .context("JWT_SECRET not set")?;

    tracing::info!(
        environment = %config.environment,
        "Starting cims server on {}",
        server_config.bind_addr
    );

    let store = MySqlStore::connect(database_url, config.database.max_connections)
        .await
        .context("Failed to create database pool")?;

    let llm = OpenAiCompatClient::new(&config.llm).context("Failed to build LLM client")?;

    let state = Arc::new(AppState {
        store: Arc::new(store),
        tokens: TokenService::new(secret, config.auth.token_ttl_hours),
        llm: Arc::new(llm),
        environment: config.environment,
    });

    // Blocks until shutdown
    run_server(state, server_config)
        .await
        .context("Server error")?;

    Ok(())
}
