//! cims - CIMS Gestor API server
//!
//! `cims serve` runs the REST API; `cims config` inspects the configuration
//! the server would start with.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "cims",
    author,
    version,
    about = "IT asset and incident management API server",
    long_about = "Serve the CIMS Gestor REST API: assets, employees, areas, incidents, \
                  maintenance, user accounts and the support assistant."
)]
struct Cli {
    /// Enable debug logging (RUST_LOG still takes precedence)
    #[arg(long, global = true)]
    debug: bool,

    /// Export traces to an OTLP endpoint (requires the telemetry feature)
    #[arg(long, global = true)]
    otel: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::serve::ServeArgs),
    /// Inspect configuration (show, check, path, init)
    Config(commands::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    tracing_setup::init(&tracing_setup::TracingConfig {
        debug: cli.debug,
        otel: cli.otel,
    })
    .ok();

    let result = match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await,
        Commands::Config(args) => commands::run_config(args),
    };

    tracing_setup::shutdown_otel();
    result
}
