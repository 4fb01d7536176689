//! Configuration inspection

use std::fs;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use cims_core::CimsConfig;

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective configuration with secrets hidden
    Show,
    /// Validate the effective configuration
    Check,
    /// Show config file path
    Path,
    /// Write a config file with default values
    Init(InitArgs),
}

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Force overwrite existing config
    #[arg(long, short)]
    pub force: bool,
}

pub fn run_config(args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Show => run_show(),
        ConfigCommands::Check => run_check(),
        ConfigCommands::Path => run_path(),
        ConfigCommands::Init(args) => run_init(args),
    }
}

fn run_show() -> Result<()> {
    let config = CimsConfig::load().context("Failed to load configuration")?;
    let rendered = toml::to_string_pretty(&config.redacted()).context("Failed to render configuration")?;
    println!("{}", rendered);
    Ok(())
}

fn run_check() -> Result<()> {
    let config = CimsConfig::load().context("Failed to load configuration")?;
    let warnings = config.validate()?;
    config.bind_addr()?;

    for warning in &warnings {
        println!("warning: {}", warning);
    }
    println!(
        "Configuration OK ({}, {} warning(s))",
        config.environment,
        warnings.len()
    );
    Ok(())
}

fn run_path() -> Result<()> {
    println!("{}", CimsConfig::config_path().display());
    Ok(())
}

fn run_init(args: InitArgs) -> Result<()> {
    let config_path = CimsConfig::config_path();

    if config_path.exists() && !args.force {
        return Err(anyhow!(
            "Config already exists at {:?}\n\nUse --force to overwrite",
            config_path
        ));
    }

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let content = toml::to_string_pretty(&CimsConfig::default())?;
    fs::write(&config_path, content)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    println!("Wrote {}", config_path.display());
    Ok(())
}
