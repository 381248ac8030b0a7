//! FlightSurety CLI — deploys the governance core and drives it from the shell.

mod commands;
mod config;

use clap::Parser;
use commands::Command;
use config::DeploymentConfig;
use flightsurety_utils::LogFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "flightsurety", about = "Airline registry governance core")]
struct Cli {
    /// Path to a TOML configuration file. If omitted, built-in defaults are used.
    #[arg(long, env = "FLIGHTSURETY_CONFIG")]
    config: Option<PathBuf>,

    /// State file; overrides `state_file` from the config.
    #[arg(long, env = "FLIGHTSURETY_STATE")]
    state: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "FLIGHTSURETY_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "FLIGHTSURETY_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Command,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match cli.config {
        Some(ref path) => DeploymentConfig::from_toml_file(path)?,
        None => DeploymentConfig::default(),
    };

    flightsurety_utils::init_logging(
        cli.log_format.unwrap_or(config.log_format),
        cli.log_level.as_deref().unwrap_or(&config.log_level),
    );
    if let Some(ref path) = cli.config {
        tracing::debug!("loaded config from {}", path.display());
    }

    let state_path = cli.state.unwrap_or_else(|| config.state_file.clone());
    let output = commands::run(&cli.command, &config, &state_path)?;
    println!("{output}");
    Ok(())
}
