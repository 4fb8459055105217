//! Stork CLI
//!
//! Command-line interface for deploying egg and jar libraries to a
//! Databricks workspace.

mod commands;
mod config;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_TARGETS: [&str; 4] = ["stork", "stork_core", "stork_client", "stork_orchestrator"];

#[derive(Debug, Parser)]
#[command(name = "stork")]
#[command(about = "Continuous delivery of libraries to Databricks", long_about = None)]
struct Cli {
    /// Show debug logs
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to the user config directory)
    #[arg(long, global = true, env = "STORK_CONFIG")]
    config: Option<PathBuf>,

    /// Workspace URL
    #[arg(long, global = true, env = "STORK_HOST")]
    host: Option<String>,

    /// API token
    #[arg(long, global = true, env = "STORK_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Production folder
    #[arg(long, global = true, env = "STORK_FOLDER")]
    prod_folder: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

fn log_filter(verbose: bool) -> String {
    let level = if verbose { "debug" } else { "info" };
    LOG_TARGETS
        .iter()
        .map(|target| format!("{}={}", target, level))
        .collect::<Vec<_>>()
        .join(",")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| log_filter(cli.verbose).into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let config = Config::load(cli.config, cli.host, cli.token, cli.prod_folder)?;

    handle_command(cli.command, &config).await
}
