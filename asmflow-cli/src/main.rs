//! Asmflow CLI
//!
//! Command-line front-end for the assembly pipeline: history, dataset and
//! job inspection on the execution service, plus the full pipeline run.

mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "asmflow")]
#[command(about = "Bacterial assembly pipeline on a Galaxy execution service", long_about = None)]
struct Cli {
    /// Execution service URL
    #[arg(long, env = "GALAXY_URL", default_value = "http://localhost:8080")]
    galaxy_url: String,

    /// API key for the execution service
    #[arg(long, env = "GALAXY_API_KEY", hide_env_values = true)]
    api_key: String,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "asmflow=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = Config {
        galaxy_url: cli.galaxy_url,
        api_key: cli.api_key,
    };

    handle_command(cli.command, &config).await
}
