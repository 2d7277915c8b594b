//! Command handlers
//!
//! Routes CLI subcommands to their handler modules.

mod dataset;
mod history;
mod job;
mod qc;
mod run;

use anyhow::Result;
use clap::Subcommand;
use colored::*;
use std::path::PathBuf;

use crate::config::Config;
pub use run::RunArgs;

/// Top-level commands
#[derive(Subcommand)]
pub enum Commands {
    /// Manage histories on the execution service
    History {
        #[command(subcommand)]
        command: history::HistoryCommands,
    },
    /// Upload a local file into a history
    Upload {
        /// File to upload
        file: PathBuf,

        /// Destination history id
        #[arg(long)]
        history: String,
    },
    /// Inspect jobs
    Job {
        #[command(subcommand)]
        command: job::JobCommands,
    },
    /// Inspect and download datasets
    Dataset {
        #[command(subcommand)]
        command: dataset::DatasetCommands,
    },
    /// Quality-control report helpers
    Qc {
        #[command(subcommand)]
        command: qc::QcCommands,
    },
    /// Run the full assembly pipeline
    Run(RunArgs),
    /// Validate connectivity and the configured API key
    Whoami,
}

/// Handle a top-level command
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::History { command } => history::handle_history_command(command, config).await,
        Commands::Upload { file, history } => dataset::upload(config, &file, &history).await,
        Commands::Job { command } => job::handle_job_command(command, config).await,
        Commands::Dataset { command } => dataset::handle_dataset_command(command, config).await,
        Commands::Qc { command } => qc::handle_qc_command(command, config).await,
        Commands::Run(args) => run::run_pipeline(args, config).await,
        Commands::Whoami => whoami(config).await,
    }
}

/// Validate connectivity and the API key by fetching the current user
async fn whoami(config: &Config) -> Result<()> {
    let client = config.client();

    match client.get_current_user().await {
        Ok(user) => {
            println!("{}", "API key accepted.".green());
            println!("  User id: {}", user.id.cyan());
            if let Some(email) = user.email {
                println!("  Email:   {}", email);
            }
            Ok(())
        }
        Err(e) => {
            println!("{}", "API key rejected.".red());
            Err(e.into())
        }
    }
}
