//! Dataset command handlers

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;

use crate::config::Config;

/// Dataset subcommands
#[derive(Subcommand)]
pub enum DatasetCommands {
    /// Get dataset details
    Show {
        /// Dataset id
        id: String,
    },
    /// Download a dataset's content
    Download {
        /// Dataset id
        id: String,

        /// Destination path
        #[arg(short, long)]
        output: PathBuf,
    },
}

/// Handle dataset commands
pub async fn handle_dataset_command(command: DatasetCommands, config: &Config) -> Result<()> {
    let client = config.client();

    match command {
        DatasetCommands::Show { id } => {
            let dataset = client.show_dataset(&id).await?;

            println!("{}", "Dataset Details:".bold());
            println!("  Id:    {}", dataset.id.cyan());
            println!("  Name:  {}", dataset.name);
            if let Some(state) = &dataset.state {
                println!("  State: {}", state);
            }
            if let Some(extension) = &dataset.extension {
                println!("  Type:  {}", extension);
            }
            if let Some(size) = dataset.file_size {
                println!("  Size:  {} bytes", size);
            }
            Ok(())
        }
        DatasetCommands::Download { id, output } => {
            let bytes = client
                .download_dataset(&id, &output)
                .await
                .context("Failed to download dataset")?;

            println!(
                "{}",
                format!("Wrote {} bytes to {}", bytes, output.display()).green()
            );
            Ok(())
        }
    }
}

/// Upload a local file into a history
pub async fn upload(config: &Config, file: &Path, history_id: &str) -> Result<()> {
    let client = config.client();

    let file_name = file
        .file_name()
        .and_then(|n| n.to_str())
        .context("file path has no usable name")?;

    let response = client
        .upload_file(file, history_id, file_name)
        .await
        .context("Failed to upload file")?;

    println!("{}", "Upload submitted.".green());
    for output in &response.outputs {
        println!("  Dataset: {}", output.id.cyan());
    }
    for job in &response.jobs {
        println!("  Job:     {} ({})", job.id.dimmed(), job.state);
    }

    Ok(())
}
