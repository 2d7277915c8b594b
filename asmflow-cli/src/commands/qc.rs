//! Quality-control report helpers

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;

use asmflow_pipeline::report::parse_fastqc_data;

use crate::config::Config;

/// Quality-control subcommands
#[derive(Subcommand)]
pub enum QcCommands {
    /// Download a FastQC data report and print its Basic Statistics block
    Summary {
        /// Dataset id of the FastQC text output
        dataset_id: String,
    },
}

/// Handle quality-control commands
pub async fn handle_qc_command(command: QcCommands, config: &Config) -> Result<()> {
    match command {
        QcCommands::Summary { dataset_id } => summary(config, &dataset_id).await,
    }
}

async fn summary(config: &Config, dataset_id: &str) -> Result<()> {
    let client = config.client();

    let dir = tempfile::tempdir().context("Failed to create temp directory")?;
    let path = dir.path().join(format!("fastqc_data_{dataset_id}.txt"));

    client
        .download_dataset(dataset_id, &path)
        .await
        .context("Failed to download FastQC report")?;

    let text = tokio::fs::read_to_string(&path).await?;
    let summary = parse_fastqc_data(&text)?;

    println!("{}", "FastQC Basic Statistics:".bold());
    print_row("Filename", summary.filename.as_deref());
    print_row("File type", summary.file_type.as_deref());
    print_row("Encoding", summary.encoding.as_deref());
    print_row(
        "Total sequences",
        summary.total_sequences.map(|v| v.to_string()).as_deref(),
    );
    print_row("Sequence length", summary.sequence_length.as_deref());
    print_row("%GC", summary.percent_gc.map(|v| v.to_string()).as_deref());

    Ok(())
}

fn print_row(label: &str, value: Option<&str>) {
    let label = format!("{:<16}", format!("{label}:"));
    match value {
        Some(value) => println!("  {} {}", label.cyan(), value),
        None => println!("  {} {}", label.cyan(), "-".dimmed()),
    }
}
