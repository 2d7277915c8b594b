//! Job command handlers

use anyhow::Result;
use clap::Subcommand;
use colored::*;

use asmflow_core::domain::job::{Job, JobState};

use crate::config::Config;

/// Job subcommands
#[derive(Subcommand)]
pub enum JobCommands {
    /// Get job details
    Show {
        /// Job id
        id: String,
    },
    /// List jobs in a history
    List {
        /// History id
        #[arg(long)]
        history: String,
    },
}

/// Handle job commands
pub async fn handle_job_command(command: JobCommands, config: &Config) -> Result<()> {
    let client = config.client();

    match command {
        JobCommands::Show { id } => {
            let job = client.show_job(&id).await?;
            print_job_details(&job);
            Ok(())
        }
        JobCommands::List { history } => {
            let jobs = client.get_history_jobs(&history).await?;

            if jobs.is_empty() {
                println!(
                    "{}",
                    format!("No jobs found for history {}.", history).yellow()
                );
            } else {
                println!(
                    "{}",
                    format!("Found {} job(s) for history {}:", jobs.len(), history).bold()
                );
                println!();
                for job in jobs {
                    print_job_summary(&job);
                }
            }
            Ok(())
        }
    }
}

/// Print a job summary
fn print_job_summary(job: &Job) {
    println!("  {} Job {}", "▸".cyan(), job.id.to_string().dimmed());
    if let Some(tool_id) = &job.tool_id {
        println!("    Tool:   {}", tool_id.dimmed());
    }
    println!("    Status: {}", colorize_state(job.state));
    println!();
}

/// Print detailed job information
fn print_job_details(job: &Job) {
    println!("{}", "Job Details:".bold());
    println!("  Id:     {}", job.id.cyan());
    if let Some(tool_id) = &job.tool_id {
        println!("  Tool:   {}", tool_id);
    }
    println!("  Status: {}", colorize_state(job.state));

    if let Some(exit_code) = job.exit_code {
        println!("  Exit:   {}", exit_code);
    }
    if let Some(created) = job.create_time {
        println!("  Created: {}", created.format("%Y-%m-%d %H:%M:%S"));
    }
    if let Some(updated) = job.update_time {
        println!("  Updated: {}", updated.format("%Y-%m-%d %H:%M:%S"));
    }

    if !job.outputs.is_empty() {
        println!("\n{}", "Outputs:".bold());
        for (name, output) in &job.outputs {
            println!("  {} = {}", name.cyan(), output.id);
        }
    }
}

/// Colorize a job state for display
fn colorize_state(state: JobState) -> colored::ColoredString {
    let state_str = state.to_string();
    match state {
        JobState::Ok => state_str.green(),
        JobState::Error => state_str.red(),
        JobState::Running => state_str.cyan(),
        JobState::Deleted | JobState::Paused => state_str.dimmed(),
        _ => state_str.yellow(),
    }
}
