//! History command handlers

use anyhow::Result;
use clap::Subcommand;
use colored::*;

use asmflow_core::domain::history::{History, HistoryItem};

use crate::config::Config;

/// History subcommands
#[derive(Subcommand)]
pub enum HistoryCommands {
    /// List all histories
    List,
    /// Create a new history
    Create {
        /// Display name for the history
        name: String,
    },
    /// List the datasets in a history
    Show {
        /// History id
        id: String,
    },
}

/// Handle history commands
pub async fn handle_history_command(command: HistoryCommands, config: &Config) -> Result<()> {
    let client = config.client();

    match command {
        HistoryCommands::List => {
            let histories = client.get_histories().await?;

            if histories.is_empty() {
                println!("{}", "No histories found.".yellow());
            } else {
                println!("{}", format!("Found {} histor(ies):", histories.len()).bold());
                println!();
                for history in histories {
                    print_history_summary(&history);
                }
            }
            Ok(())
        }
        HistoryCommands::Create { name } => {
            let history = client.create_history(&name).await?;
            println!("{}", "History created.".green());
            println!("  Id:   {}", history.id.cyan());
            println!("  Name: {}", history.name);
            Ok(())
        }
        HistoryCommands::Show { id } => {
            let items = client.show_history_contents(&id).await?;

            if items.is_empty() {
                println!("{}", format!("History {} is empty.", id).yellow());
            } else {
                println!(
                    "{}",
                    format!("{} dataset(s) in history {}:", items.len(), id).bold()
                );
                println!();
                for item in items {
                    print_history_item(&item);
                }
            }
            Ok(())
        }
    }
}

/// Print a history summary
fn print_history_summary(history: &History) {
    println!(
        "  {} {} {}",
        "▸".cyan(),
        history.name,
        history.id.to_string().dimmed()
    );
    if let Some(count) = history.count {
        println!("    Datasets: {}", count);
    }
    if let Some(updated) = history.update_time {
        println!(
            "    Updated:  {}",
            updated.format("%Y-%m-%d %H:%M:%S").to_string().dimmed()
        );
    }
    println!();
}

/// Print one dataset row of a history listing
fn print_history_item(item: &HistoryItem) {
    let state = item.state.as_deref().unwrap_or("unknown");
    let state_colored = match state {
        "ok" => state.green(),
        "error" => state.red(),
        "running" => state.cyan(),
        _ => state.yellow(),
    };

    let hid = item.hid.map(|h| format!("{h:>3}")).unwrap_or_default();
    println!(
        "  {} {} [{}] {}",
        hid.dimmed(),
        item.name,
        state_colored,
        item.id.to_string().dimmed()
    );
}
