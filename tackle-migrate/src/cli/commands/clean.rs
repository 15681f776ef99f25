//! clean command handler

use std::path::Path;

use anyhow::{Context, Result};
use colored::*;

use super::print_table;
use crate::api;
use crate::config::Config;
use crate::transfer::{Cleaner, SnapshotStore};

pub async fn handle_clean_command(config: &Config, data_dir: &Path) -> Result<()> {
    let store = SnapshotStore::new(data_dir);
    println!("Loading snapshot from {}", store.dir().display().to_string().cyan());
    let collections = store.load_all()?;

    let destination_env = config.destination_environment()?;
    println!("Connecting to destination {}", destination_env.url.cyan());
    let destination = api::connect(&destination_env)
        .await
        .context("Failed to connect to the destination instance")?;

    let report = Cleaner::new(&destination).run(&collections).await;

    let rows: Vec<_> = report
        .entries
        .iter()
        .map(|entry| {
            let value = if entry.failed > 0 {
                format!("{} deleted, {}", entry.deleted, format!("{} failed", entry.failed).yellow())
            } else {
                format!("{} deleted", entry.deleted)
            };
            (entry.kind, value)
        })
        .collect();
    print_table("Deleted", &rows);
    println!();

    if report.failed() > 0 {
        println!(
            "{} {} deleted, {} could not be deleted (already gone or still referenced; see the log)",
            "Done:".yellow().bold(),
            report.deleted(),
            report.failed()
        );
    } else {
        println!("{} {} records deleted", "Done:".bright_green().bold(), report.deleted());
    }
    Ok(())
}
