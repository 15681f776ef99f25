//! import command handler

use std::path::Path;

use anyhow::{Context, Result};
use colored::*;
use log::warn;

use super::print_table;
use crate::api;
use crate::config::Config;
use crate::transfer::{Importer, PreflightChecker, SnapshotStore};

pub async fn handle_import_command(config: &Config, data_dir: &Path, skip_destination_check: bool) -> Result<()> {
    let store = SnapshotStore::new(data_dir);
    println!("Loading snapshot from {}", store.dir().display().to_string().cyan());
    let collections = store.load_all()?;

    let destination_env = config.destination_environment()?;
    println!("Connecting to destination {}", destination_env.url.cyan());
    let destination = api::connect(&destination_env)
        .await
        .context("Failed to connect to the destination instance")?;

    if skip_destination_check {
        warn!("Destination check skipped: colliding ids will surface as failed creates");
    } else {
        println!("Checking the destination for colliding ids...");
        PreflightChecker::new(&destination).run(&collections).await?;
        println!("{}", "No collisions found".green());
    }

    let report = Importer::new(&destination)
        .run(&collections)
        .await
        .context("Import aborted; run `tackle-migrate clean` before retrying")?;

    let rows: Vec<_> = report
        .created
        .iter()
        .map(|(kind, count)| (*kind, count.to_string()))
        .collect();
    print_table("Created", &rows);
    println!();
    println!(
        "{} {} records imported",
        "Done:".bright_green().bold(),
        report.total()
    );
    Ok(())
}
