//! export-source command handler

use std::path::Path;

use anyhow::{Context, Result};
use colored::*;
use log::warn;

use super::print_table;
use crate::api::{self, Transport};
use crate::config::Config;
use crate::transfer::types::{DestinationIndex, TYPES};
use crate::transfer::{Collections, EntityGraphBuilder, RunContext, SnapshotStore, load_destination_index};

pub async fn handle_export_command(config: &Config, data_dir: &Path, skip_destination_check: bool) -> Result<()> {
    let source_env = config.source_environment()?;
    println!("Connecting to source {}", source_env.url.cyan());
    let source = api::connect(&source_env)
        .await
        .context("Failed to connect to the source instance")?;

    let destination = if skip_destination_check {
        None
    } else {
        let destination_env = config.destination_environment()?;
        println!("Connecting to destination {}", destination_env.url.cyan());
        Some(
            api::connect(&destination_env)
                .await
                .context("Failed to connect to the destination instance")?,
        )
    };

    let store = SnapshotStore::new(data_dir);
    let collections = export(
        &source,
        destination.as_ref().map(|client| client as &dyn Transport),
        &store,
    )
    .await?;

    let rows: Vec<_> = TYPES
        .iter()
        .map(|kind| (*kind, collections.len_of(*kind).to_string()))
        .collect();
    print_table("Exported", &rows);
    println!();
    println!(
        "Snapshot written to {}",
        store.dir().display().to_string().bright_green()
    );
    Ok(())
}

/// Seed load, extraction and snapshot of one export run
pub async fn export(
    source: &dyn Transport,
    destination: Option<&dyn Transport>,
    store: &SnapshotStore,
) -> Result<Collections> {
    let index = match destination {
        Some(destination) => load_destination_index(destination).await?,
        None => {
            warn!("Destination check skipped: seed data will not be deduplicated");
            DestinationIndex::new()
        }
    };

    let mut ctx = RunContext::with_destination(index);
    EntityGraphBuilder::new(source, &mut ctx).run().await?;
    store.store_all(&ctx.collections)?;
    Ok(ctx.collections)
}
