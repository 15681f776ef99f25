//! Handlers for the three migration actions

pub mod clean;
pub mod export;
pub mod import;

use anyhow::Result;
use colored::*;

use super::{Cli, Commands};
use crate::config::Config;
use crate::transfer::types::EntityType;

pub async fn dispatch(cli: &Cli) -> Result<()> {
    if cli.no_color {
        colored::control::set_override(false);
    }

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let config = Config::load(&config_path)?;
    let data_dir = config.data_dir(cli.data_dir.as_deref());

    match cli.command {
        Commands::ExportSource => {
            export::handle_export_command(&config, &data_dir, cli.skip_destination_check).await
        }
        Commands::Import => {
            import::handle_import_command(&config, &data_dir, cli.skip_destination_check).await
        }
        Commands::Clean => clean::handle_clean_command(&config, &data_dir).await,
    }
}

/// Print one aligned line per type
fn print_table(title: &str, rows: &[(EntityType, String)]) {
    println!();
    println!("{}", title.bold());
    let width = rows
        .iter()
        .map(|(kind, _)| kind.name().len())
        .max()
        .unwrap_or(0);
    for (kind, value) in rows {
        println!("  {:<width$}  {}", kind.name(), value, width = width);
    }
}
