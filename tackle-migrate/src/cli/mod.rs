//! Command-line interface

pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "tackle-migrate",
    version,
    about = "Migrate application inventory from Tackle 1 into a Tackle 2 hub"
)]
pub struct Cli {
    /// Config file (default: ./tackle-config.toml, then the user config dir)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Snapshot directory, overrides `data_dir` from the config file
    #[arg(short, long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Do not read the destination before exporting or importing
    #[arg(short, long, global = true)]
    pub skip_destination_check: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Export the source inventory into the snapshot directory
    ExportSource,
    /// Create the snapshot's records in the destination
    Import,
    /// Delete the snapshot's records from the destination
    Clean,
}
