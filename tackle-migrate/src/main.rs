mod api;
mod cli;
mod config;
mod transfer;

use clap::Parser;
use colored::*;

use cli::Cli;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "tackle_migrate=debug"
    } else {
        "tackle_migrate=info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();

    if let Err(e) = cli::commands::dispatch(&cli).await {
        eprintln!("{} {:#}", "Error:".bright_red().bold(), e);
        std::process::exit(1);
    }
}
