//! flatsync CLI
//!
//! Reads, edits and removes records of one kind in its flat files.

mod cli;
mod commands;
mod context;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Commands};
use context::KindContext;
use error::{CliError, Result};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .map_err(|e| CliError::user(format!("failed to set tracing subscriber: {e}")))?;
        tracing::debug!("Verbose mode enabled");
    } else if std::env::var_os("RUST_LOG").is_some() {
        flatsync_core::logging::init().map_err(|e| CliError::user(e.to_string()))?;
    }

    let context = KindContext::resolve(
        cli.config.as_deref(),
        cli.kind.as_deref(),
        cli.file.as_deref(),
    )?;

    match cli.command {
        Commands::List { json } => commands::run_list(context, json),
        Commands::Get { name, attr } => commands::run_get(context, &name, &attr),
        Commands::Set {
            name,
            assignments,
            target,
        } => commands::run_set(context, &name, &assignments, target.as_deref()),
        Commands::Remove { name, target } => {
            commands::run_remove(context, &name, target.as_deref())
        }
    }
}
