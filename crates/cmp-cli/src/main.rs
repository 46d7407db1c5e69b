//! cmp-config CLI
//!
//! Loads configuration layers from a TOML file, simulates a host context from
//! flags and prints what the resolver produces for that context.

mod cli;
mod commands;
mod error;
mod layers;
mod terminal;

use clap::Parser;
use cmp_config::ConfigStore;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use cli::{Cli, Commands};
use error::{CliError, Result};
use layers::LayerFile;
use terminal::TerminalSink;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose)?;

    let Some(command) = cli.command.clone() else {
        // No command provided - show help hint
        println!("{} layered completion configuration", "cmp-config".green().bold());
        println!();
        println!("Run {} for available commands.", "cmp-config --help".cyan());
        return Ok(());
    };

    let store = load_store(&cli)?;
    execute_command(&store, command)
}

fn init_tracing(verbose: bool) -> Result<()> {
    let result = if verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
    } else {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new("warn"))
            .map_err(|e| CliError::user(format!("Invalid log filter: {}", e)))?;
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
    };
    result.map_err(|e| CliError::user(format!("Failed to set tracing subscriber: {}", e)))?;
    tracing::debug!(verbose, "tracing initialized");
    Ok(())
}

fn load_store(cli: &Cli) -> Result<ConfigStore> {
    let context = cli.context();
    tracing::debug!(?context, "simulated host context");

    let mut store = ConfigStore::builder(context)
        .notice_sink(TerminalSink)
        .build();
    if let Some(path) = &cli.layers {
        LayerFile::load(path)?.apply(&mut store)?;
    }
    Ok(store)
}

fn execute_command(store: &ConfigStore, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Resolve { json } => commands::run_resolve(store, json),
        Commands::Source { name, json } => commands::run_source(store, &name, json),
        Commands::Status { json } => commands::run_status(store, json),
    }
}
