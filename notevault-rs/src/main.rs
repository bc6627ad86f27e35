//! notevault CLI entry point.

use clap::Parser;
use notevault::cli::args::{Cli, Commands};
use notevault::cli::output::Output;
use notevault::cli::{create, delete, list, search, show, tags, update, watch};
use notevault::config::Config;
use notevault::error::{Result, exit_code};
use notevault::vault::Vault;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(&cli) {
        Ok(()) => ExitCode::from(exit_code::SUCCESS as u8),
        Err(e) => {
            if !cli.quiet {
                eprintln!("Error: {}", e);
            }
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

fn init_tracing(cli: &Cli) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let vault_path = config.resolve_vault_path(cli.vault.as_deref())?;
    let vault = Arc::new(Vault::with_config(vault_path, config.vault.clone())?);
    let report = vault.load()?;
    debug!(
        loaded = report.loaded,
        skipped = report.skipped,
        degraded = report.degraded,
        "vault loaded"
    );

    let output = Output::new(cli.output_format(), cli.quiet);

    match &cli.command {
        Commands::List(args) => list::run(&vault, args, &output),
        Commands::Show(args) => show::run(&vault, args, &output),
        Commands::Create(args) => create::run(&vault, args, &output),
        Commands::Update(args) => update::run(&vault, args, &output),
        Commands::Delete(args) => delete::run(&vault, args, &output),
        Commands::Search(args) => search::run(&vault, args, &output),
        Commands::Tags => tags::run(&vault, &output),
        Commands::Watch(args) => watch::run(Arc::clone(&vault), &config.sync, args, &output),
    }
}
