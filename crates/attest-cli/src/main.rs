//! Attest CLI — Verify passport attestation submissions.
//!
//! Subcommands: init, verify, checks.

mod commands;
mod config;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use config::AttestConfig;

/// Attest — aggregated verification reports for passport attestations.
#[derive(Parser, Debug)]
#[command(name = "attest", version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, global = true, default_value = "attest.toml")]
    config: PathBuf,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a default configuration file.
    Init(commands::init::InitArgs),
    /// Verify a submission and print the aggregated report.
    Verify(commands::verify::VerifyArgs),
    /// List the check vocabulary.
    Checks(commands::checks::ChecksArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = config_for(&cli.command, &cli.config)?;
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
    init_tracing(&config);

    match &cli.command {
        Commands::Init(args) => commands::init::run(args, &cli.config),
        Commands::Verify(args) => commands::verify::run(args, &config).await,
        Commands::Checks(args) => commands::checks::run(args),
    }
}

/// Only `verify` reads the config file, so `init --force` can replace a
/// broken one.
fn config_for(command: &Commands, path: &Path) -> anyhow::Result<AttestConfig> {
    match command {
        Commands::Verify(_) => AttestConfig::load(path),
        Commands::Init(_) | Commands::Checks(_) => Ok(AttestConfig::default()),
    }
}

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
/// Logs go to stderr so stdout carries only the report.
fn init_tracing(config: &AttestConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    if config.logging.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}
