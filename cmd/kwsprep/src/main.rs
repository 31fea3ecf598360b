//! kwsprep - keyword-spotting corpus preparation.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{AugmentCommand, BalanceCommand, ConfigCommand, PartitionCommand, RunCommand};

/// kwsprep - prepare a keyword-spotting corpus for training.
///
/// The pipeline has three stages:
///   - augment: overlay synthetic noise on keyword utterances
///   - balance: pair every positive with a random negative
///   - partition: split both classes into dev/test/train label files
///
/// Options are read from ~/.kwsprep/config.yaml (or --config) and can be
/// overridden per command.
#[derive(Parser)]
#[command(name = "kwsprep")]
#[command(about = "Keyword-spotting corpus preparation tool")]
#[command(version)]
pub struct Cli {
    /// Config file (default is ~/.kwsprep/config.yaml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output as JSON (for piping)
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add noise-augmented copies of keyword utterances
    Augment(AugmentCommand),
    /// Build a class-balanced copy of a corpus
    Balance(BalanceCommand),
    /// Split a balanced corpus and write label files
    Partition(PartitionCommand),
    /// Run augment, balance and partition in sequence
    Run(RunCommand),
    /// Manage configuration
    Config(ConfigCommand),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match &cli.command {
        Commands::Augment(cmd) => cmd.run(&cli),
        Commands::Balance(cmd) => cmd.run(&cli),
        Commands::Partition(cmd) => cmd.run(&cli),
        Commands::Run(cmd) => cmd.run(&cli),
        Commands::Config(cmd) => cmd.run(&cli),
    }
}
