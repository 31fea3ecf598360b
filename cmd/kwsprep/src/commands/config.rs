//! Configuration management commands.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Subcommand};

use kwsprep_cli::{default_config_path, save_config, PrepConfig};

use super::{get_config, print_success};
use crate::Cli;

/// Manage configuration.
///
/// Configuration is stored in ~/.kwsprep/config.yaml unless --config is
/// given. YAML and JSON are both accepted.
#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    command: ConfigSubcommand,
}

#[derive(Subcommand)]
enum ConfigSubcommand {
    /// Print the effective configuration
    Show,
    /// Write the default configuration to the config path
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

impl ConfigCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        match &self.command {
            ConfigSubcommand::Show => self.show(cli),
            ConfigSubcommand::Init { force } => self.init(cli, *force),
        }
    }

    fn show(&self, cli: &Cli) -> anyhow::Result<()> {
        let loaded = get_config(cli)?;
        match &loaded.source {
            Some(path) => eprintln!("# source: {}", path.display()),
            None => eprintln!("# source: built-in defaults"),
        }
        let rendered = if cli.json {
            serde_json::to_string_pretty(&loaded.config)?
        } else {
            serde_yaml::to_string(&loaded.config)?
        };
        println!("{}", rendered.trim_end());
        Ok(())
    }

    fn init(&self, cli: &Cli, force: bool) -> anyhow::Result<()> {
        let path: PathBuf = match &cli.config {
            Some(p) => p.clone(),
            None => default_config_path().context("cannot determine home directory")?,
        };
        if path.exists() && !force {
            anyhow::bail!(
                "{} already exists; use --force to overwrite",
                path.display()
            );
        }
        save_config(&path, &PrepConfig::default())
            .with_context(|| format!("failed to write {}", path.display()))?;
        print_success(&format!("wrote default config to {}", path.display()));
        Ok(())
    }
}
