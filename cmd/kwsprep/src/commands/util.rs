//! Utility functions for CLI commands.

use anyhow::Context;
use clap::Args;
use serde::Serialize;
use std::fmt::Display;

use kwsprep_audio::noise::NoiseKind;
use kwsprep_cli::{load_config, LoadedConfig, Output, OutputFormat, PrepConfig};
use kwsprep_corpus::{SeedMode, SplitRatio, StageReport};

use crate::Cli;

/// Noise options shared by `augment` and `run`.
#[derive(Args, Debug, Clone, Default)]
pub struct NoiseArgs {
    /// Noise type: white, pink or impulse
    #[arg(long)]
    pub noise_type: Option<NoiseKind>,

    /// Peak amplitude of the overlaid noise
    #[arg(long)]
    pub noise_level: Option<f64>,

    /// Per-file seed derivation: shared or per-file
    #[arg(long)]
    pub seed_mode: Option<SeedMode>,
}

impl NoiseArgs {
    pub fn apply(&self, cfg: &mut PrepConfig) {
        if let Some(kind) = self.noise_type {
            cfg.noise_type = kind;
        }
        if let Some(level) = self.noise_level {
            cfg.noise_level = level;
        }
        if let Some(mode) = self.seed_mode {
            cfg.seed_mode = mode;
        }
    }
}

/// Loads the configuration named by `--config`, or the default one.
pub fn get_config(cli: &Cli) -> anyhow::Result<LoadedConfig> {
    let loaded = load_config(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(path) = &loaded.source {
        tracing::debug!(path = %path.display(), "loaded config");
    }
    Ok(loaded)
}

/// Loads configuration, applies command-line overrides and validates the
/// result.
pub fn resolve_config(
    cli: &Cli,
    overrides: impl FnOnce(&mut PrepConfig),
) -> anyhow::Result<PrepConfig> {
    let mut cfg = get_config(cli)?.config;
    overrides(&mut cfg);
    cfg.validate().context("invalid configuration")?;
    Ok(cfg)
}

pub fn apply_seed(cfg: &mut PrepConfig, seed: Option<u64>) {
    if let Some(seed) = seed {
        cfg.seed = seed;
    }
}

pub fn apply_ratio(cfg: &mut PrepConfig, ratio: Option<SplitRatio>) {
    if let Some(r) = ratio {
        cfg.split_ratio = [r.dev(), r.test(), r.train()];
    }
}

/// Returns the output renderer selected by `--json`.
pub fn output(cli: &Cli) -> Output {
    Output::new(if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    })
}

/// Writes a result to stdout in the selected format.
pub fn output_result<T: Serialize + Display>(cli: &Cli, value: &T) -> anyhow::Result<()> {
    output(cli)
        .write(value)
        .context("failed to write output")
}

/// Prints a stage report, listing failed files in text mode.
pub fn print_report(cli: &Cli, report: &StageReport) -> anyhow::Result<()> {
    output_result(cli, report)?;
    if !cli.json {
        for f in &report.failures {
            print_error(&format!("{}: {}", f.path.display(), f.reason));
        }
    }
    Ok(())
}

/// Prints success message.
pub fn print_success(msg: &str) {
    eprintln!("\x1b[32m✓\x1b[0m {}", msg);
}

/// Prints warning message.
pub fn print_warning(msg: &str) {
    eprintln!("\x1b[33m!\x1b[0m {}", msg);
}

/// Prints error message.
pub fn print_error(msg: &str) {
    eprintln!("\x1b[31m✗\x1b[0m {}", msg);
}
