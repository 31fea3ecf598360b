//! Noise augmentation command.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use super::{apply_seed, print_report, resolve_config, NoiseArgs};
use crate::Cli;

/// Add noise-augmented copies of keyword utterances.
///
/// Every positive file under INPUT is mixed with synthetic noise and written
/// under OUTPUT at the same relative path, named
/// `{stem}_{noise}_noise{level}{ext}`. OUTPUT may equal INPUT.
#[derive(Args)]
pub struct AugmentCommand {
    /// Corpus root to read
    input: PathBuf,

    /// Root to write augmented files into
    output: PathBuf,

    #[command(flatten)]
    noise: NoiseArgs,

    /// Noise seed
    #[arg(long)]
    seed: Option<u64>,
}

impl AugmentCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let cfg = resolve_config(cli, |cfg| {
            self.noise.apply(cfg);
            apply_seed(cfg, self.seed);
        })?;
        let opts = cfg.augment_options()?;

        let report = kwsprep_corpus::augment(&self.input, &self.output, &opts)
            .with_context(|| format!("augment {} failed", self.input.display()))?;
        print_report(cli, &report)
    }
}
