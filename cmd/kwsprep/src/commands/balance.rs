//! Class balancing command.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use super::{apply_seed, print_report, print_success, resolve_config};
use crate::Cli;

/// Build a class-balanced copy of a corpus.
///
/// All positives are copied together with an equal number of randomly
/// chosen negatives. OUTPUT is cleared first and must not contain INPUT.
#[derive(Args)]
pub struct BalanceCommand {
    /// Corpus root to read
    input: PathBuf,

    /// Directory for the balanced copy
    output: PathBuf,

    /// Negative sampling seed
    #[arg(long)]
    seed: Option<u64>,
}

impl BalanceCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let cfg = resolve_config(cli, |cfg| apply_seed(cfg, self.seed))?;
        let opts = cfg.scan_options()?;

        let outcome = kwsprep_corpus::balance_dir(&self.input, &self.output, &opts, cfg.seed)
            .with_context(|| format!("balance {} failed", self.input.display()))?;

        if !cli.json {
            print_success(&format!(
                "kept {} positive, sampled {} of {} negative",
                outcome.positive,
                outcome.sampled_negatives.len(),
                outcome.negative_pool
            ));
        }
        print_report(cli, &outcome.report)
    }
}
