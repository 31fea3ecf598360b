//! Full pipeline command.

use std::fmt;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use serde::Serialize;

use kwsprep_corpus::StageReport;

use super::partition::{partition_and_write, PartitionSummary};
use super::{apply_ratio, apply_seed, output_result, print_error, resolve_config, NoiseArgs};
use crate::Cli;

const BALANCED_DIR: &str = "balanced";
const LABELS_DIR: &str = "labels";

/// Run augment, balance and partition in sequence.
///
/// Augmented files are added to INPUT in place. The balanced copy goes to
/// WORK_DIR/balanced and the label files to WORK_DIR/labels.
#[derive(Args)]
pub struct RunCommand {
    /// Corpus root
    input: PathBuf,

    /// Working directory for the balanced corpus and labels
    work_dir: PathBuf,

    #[command(flatten)]
    noise: NoiseArgs,

    /// dev:test:train weights, e.g. 1:1:8
    #[arg(long)]
    ratio: Option<kwsprep_corpus::SplitRatio>,

    /// Seed for every stage
    #[arg(long)]
    seed: Option<u64>,

    /// Fail instead of warning when the class sizes differ
    #[arg(long)]
    strict: bool,
}

#[derive(Debug, Serialize)]
struct RunSummary {
    augment: StageReport,
    balance: StageReport,
    partition: PartitionSummary,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.augment)?;
        writeln!(f, "{}", self.balance)?;
        write!(f, "{}", self.partition)
    }
}

impl RunCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let cfg = resolve_config(cli, |cfg| {
            self.noise.apply(cfg);
            apply_ratio(cfg, self.ratio);
            apply_seed(cfg, self.seed);
        })?;
        let augment_opts = cfg.augment_options()?;
        let balanced = self.work_dir.join(BALANCED_DIR);
        let labels = self.work_dir.join(LABELS_DIR);

        tracing::info!(input = %self.input.display(), work_dir = %self.work_dir.display(), "run: starting");

        let augment = kwsprep_corpus::augment(&self.input, &self.input, &augment_opts)
            .with_context(|| format!("augment {} failed", self.input.display()))?;

        let balance =
            kwsprep_corpus::balance_dir(&self.input, &balanced, &augment_opts.scan, cfg.seed)
                .with_context(|| format!("balance {} failed", self.input.display()))?
                .report;

        let partition = partition_and_write(
            &balanced,
            &labels,
            cfg.split_ratio()?,
            &augment_opts.scan,
            cfg.seed,
            self.strict,
        )?;

        let summary = RunSummary {
            augment,
            balance,
            partition,
        };
        output_result(cli, &summary)?;
        if !cli.json {
            for f in summary.augment.failures.iter().chain(&summary.balance.failures) {
                print_error(&format!("{}: {}", f.path.display(), f.reason));
            }
        }
        Ok(())
    }
}
