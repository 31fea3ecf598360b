//! Dataset partitioning command.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use serde::Serialize;

use kwsprep_corpus::{ClassSplit, Partition, ScanOptions, SplitRatio};

use super::{apply_ratio, apply_seed, output_result, print_warning, resolve_config};
use crate::Cli;

/// Split a balanced corpus and write label files.
///
/// Writes p_dev.json, p_test.json, p_train.json, n_dev.json, n_test.json
/// and n_train.json into LABEL_DIR.
#[derive(Args)]
pub struct PartitionCommand {
    /// Balanced corpus root
    balanced: PathBuf,

    /// Directory for the label files
    label_dir: PathBuf,

    /// dev:test:train weights, e.g. 1:1:8
    #[arg(long)]
    ratio: Option<SplitRatio>,

    /// Shuffle seed
    #[arg(long)]
    seed: Option<u64>,

    /// Fail instead of warning when the class sizes differ
    #[arg(long)]
    strict: bool,
}

impl PartitionCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let cfg = resolve_config(cli, |cfg| {
            apply_ratio(cfg, self.ratio);
            apply_seed(cfg, self.seed);
        })?;
        let summary = partition_and_write(
            &self.balanced,
            &self.label_dir,
            cfg.split_ratio()?,
            &cfg.scan_options()?,
            cfg.seed,
            self.strict,
        )?;
        output_result(cli, &summary)
    }
}

/// Per-split item counts of one class.
#[derive(Debug, Serialize)]
pub struct ClassCounts {
    pub dev: usize,
    pub test: usize,
    pub train: usize,
}

impl From<&ClassSplit> for ClassCounts {
    fn from(split: &ClassSplit) -> Self {
        let c = split.counts();
        Self {
            dev: c.dev,
            test: c.test,
            train: c.train,
        }
    }
}

impl fmt::Display for ClassCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dev {}, test {}, train {}", self.dev, self.test, self.train)
    }
}

/// Result of the partition stage.
#[derive(Debug, Serialize)]
pub struct PartitionSummary {
    pub ratio: String,
    pub positive: ClassCounts,
    pub negative: ClassCounts,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    pub label_files: Vec<PathBuf>,
}

impl PartitionSummary {
    fn new(partition: &Partition, label_files: Vec<PathBuf>) -> Self {
        Self {
            ratio: partition.ratio.to_string(),
            positive: (&partition.positive).into(),
            negative: (&partition.negative).into(),
            warnings: partition.warnings.iter().map(ToString::to_string).collect(),
            label_files,
        }
    }
}

impl fmt::Display for PartitionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "partition ({}):", self.ratio)?;
        writeln!(f, "  positive: {}", self.positive)?;
        writeln!(f, "  negative: {}", self.negative)?;
        write!(f, "  wrote {} label files", self.label_files.len())
    }
}

/// Partitions `balanced` and writes the six label files into `label_dir`.
///
/// With `strict`, a class imbalance is an error and nothing is written.
pub fn partition_and_write(
    balanced: &Path,
    label_dir: &Path,
    ratio: SplitRatio,
    opts: &ScanOptions,
    seed: u64,
    strict: bool,
) -> anyhow::Result<PartitionSummary> {
    let partition = kwsprep_corpus::partition(balanced, ratio, opts, seed)
        .with_context(|| format!("partition {} failed", balanced.display()))?;

    for w in &partition.warnings {
        if strict {
            anyhow::bail!("{w}");
        }
        print_warning(&w.to_string());
    }

    let files = kwsprep_corpus::write_labels(label_dir, &partition.labels())
        .with_context(|| format!("failed to write labels to {}", label_dir.display()))?;
    Ok(PartitionSummary::new(&partition, files))
}
