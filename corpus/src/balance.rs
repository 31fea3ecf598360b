//! 1:1 positive/negative balancing.
//!
//! All positive entries are kept. An equal number of negatives is drawn
//! uniformly without replacement from a generator seeded with the caller's
//! seed, and the selection is copied into a freshly reset output root at
//! the original relative paths.

use std::fs;
use std::path::Path;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};

use crate::fsutil::{copy_with_metadata, reset_dir};
use crate::report::{ItemOutcome, StageReport};
use crate::scan::{scan, CorpusEntry, ScanOptions};
use crate::{CorpusError, Result};

const PROGRESS_EVERY: usize = 1000;

/// Outcome of a balancing run.
#[derive(Debug, Clone)]
pub struct BalanceOutcome {
    pub report: StageReport,
    pub positive: usize,
    /// Size of the negative pool the sample was drawn from.
    pub negative_pool: usize,
    /// The sampled negatives, in draw order.
    pub sampled_negatives: Vec<CorpusEntry>,
}

impl BalanceOutcome {
    /// Number of files copied successfully.
    pub fn copied(&self) -> usize {
        self.report.processed
    }
}

/// Selects all positives followed by `positive.len()` sampled negatives.
///
/// Fails with [`CorpusError::InsufficientSamples`] if there are fewer
/// negatives than positives.
pub fn select_balanced(
    positive: &[CorpusEntry],
    negative: &[CorpusEntry],
    seed: u64,
) -> Result<Vec<CorpusEntry>> {
    if negative.len() < positive.len() {
        return Err(CorpusError::InsufficientSamples {
            positive: positive.len(),
            negative: negative.len(),
        });
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let picked = rand::seq::index::sample(&mut rng, negative.len(), positive.len());

    let mut selected = Vec::with_capacity(positive.len() * 2);
    selected.extend_from_slice(positive);
    selected.extend(picked.into_iter().map(|i| negative[i].clone()));
    Ok(selected)
}

/// Balances the given entries into `output_root`.
///
/// Validation happens before any filesystem change: on
/// [`CorpusError::InsufficientSamples`] or an output root that would
/// swallow the source files, `output_root` is left untouched. Otherwise the
/// output root is removed and recreated empty, and every selected entry is
/// copied to its relative path. Copy failures are logged and counted; they
/// do not stop the run.
pub fn balance(
    positive: &[CorpusEntry],
    negative: &[CorpusEntry],
    seed: u64,
    output_root: impl AsRef<Path>,
) -> Result<BalanceOutcome> {
    let output_root = output_root.as_ref();
    let selected = select_balanced(positive, negative, seed)?;
    check_disjoint(output_root, positive.iter().chain(negative))?;

    info!(
        positive = positive.len(),
        negative_pool = negative.len(),
        sampled = positive.len(),
        total = selected.len(),
        "balance: selection drawn"
    );

    reset_dir(output_root).map_err(|e| CorpusError::io(output_root, e))?;

    let mut report = StageReport::new("balance");
    for entry in &selected {
        let dest = output_root.join(&entry.relative_path);
        let outcome = match copy_with_metadata(&entry.source, &dest) {
            Ok(()) => ItemOutcome::Done,
            Err(e) => {
                warn!(path = %entry.source.display(), error = %e, "balance: copy failed");
                ItemOutcome::Failed(e.to_string())
            }
        };
        report.record(&entry.source, outcome);

        if report.processed > 0 && report.processed % PROGRESS_EVERY == 0 {
            info!(copied = report.processed, total = selected.len(), "balance: progress");
        }
    }

    info!(
        output = %output_root.display(),
        copied = report.processed,
        failed = report.failed,
        "balance: complete"
    );

    Ok(BalanceOutcome {
        report,
        positive: positive.len(),
        negative_pool: negative.len(),
        sampled_negatives: selected[positive.len()..].to_vec(),
    })
}

/// Scans `input_root` and balances it into `output_root`.
pub fn balance_dir(
    input_root: impl AsRef<Path>,
    output_root: impl AsRef<Path>,
    opts: &ScanOptions,
    seed: u64,
) -> Result<BalanceOutcome> {
    let scanned = scan(input_root, opts)?;
    let mut outcome = balance(&scanned.positive, &scanned.negative, seed, output_root)?;
    outcome.report.add_skipped(scanned.skipped);
    Ok(outcome)
}

/// Rejects an output root that contains any source file, since resetting
/// it would delete the corpus being balanced.
fn check_disjoint<'a>(
    output_root: &Path,
    entries: impl IntoIterator<Item = &'a CorpusEntry>,
) -> Result<()> {
    let Ok(out) = fs::canonicalize(output_root) else {
        // A root that does not exist yet cannot contain anything.
        return Ok(());
    };
    if let Some(entry) = entries.into_iter().find(|e| e.source.starts_with(&out)) {
        return Err(CorpusError::InvalidArgument(format!(
            "output root {} contains source file {}; choose a separate directory",
            out.display(),
            entry.source.display()
        )));
    }
    Ok(())
}
