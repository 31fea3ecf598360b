//! Per-stage outcome aggregation.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Result of processing a single file in a batch stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    Done,
    Skipped(String),
    Failed(String),
}

/// A file that failed during a batch stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub path: PathBuf,
    pub reason: String,
}

/// Success, skip and failure counts for one batch stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StageReport {
    pub stage: String,
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<Failure>,
}

impl StageReport {
    pub fn new(stage: impl Into<String>) -> Self {
        Self {
            stage: stage.into(),
            ..Default::default()
        }
    }

    /// Records the outcome for one file.
    pub fn record(&mut self, path: &Path, outcome: ItemOutcome) {
        match outcome {
            ItemOutcome::Done => self.processed += 1,
            ItemOutcome::Skipped(_) => self.skipped += 1,
            ItemOutcome::Failed(reason) => {
                self.failed += 1;
                self.failures.push(Failure {
                    path: path.to_path_buf(),
                    reason,
                });
            }
        }
    }

    /// Adds `n` skips that were counted elsewhere, e.g. by a scan.
    pub fn add_skipped(&mut self, n: usize) {
        self.skipped += n;
    }

    /// Total number of files seen.
    pub fn total(&self) -> usize {
        self.processed + self.skipped + self.failed
    }

    /// Returns true if nothing failed.
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

impl fmt::Display for StageReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} processed, {} skipped, {} failed",
            self.stage, self.processed, self.skipped, self.failed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_display() {
        let mut r = StageReport::new("balance");
        r.record(Path::new("a.wav"), ItemOutcome::Done);
        r.record(Path::new("b.wav"), ItemOutcome::Done);
        r.record(Path::new("c.txt"), ItemOutcome::Skipped("not audio".into()));
        r.record(Path::new("d.wav"), ItemOutcome::Failed("permission denied".into()));
        r.add_skipped(2);

        assert_eq!(r.total(), 6);
        assert!(!r.is_clean());
        assert_eq!(r.failures[0].path, PathBuf::from("d.wav"));
        assert_eq!(r.to_string(), "balance: 2 processed, 3 skipped, 1 failed");
    }
}
