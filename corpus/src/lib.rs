//! Keyword-spotting corpus preparation.
//!
//! # Pipeline
//!
//! ```text
//! raw corpus
//!     │  augment    (noise overlay on positive files)
//!     ▼
//! augmented corpus
//!     │  scan + balance    (all positives, equal-sized negative sample)
//!     ▼
//! balanced corpus
//!     │  scan + partition  (per-class shuffle, dev/test/train slices)
//!     ▼
//! p_dev.json  p_test.json  p_train.json
//! n_dev.json  n_test.json  n_train.json
//! ```
//!
//! Every random choice is driven by an explicit `u64` seed and every
//! directory walk is sorted by relative path, so a fixed seed reproduces
//! the same corpus and the same labels on any machine.

mod augment;
mod balance;
mod error;
mod fsutil;
mod label;
mod partition;
mod report;
mod scan;
mod seed;

pub use augment::{augment, augmented_path, AugmentOptions};
pub use balance::{balance, balance_dir, select_balanced, BalanceOutcome};
pub use error::CorpusError;
pub use label::{label_sets, to_json, write_labels, LabelRecord, LabelSet};
pub use partition::{
    partition, split_class, ClassSplit, Partition, PartitionWarning, Split, SplitCounts,
    SplitRatio,
};
pub use report::{Failure, ItemOutcome, StageReport};
pub use scan::{
    scan, CorpusEntry, SampleClass, ScanOptions, ScanResult, DEFAULT_AUDIO_EXTENSIONS,
    DEFAULT_POSITIVE_PREFIXES,
};
pub use seed::{derive_seed, path_key, SeedMode};

/// Result type for corpus operations.
pub type Result<T> = std::result::Result<T, CorpusError>;
