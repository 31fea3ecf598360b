//! Ratio-based dev/test/train partitioning of a balanced corpus.
//!
//! Each class is split independently. Split sizes are
//! `dev = floor(n * d / total)`, `test = floor(n * t / total)` and
//! `train = n - dev - test`, so train absorbs all rounding and the three
//! sizes always sum to `n`. Each class's stems are shuffled with a
//! generator freshly seeded from the same seed, then sliced in order.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{info, warn};

use crate::label::{label_sets, LabelSet};
use crate::scan::{scan, SampleClass, ScanOptions};
use crate::{CorpusError, Result};

/// One of the three dataset subsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Split {
    Dev,
    Test,
    Train,
}

impl Split {
    pub const ALL: [Split; 3] = [Split::Dev, Split::Test, Split::Train];

    pub fn as_str(&self) -> &'static str {
        match self {
            Split::Dev => "dev",
            Split::Test => "test",
            Split::Train => "train",
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Relative weights of the dev, test and train subsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitRatio {
    dev: u32,
    test: u32,
    train: u32,
}

impl Default for SplitRatio {
    fn default() -> Self {
        Self {
            dev: 1,
            test: 1,
            train: 8,
        }
    }
}

impl SplitRatio {
    /// Creates a ratio; every component must be positive.
    pub fn new(dev: u32, test: u32, train: u32) -> Result<Self> {
        if dev == 0 || test == 0 || train == 0 {
            return Err(CorpusError::InvalidArgument(format!(
                "split ratio components must be positive, got {dev}:{test}:{train}"
            )));
        }
        Ok(Self { dev, test, train })
    }

    pub fn dev(&self) -> u32 {
        self.dev
    }

    pub fn test(&self) -> u32 {
        self.test
    }

    pub fn train(&self) -> u32 {
        self.train
    }

    pub fn total(&self) -> u64 {
        self.dev as u64 + self.test as u64 + self.train as u64
    }

    /// Computes split sizes for a class of `n` items.
    pub fn counts(&self, n: usize) -> SplitCounts {
        let total = self.total();
        let dev = (n as u64 * self.dev as u64 / total) as usize;
        let test = (n as u64 * self.test as u64 / total) as usize;
        SplitCounts {
            dev,
            test,
            train: n - dev - test,
        }
    }
}

impl fmt::Display for SplitRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.dev, self.test, self.train)
    }
}

impl FromStr for SplitRatio {
    type Err = CorpusError;

    /// Parses `d:t:r` (commas are also accepted as separators).
    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split([':', ',']).map(str::trim).collect();
        let [d, t, r] = parts.as_slice() else {
            return Err(CorpusError::InvalidArgument(format!(
                "split ratio must have three components, got {s:?}"
            )));
        };
        let parse = |v: &str| {
            v.parse::<u32>().map_err(|_| {
                CorpusError::InvalidArgument(format!("invalid split ratio component {v:?}"))
            })
        };
        SplitRatio::new(parse(*d)?, parse(*t)?, parse(*r)?)
    }
}

/// Number of items assigned to each subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitCounts {
    pub dev: usize,
    pub test: usize,
    pub train: usize,
}

impl SplitCounts {
    pub fn total(&self) -> usize {
        self.dev + self.test + self.train
    }
}

/// The dev/test/train assignment of one class.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassSplit {
    pub dev: Vec<String>,
    pub test: Vec<String>,
    pub train: Vec<String>,
}

impl ClassSplit {
    pub fn get(&self, split: Split) -> &[String] {
        match split {
            Split::Dev => &self.dev,
            Split::Test => &self.test,
            Split::Train => &self.train,
        }
    }

    pub fn counts(&self) -> SplitCounts {
        SplitCounts {
            dev: self.dev.len(),
            test: self.test.len(),
            train: self.train.len(),
        }
    }
}

/// Shuffles `stems` with a generator seeded by `seed` and slices it into
/// dev, test and train in that order.
pub fn split_class(mut stems: Vec<String>, ratio: SplitRatio, seed: u64) -> ClassSplit {
    let counts = ratio.counts(stems.len());

    let mut rng = StdRng::seed_from_u64(seed);
    stems.shuffle(&mut rng);

    let train = stems.split_off(counts.dev + counts.test);
    let test = stems.split_off(counts.dev);
    ClassSplit {
        dev: stems,
        test,
        train,
    }
}

/// A non-fatal condition found while partitioning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartitionWarning {
    /// The corpus is expected to be balanced but the class sizes differ.
    ClassImbalance { positive: usize, negative: usize },
}

impl fmt::Display for PartitionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PartitionWarning::ClassImbalance { positive, negative } => write!(
                f,
                "class imbalance: {positive} positive vs {negative} negative; splitting anyway"
            ),
        }
    }
}

/// Split assignment for both classes of a balanced corpus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    pub ratio: SplitRatio,
    pub positive: ClassSplit,
    pub negative: ClassSplit,
    pub warnings: Vec<PartitionWarning>,
}

impl Partition {
    pub fn class(&self, class: SampleClass) -> &ClassSplit {
        match class {
            SampleClass::Positive => &self.positive,
            SampleClass::Negative => &self.negative,
        }
    }

    /// Builds the six label collections.
    pub fn labels(&self) -> Vec<LabelSet> {
        label_sets(self)
    }
}

/// Scans `balanced_root` and splits each class by `ratio`.
///
/// Unequal class sizes produce a [`PartitionWarning::ClassImbalance`] in
/// the result rather than an error.
pub fn partition(
    balanced_root: impl AsRef<Path>,
    ratio: SplitRatio,
    opts: &ScanOptions,
    seed: u64,
) -> Result<Partition> {
    let scanned = scan(balanced_root, opts)?;
    let positive = scanned.stems(SampleClass::Positive);
    let negative = scanned.stems(SampleClass::Negative);

    let mut warnings = Vec::new();
    if positive.len() != negative.len() {
        let w = PartitionWarning::ClassImbalance {
            positive: positive.len(),
            negative: negative.len(),
        };
        warn!("partition: {w}");
        warnings.push(w);
    }

    let positive = split_class(positive, ratio, seed);
    let negative = split_class(negative, ratio, seed);

    for (class, split) in [(SampleClass::Positive, &positive), (SampleClass::Negative, &negative)] {
        let c = split.counts();
        info!(
            %class,
            %ratio,
            dev = c.dev,
            test = c.test,
            train = c.train,
            "partition: class split"
        );
    }

    Ok(Partition {
        ratio,
        positive,
        negative,
        warnings,
    })
}
