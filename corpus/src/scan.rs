//! Corpus scanning and positive/negative classification.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::fsutil::walk_files;
use crate::{CorpusError, Result};

/// Filename prefixes that mark a file as a keyword utterance by default.
pub const DEFAULT_POSITIVE_PREFIXES: [&str; 2] = ["base", "aug"];

/// Audio extensions considered by default (lowercase, without the dot).
pub const DEFAULT_AUDIO_EXTENSIONS: [&str; 4] = ["wav", "flac", "mp3", "m4a"];

/// Whether an utterance contains the keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleClass {
    Positive,
    Negative,
}

impl SampleClass {
    /// Label id written to label records: 0 for the keyword, -1 otherwise.
    pub fn keyword_id(&self) -> i32 {
        match self {
            SampleClass::Positive => 0,
            SampleClass::Negative => -1,
        }
    }

    /// Short prefix used in label file names.
    pub fn short(&self) -> &'static str {
        match self {
            SampleClass::Positive => "p",
            SampleClass::Negative => "n",
        }
    }
}

impl fmt::Display for SampleClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleClass::Positive => f.write_str("positive"),
            SampleClass::Negative => f.write_str("negative"),
        }
    }
}

/// A classified audio file found by [`scan`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusEntry {
    /// Path relative to the scanned root. Preserved by every stage.
    pub relative_path: PathBuf,
    pub class: SampleClass,
    /// Absolute location of the file.
    pub source: PathBuf,
}

impl CorpusEntry {
    /// Returns the file name without its extension.
    pub fn stem(&self) -> String {
        self.relative_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Classification rules for [`scan`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    positive_prefixes: Vec<String>,
    extensions: Vec<String>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            positive_prefixes: DEFAULT_POSITIVE_PREFIXES.iter().map(|s| s.to_string()).collect(),
            extensions: DEFAULT_AUDIO_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ScanOptions {
    /// Creates scan options.
    ///
    /// Extensions are matched case-insensitively and may be given with or
    /// without a leading dot. Both sets must be non-empty.
    pub fn new<P, E>(positive_prefixes: P, extensions: E) -> Result<Self>
    where
        P: IntoIterator,
        P::Item: Into<String>,
        E: IntoIterator,
        E::Item: Into<String>,
    {
        let positive_prefixes: Vec<String> = positive_prefixes
            .into_iter()
            .map(Into::into)
            .filter(|p| !p.is_empty())
            .collect();
        let extensions: Vec<String> = extensions
            .into_iter()
            .map(|e| e.into().trim_start_matches('.').to_ascii_lowercase())
            .filter(|e| !e.is_empty())
            .collect();

        if positive_prefixes.is_empty() {
            return Err(CorpusError::InvalidArgument(
                "at least one positive prefix is required".into(),
            ));
        }
        if extensions.is_empty() {
            return Err(CorpusError::InvalidArgument(
                "at least one audio extension is required".into(),
            ));
        }
        Ok(Self {
            positive_prefixes,
            extensions,
        })
    }

    pub fn positive_prefixes(&self) -> &[String] {
        &self.positive_prefixes
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Returns true if the file's extension is an accepted audio extension.
    pub fn is_audio(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|x| x.eq_ignore_ascii_case(ext)))
    }

    /// Classifies a file, or returns `None` if it is not an audio file.
    pub fn classify(&self, path: &Path) -> Option<SampleClass> {
        if !self.is_audio(path) {
            return None;
        }
        let name = path.file_name()?.to_string_lossy();
        if self.positive_prefixes.iter().any(|p| name.starts_with(p.as_str())) {
            Some(SampleClass::Positive)
        } else {
            Some(SampleClass::Negative)
        }
    }
}

/// Classified contents of a corpus directory.
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    /// Positive entries, sorted by relative path.
    pub positive: Vec<CorpusEntry>,
    /// Negative entries, sorted by relative path.
    pub negative: Vec<CorpusEntry>,
    /// Number of files skipped for not being audio.
    pub skipped: usize,
}

impl ScanResult {
    /// Returns the entries of one class.
    pub fn entries(&self, class: SampleClass) -> &[CorpusEntry] {
        match class {
            SampleClass::Positive => &self.positive,
            SampleClass::Negative => &self.negative,
        }
    }

    /// Returns the utterance stems of one class, in scan order.
    pub fn stems(&self, class: SampleClass) -> Vec<String> {
        self.entries(class).iter().map(CorpusEntry::stem).collect()
    }
}

/// Walks `root` recursively and classifies every audio file.
///
/// Entries come back sorted by relative path, independent of the order
/// in which the operating system lists directories.
pub fn scan(root: impl AsRef<Path>, opts: &ScanOptions) -> Result<ScanResult> {
    let root = root.as_ref();
    let root = fs::canonicalize(root).map_err(|e| CorpusError::io(root, e))?;
    if !root.is_dir() {
        return Err(CorpusError::InvalidArgument(format!(
            "{} is not a directory",
            root.display()
        )));
    }

    let files = walk_files(&root).map_err(|e| CorpusError::io(&root, e))?;

    let mut result = ScanResult::default();
    for source in files {
        let Some(class) = opts.classify(&source) else {
            debug!(path = %source.display(), "scan: skipping non-audio file");
            result.skipped += 1;
            continue;
        };
        let relative_path = source
            .strip_prefix(&root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| source.clone());
        let entry = CorpusEntry {
            relative_path,
            class,
            source,
        };
        match class {
            SampleClass::Positive => result.positive.push(entry),
            SampleClass::Negative => result.negative.push(entry),
        }
    }

    result.positive.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    result.negative.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));

    info!(
        root = %root.display(),
        positive = result.positive.len(),
        negative = result.negative.len(),
        skipped = result.skipped,
        "scan: complete"
    );
    Ok(result)
}
