use std::io;
use std::path::PathBuf;

use kwsprep_audio::AudioError;
use thiserror::Error;

/// Errors returned by corpus operations.
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("corpus: invalid argument: {0}")]
    InvalidArgument(String),

    /// Balancing needs at least as many negatives as positives.
    #[error("corpus: insufficient samples: {negative} negatives cannot match {positive} positives 1:1")]
    InsufficientSamples { positive: usize, negative: usize },

    #[error("corpus: audio error: {0}")]
    Audio(#[from] AudioError),

    #[error("corpus: io error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("corpus: serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CorpusError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        CorpusError::Io {
            path: path.into(),
            source,
        }
    }
}
