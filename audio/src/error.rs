use thiserror::Error;

/// Errors returned by audio operations.
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Noise normalization found a peak amplitude of zero.
    #[error("degenerate signal: noise has zero peak amplitude and cannot be normalized")]
    DegenerateSignal,

    #[error("unsupported audio format: {0}")]
    UnsupportedFormat(String),

    #[error("wav: {0}")]
    Wav(#[from] hound::Error),

    #[error("decode: {0}")]
    Decode(#[from] symphonia::core::errors::Error),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}
