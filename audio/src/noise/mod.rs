//! Seeded noise synthesis and overlay mixing.
//!
//! Three noise kinds are supported:
//!
//! - [`NoiseKind::White`]: independent standard normal draws
//! - [`NoiseKind::Pink`]: white noise shaped by `1/sqrt(f)` in the frequency
//!   domain, giving a `1/f` power spectrum
//! - [`NoiseKind::Impulse`]: sparse transients, one per thousand samples,
//!   with amplitudes drawn from `N(0, 5)`
//!
//! Every draw comes from a `StdRng` seeded with the caller's seed, so the
//! same `(kind, length, sample_rate, seed)` always yields the same signal.
//!
//! [`mix`] normalizes the synthesized noise to unit peak, scales it by the
//! requested level, adds it to the waveform and hard-clips to [-1.0, 1.0].

mod gaussian;
mod mix;
mod synth;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::AudioError;

pub use mix::{mix, normalize_peak, overlay};
pub use synth::{impulse_count, synthesize, IMPULSE_DENSITY, IMPULSE_STD_DEV, PINK_DC_HZ};

/// The spectral family of a synthesized noise signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoiseKind {
    White,
    Pink,
    Impulse,
}

impl NoiseKind {
    /// All supported kinds.
    pub const ALL: [NoiseKind; 3] = [NoiseKind::White, NoiseKind::Pink, NoiseKind::Impulse];

    /// Returns the lowercase name used in configuration and file names.
    pub fn as_str(&self) -> &'static str {
        match self {
            NoiseKind::White => "white",
            NoiseKind::Pink => "pink",
            NoiseKind::Impulse => "impulse",
        }
    }
}

impl fmt::Display for NoiseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NoiseKind {
    type Err = AudioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "white" => Ok(NoiseKind::White),
            "pink" => Ok(NoiseKind::Pink),
            "impulse" => Ok(NoiseKind::Impulse),
            other => Err(AudioError::InvalidArgument(format!(
                "unsupported noise type: {other:?} (expected white, pink or impulse)"
            ))),
        }
    }
}

/// Immutable noise configuration passed to [`mix`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseSpec {
    pub kind: NoiseKind,
    /// Peak amplitude of the overlaid noise. Must be positive.
    pub level: f64,
    pub seed: u64,
}

impl NoiseSpec {
    pub fn new(kind: NoiseKind, level: f64, seed: u64) -> Self {
        Self { kind, level, seed }
    }

    /// Returns a copy with a different seed.
    pub fn with_seed(self, seed: u64) -> Self {
        Self { seed, ..self }
    }

    /// Checks that the level is finite and positive.
    pub fn validate(&self) -> Result<(), AudioError> {
        if !self.level.is_finite() || self.level <= 0.0 {
            return Err(AudioError::InvalidArgument(format!(
                "noise level must be a positive number, got {}",
                self.level
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kind() {
        assert_eq!("white".parse::<NoiseKind>().unwrap(), NoiseKind::White);
        assert_eq!(" Pink ".parse::<NoiseKind>().unwrap(), NoiseKind::Pink);
        assert_eq!("IMPULSE".parse::<NoiseKind>().unwrap(), NoiseKind::Impulse);
        for kind in NoiseKind::ALL {
            assert_eq!(kind.to_string().parse::<NoiseKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_parse_unknown_kind() {
        let err = "brown".parse::<NoiseKind>().unwrap_err();
        assert!(matches!(err, AudioError::InvalidArgument(_)));
    }

    #[test]
    fn test_validate_level() {
        assert!(NoiseSpec::new(NoiseKind::White, 0.02, 42).validate().is_ok());
        assert!(NoiseSpec::new(NoiseKind::White, 0.0, 42).validate().is_err());
        assert!(NoiseSpec::new(NoiseKind::White, -0.1, 42).validate().is_err());
        assert!(NoiseSpec::new(NoiseKind::White, f64::NAN, 42).validate().is_err());
    }
}
