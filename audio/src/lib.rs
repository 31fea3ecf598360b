//! Waveform I/O and seeded noise synthesis.
//!
//! This crate provides:
//!
//! - `pcm`: the [`Waveform`] type, WAV read/write and decoding of other
//!   formats
//! - `noise`: white, pink and impulse noise synthesis and overlay mixing
//!
//! # Example
//!
//! ```rust
//! use kwsprep_audio::noise::{mix, NoiseKind, NoiseSpec};
//! use kwsprep_audio::Waveform;
//!
//! let clean = Waveform::new(vec![0.25; 16000], 16000);
//! let spec = NoiseSpec::new(NoiseKind::White, 0.02, 42);
//!
//! let noisy = mix(&clean, &spec).unwrap();
//! assert_eq!(noisy.len(), clean.len());
//! assert!(noisy.samples.iter().all(|s| (-1.0..=1.0).contains(s)));
//! ```

mod error;
pub mod noise;
pub mod pcm;

pub use error::AudioError;
pub use pcm::Waveform;
