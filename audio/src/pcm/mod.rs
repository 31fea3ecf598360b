//! Mono PCM waveforms in the normalized amplitude domain.
//!
//! Samples are `f32` in [-1.0, 1.0]. Multi-channel sources are down-mixed
//! on read, so every [`Waveform`] is mono. WAV is read and written with
//! `hound`; other containers (FLAC, MP3, M4A/AAC) are decoded with
//! `symphonia` and can only be read.

mod decode;
mod wav;

use std::time::Duration;

pub use decode::{decode_file, read_audio};
pub use wav::{is_wav, read_wav, write_wav, WAV_BITS_PER_SAMPLE};

/// An ordered sequence of normalized samples paired with its sample rate.
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    pub samples: Vec<f32>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

impl Waveform {
    /// Creates a waveform from samples at the given rate.
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Returns the number of samples.
    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns true if the waveform holds no samples.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Returns the playback duration.
    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.samples.len() as f64 / self.sample_rate as f64)
    }

    /// Returns the largest absolute sample value, or 0 for an empty waveform.
    pub fn peak(&self) -> f32 {
        self.samples.iter().fold(0.0f32, |m, s| m.max(s.abs()))
    }
}
