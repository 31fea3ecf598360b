//! Noise overlay with peak normalization and hard clipping.

use super::{synthesize, NoiseSpec};
use crate::{AudioError, Waveform};

/// Overlays synthesized noise onto `waveform`.
///
/// The noise is generated for the waveform's length and sample rate,
/// normalized to unit peak, scaled by `spec.level` and added sample by
/// sample. The sum is clipped to [-1.0, 1.0]. The result keeps the input's
/// sample rate and length.
///
/// Fails with [`AudioError::DegenerateSignal`] when the synthesized noise
/// is all zeros, e.g. impulse noise over fewer than 1000 samples.
pub fn mix(waveform: &Waveform, spec: &NoiseSpec) -> Result<Waveform, AudioError> {
    spec.validate()?;

    let mut noise = synthesize(spec.kind, waveform.len(), waveform.sample_rate, spec.seed)?;
    normalize_peak(&mut noise)?;

    Ok(Waveform::new(
        overlay(&waveform.samples, &noise, spec.level),
        waveform.sample_rate,
    ))
}

/// Divides every element by the largest absolute value, in place.
pub fn normalize_peak(signal: &mut [f64]) -> Result<(), AudioError> {
    let peak = signal.iter().fold(0.0f64, |m, v| m.max(v.abs()));
    if peak == 0.0 || !peak.is_finite() {
        return Err(AudioError::DegenerateSignal);
    }
    for v in signal.iter_mut() {
        *v /= peak;
    }
    Ok(())
}

/// Computes `clip(samples[i] + level * noise[i])` for every index.
///
/// The output has the length of the shorter input.
pub fn overlay(samples: &[f32], noise: &[f64], level: f64) -> Vec<f32> {
    samples
        .iter()
        .zip(noise)
        .map(|(&s, &n)| (s as f64 + level * n).clamp(-1.0, 1.0) as f32)
        .collect()
}
