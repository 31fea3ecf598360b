//! Noise signal generation.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

use super::gaussian::Gaussian;
use super::NoiseKind;
use crate::AudioError;

/// Frequency substituted for the DC bin when shaping pink noise.
pub const PINK_DC_HZ: f64 = 1e-8;

/// Impulses per sample for impulse noise.
pub const IMPULSE_DENSITY: f64 = 0.001;

/// Standard deviation of impulse amplitudes.
pub const IMPULSE_STD_DEV: f64 = 5.0;

/// Generates `length` samples of noise of the given kind.
///
/// `sample_rate` sets the bin frequencies used to shape pink noise; it must
/// be positive for every kind.
pub fn synthesize(
    kind: NoiseKind,
    length: usize,
    sample_rate: u32,
    seed: u64,
) -> Result<Vec<f64>, AudioError> {
    if sample_rate == 0 {
        return Err(AudioError::InvalidArgument("sample rate must be positive".into()));
    }

    let mut gauss = Gaussian::new(StdRng::seed_from_u64(seed));
    let noise = match kind {
        NoiseKind::White => white(&mut gauss, length),
        NoiseKind::Pink => shape_pink(white(&mut gauss, length), sample_rate),
        NoiseKind::Impulse => impulse(&mut gauss, length),
    };
    Ok(noise)
}

/// Returns the number of impulse positions drawn for a signal of `length`.
///
/// Positions are drawn with replacement, so the signal may end up with
/// fewer distinct non-zero samples than this.
pub fn impulse_count(length: usize) -> usize {
    (length as f64 * IMPULSE_DENSITY) as usize
}

fn white(gauss: &mut Gaussian<StdRng>, length: usize) -> Vec<f64> {
    (0..length).map(|_| gauss.next()).collect()
}

fn impulse(gauss: &mut Gaussian<StdRng>, length: usize) -> Vec<f64> {
    let mut noise = vec![0.0; length];
    let count = impulse_count(length);
    if count == 0 {
        return noise;
    }

    // All positions are drawn before any amplitude. A repeated position
    // keeps the amplitude assigned last.
    let positions: Vec<usize> = (0..count)
        .map(|_| gauss.rng_mut().gen_range(0..length))
        .collect();
    for pos in positions {
        noise[pos] = gauss.next_scaled(IMPULSE_STD_DEV);
    }
    noise
}

/// Divides every frequency bin by the square root of its frequency in Hz.
///
/// Bin `k` and its mirror `n - k` share a frequency, which keeps the
/// spectrum Hermitian so the inverse transform is real and exactly
/// `signal.len()` samples long.
fn shape_pink(signal: Vec<f64>, sample_rate: u32) -> Vec<f64> {
    let n = signal.len();
    if n == 0 {
        return signal;
    }

    let mut spectrum: Vec<Complex<f64>> =
        signal.into_iter().map(|v| Complex::new(v, 0.0)).collect();

    let mut planner = FftPlanner::<f64>::new();
    planner.plan_fft_forward(n).process(&mut spectrum);

    let bin_hz = sample_rate as f64 / n as f64;
    for (k, bin) in spectrum.iter_mut().enumerate() {
        let freq = if k == 0 {
            PINK_DC_HZ
        } else {
            k.min(n - k) as f64 * bin_hz
        };
        *bin /= freq.sqrt();
    }

    planner.plan_fft_inverse(n).process(&mut spectrum);

    // rustfft leaves the inverse unnormalized.
    let scale = 1.0 / n as f64;
    spectrum.into_iter().map(|c| c.re * scale).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn power_spectrum(signal: &[f64]) -> Vec<f64> {
        let n = signal.len();
        let mut buf: Vec<Complex<f64>> = signal.iter().map(|&v| Complex::new(v, 0.0)).collect();
        FftPlanner::<f64>::new().plan_fft_forward(n).process(&mut buf);
        buf[..n / 2 + 1].iter().map(|c| c.norm_sqr()).collect()
    }

    fn band_mean(power: &[f64], lo: usize, hi: usize) -> f64 {
        power[lo..hi].iter().sum::<f64>() / (hi - lo) as f64
    }

    #[test]
    fn test_same_seed_same_noise() {
        for kind in NoiseKind::ALL {
            let a = synthesize(kind, 5000, 16000, 7).unwrap();
            let b = synthesize(kind, 5000, 16000, 7).unwrap();
            assert_eq!(a, b, "{kind} noise should be deterministic");
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = synthesize(NoiseKind::White, 256, 16000, 1).unwrap();
        let b = synthesize(NoiseKind::White, 256, 16000, 2).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_exact_length() {
        for kind in NoiseKind::ALL {
            for len in [0, 1, 999, 1000, 4097] {
                assert_eq!(synthesize(kind, len, 16000, 42).unwrap().len(), len);
            }
        }
    }

    #[test]
    fn test_white_statistics() {
        let noise = synthesize(NoiseKind::White, 20000, 16000, 3).unwrap();
        let mean = noise.iter().sum::<f64>() / noise.len() as f64;
        let var = noise.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / noise.len() as f64;
        assert!(mean.abs() < 0.05, "mean {mean}");
        assert!((var - 1.0).abs() < 0.05, "variance {var}");
    }

    #[test]
    fn test_pink_energy_falls_with_frequency() {
        let n = 4096;
        let trials = 8;
        let mut low = 0.0;
        let mut mid = 0.0;
        let mut high = 0.0;
        for seed in 0..trials {
            let noise = synthesize(NoiseKind::Pink, n, 16000, seed).unwrap();
            let power = power_spectrum(&noise);
            low += band_mean(&power, 1, 32);
            mid += band_mean(&power, 32, 512);
            high += band_mean(&power, 512, n / 2 + 1);
        }
        assert!(low > mid, "low band {low} should exceed mid band {mid}");
        assert!(mid > high, "mid band {mid} should exceed high band {high}");
    }

    #[test]
    fn test_pink_is_real_for_odd_length() {
        // An odd length has no Nyquist bin; the mirror pairing must still
        // produce a finite real signal of the same length.
        let noise = synthesize(NoiseKind::Pink, 1001, 22050, 9).unwrap();
        assert_eq!(noise.len(), 1001);
        assert!(noise.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_impulse_count() {
        assert_eq!(impulse_count(10000), 10);
        assert_eq!(impulse_count(999), 0);
        assert_eq!(impulse_count(1000), 1);
    }

    #[test]
    fn test_impulse_sparse() {
        let noise = synthesize(NoiseKind::Impulse, 10000, 16000, 42).unwrap();
        let nonzero = noise.iter().filter(|v| **v != 0.0).count();
        assert!(nonzero >= 1 && nonzero <= 10, "got {nonzero} impulses");
    }

    #[test]
    fn test_impulse_short_signal_is_silent() {
        let noise = synthesize(NoiseKind::Impulse, 500, 16000, 42).unwrap();
        assert!(noise.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_zero_sample_rate_rejected() {
        let err = synthesize(NoiseKind::Pink, 100, 0, 1).unwrap_err();
        assert!(matches!(err, AudioError::InvalidArgument(_)));
    }
}
