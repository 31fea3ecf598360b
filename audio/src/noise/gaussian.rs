use std::f64::consts::PI;

use rand::Rng;

/// Standard normal sampler using the Box-Muller transform.
///
/// Each transform yields two values; the second is cached and returned by
/// the next call.
pub(crate) struct Gaussian<R> {
    rng: R,
    spare: Option<f64>,
}

impl<R: Rng> Gaussian<R> {
    pub(crate) fn new(rng: R) -> Self {
        Self { rng, spare: None }
    }

    /// Draws from `N(0, 1)`.
    pub(crate) fn next(&mut self) -> f64 {
        if let Some(v) = self.spare.take() {
            return v;
        }

        loop {
            let u1: f64 = self.rng.r#gen();
            let u2: f64 = self.rng.r#gen();
            if u1 > 0.0 {
                let mag = (-2.0 * u1.ln()).sqrt();
                let angle = 2.0 * PI * u2;
                self.spare = Some(mag * angle.sin());
                return mag * angle.cos();
            }
        }
    }

    /// Draws from `N(0, std_dev)`.
    pub(crate) fn next_scaled(&mut self, std_dev: f64) -> f64 {
        self.next() * std_dev
    }

    /// Borrows the underlying generator for non-normal draws.
    pub(crate) fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_deterministic() {
        let mut a = Gaussian::new(StdRng::seed_from_u64(42));
        let mut b = Gaussian::new(StdRng::seed_from_u64(42));
        for _ in 0..100 {
            assert_eq!(a.next().to_bits(), b.next().to_bits());
        }
    }

    #[test]
    fn test_distribution() {
        let mut g = Gaussian::new(StdRng::seed_from_u64(0));
        let n = 10000;
        let mut sum = 0.0;
        let mut sum_sq = 0.0;
        for _ in 0..n {
            let v = g.next();
            sum += v;
            sum_sq += v * v;
        }
        let mean = sum / n as f64;
        let variance = sum_sq / n as f64 - mean * mean;

        assert!(mean.abs() < 0.1, "mean should be ~0, got {mean}");
        assert!((variance - 1.0).abs() < 0.1, "variance should be ~1, got {variance}");
    }
}
