use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, LogNormal};

use crate::error::Error;
use crate::types::{Result, NOISE_RESOLUTION};

/// Multiplicative log-normal noise for the sensitive value
#[derive(Debug, Clone)]
pub struct NoiseInjector {
    distribution: LogNormal<f64>,
    rng: StdRng,
    resolution: f64,
}

impl NoiseInjector {
    /// Create an injector drawing factors with log-space mean 0 and spread `sigma`
    pub fn new(sigma: f64, seed: u64) -> Result<Self> {
        if !sigma.is_finite() || sigma < 0.0 {
            return Err(Error::Config(format!(
                "noise sigma must be finite and non-negative, got {}",
                sigma
            )));
        }
        let distribution = LogNormal::new(0.0, sigma)
            .map_err(|e| Error::Config(format!("invalid noise sigma {}: {}", sigma, e)))?;
        Ok(Self {
            distribution,
            rng: StdRng::seed_from_u64(seed),
            resolution: NOISE_RESOLUTION,
        })
    }

    /// Perturb one value with a fresh factor and round to the output resolution
    pub fn perturb(&mut self, value: f64) -> f64 {
        let factor = self.distribution.sample(&mut self.rng);
        round_to_resolution(value * factor, self.resolution)
    }

    /// Perturb a column, one draw per row in order
    pub fn perturb_all(&mut self, values: &[f64]) -> Vec<f64> {
        values.iter().map(|v| self.perturb(*v)).collect()
    }
}

/// Round to the nearest multiple of `resolution`, ties to even
pub fn round_to_resolution(value: f64, resolution: f64) -> f64 {
    (value / resolution).round_ties_even() * resolution
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_sigma_only_rounds() {
        let mut injector = NoiseInjector::new(0.0, 42).unwrap();
        assert_eq!(injector.perturb(123_456.0), 123_500.0);
        assert_eq!(injector.perturb(3_200_049.0), 3_200_000.0);
        assert_eq!(injector.perturb(0.0), 0.0);
    }

    #[test]
    fn test_round_ties_to_even() {
        assert_eq!(round_to_resolution(1_250.0, 100.0), 1_200.0);
        assert_eq!(round_to_resolution(1_350.0, 100.0), 1_400.0);
        assert_eq!(round_to_resolution(1_251.0, 100.0), 1_300.0);
    }

    #[test]
    fn test_output_is_on_resolution_grid() {
        let mut injector = NoiseInjector::new(0.12, 7).unwrap();
        for value in [1_000_000.0, 2_345_678.0, 987_654.0] {
            let noisy = injector.perturb(value);
            assert_eq!(noisy % NOISE_RESOLUTION, 0.0);
            assert!(noisy > 0.0);
        }
    }

    #[test]
    fn test_same_seed_is_reproducible() {
        let values = vec![3_000_000.0, 4_500_000.0, 1_200_000.0, 8_000_000.0];
        let a = NoiseInjector::new(0.12, 42).unwrap().perturb_all(&values);
        let b = NoiseInjector::new(0.12, 42).unwrap().perturb_all(&values);
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seeds_give_independent_releases() {
        let values = vec![3_000_000.0; 16];
        let a = NoiseInjector::new(0.12, 1).unwrap().perturb_all(&values);
        let b = NoiseInjector::new(0.12, 2).unwrap().perturb_all(&values);
        assert_ne!(a, b);
    }

    #[test]
    fn test_draws_differ_per_row() {
        let values = vec![5_000_000.0; 16];
        let noisy = NoiseInjector::new(0.12, 42).unwrap().perturb_all(&values);
        assert!(noisy.iter().any(|v| *v != noisy[0]));
    }

    #[test]
    fn test_negative_sigma_is_config_error() {
        assert!(matches!(NoiseInjector::new(-1.0, 42), Err(Error::Config(_))));
        assert!(matches!(NoiseInjector::new(-1e-9, 42), Err(Error::Config(_))));
    }

    #[test]
    fn test_non_finite_sigma_is_config_error() {
        for sigma in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(NoiseInjector::new(sigma, 42), Err(Error::Config(_))));
        }
    }
}
