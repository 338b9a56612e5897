//! Seeded random source shared by every stochastic decision of a run.
//!
//! A run owns exactly one [`RandomSource`] and threads it through every
//! operation as `&mut`, so two runs with the same seed and configuration
//! produce identical event sequences.

use crate::error::{Result, SimError};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Binomial, Distribution, Exp1, StandardNormal};

#[derive(Debug, Clone)]
pub struct RandomSource {
    rng: ChaCha8Rng,
    seed: u64,
}

impl RandomSource {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Seeds from the OS. The drawn seed is kept so the run can be replayed.
    pub fn from_entropy() -> Self {
        Self::from_seed(rand::thread_rng().gen())
    }

    /// Seed this source was created from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform draw in `[0, 1)`.
    pub fn unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    /// Uniform real in `[lo, hi)`. An empty or inverted range yields `lo`.
    pub fn uniform_real(&mut self, lo: f64, hi: f64) -> f64 {
        if lo >= hi {
            return lo;
        }
        lo + (hi - lo) * self.unit()
    }

    /// Uniform integer in the half-open range `[lo, hi)`.
    pub fn uniform_int(&mut self, lo: usize, hi: usize) -> Result<usize> {
        if lo >= hi {
            return Err(SimError::invalid(format!(
                "empty integer range [{lo}, {hi})"
            )));
        }
        Ok(self.rng.gen_range(lo..hi))
    }

    /// Bernoulli trial. `p` is clamped into `[0, 1]`; NaN counts as 0.
    pub fn bernoulli(&mut self, p: f64) -> bool {
        let p = if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) };
        if p >= 1.0 {
            return true;
        }
        self.unit() < p
    }

    /// Gaussian draw. A non-positive spread returns the mean unchanged.
    pub fn normal(&mut self, mean: f64, sd: f64) -> f64 {
        if sd <= 0.0 || sd.is_nan() {
            return mean;
        }
        let z: f64 = StandardNormal.sample(&mut self.rng);
        mean + sd * z
    }

    /// Exponential draw with the given rate (mean `1 / rate`).
    pub fn exponential(&mut self, rate: f64) -> Result<f64> {
        if rate <= 0.0 || !rate.is_finite() {
            return Err(SimError::invalid(format!(
                "exponential rate must be positive and finite, got {rate}"
            )));
        }
        let e: f64 = Exp1.sample(&mut self.rng);
        Ok(e / rate)
    }

    pub fn binomial(&mut self, n: u64, p: f64) -> Result<u64> {
        let dist = Binomial::new(n, p)
            .map_err(|e| SimError::invalid(format!("binomial({n}, {p}): {e}")))?;
        Ok(dist.sample(&mut self.rng))
    }

    /// Picks an index with probability proportional to its weight.
    ///
    /// Weights must be finite and non-negative with a positive total.
    /// Zero-weight entries are never selected.
    pub fn weighted_index(&mut self, weights: &[f64]) -> Result<usize> {
        if weights.is_empty() {
            return Err(SimError::invalid("weighted choice over no candidates"));
        }
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(SimError::invalid(
                "weights must be finite and non-negative",
            ));
        }
        let total: f64 = weights.iter().sum();
        if total <= 0.0 {
            return Err(SimError::invalid("weights sum to zero"));
        }

        let mut cumulative = Vec::with_capacity(weights.len());
        let mut acc = 0.0;
        for w in weights {
            acc += w / total;
            cumulative.push(acc);
        }
        let u = self.unit();
        let mut idx = cumulative.partition_point(|&c| c < u);
        // Rounding can leave the last cumulative just under u.
        if idx >= weights.len() {
            idx = weights.len() - 1;
        }
        // Landing exactly on a boundary never picks a zero-weight slot.
        while weights[idx] == 0.0 {
            if idx + 1 < weights.len() {
                idx += 1;
            } else {
                idx = weights
                    .iter()
                    .rposition(|w| *w > 0.0)
                    .unwrap_or(idx);
                break;
            }
        }
        Ok(idx)
    }

    /// `k` distinct elements of `items` in random order. Asking for more
    /// than there are returns all of them, shuffled.
    pub fn random_subset<T: Clone>(&mut self, items: &[T], k: usize) -> Vec<T> {
        let mut pool = items.to_vec();
        pool.shuffle(&mut self.rng);
        pool.truncate(k);
        pool
    }

    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_stream() {
        let mut a = RandomSource::from_seed(7);
        let mut b = RandomSource::from_seed(7);
        for _ in 0..100 {
            assert_eq!(a.unit().to_bits(), b.unit().to_bits());
        }
        assert_eq!(a.seed(), 7);
    }

    #[test]
    fn test_entropy_seed_is_replayable() {
        let mut a = RandomSource::from_entropy();
        let mut b = RandomSource::from_seed(a.seed());
        assert_eq!(a.unit().to_bits(), b.unit().to_bits());
    }

    #[test]
    fn test_uniform_int_half_open() {
        let mut rng = RandomSource::from_seed(1);
        for _ in 0..1000 {
            let v = rng.uniform_int(2, 5).unwrap();
            assert!((2..5).contains(&v));
        }
        assert!(rng.uniform_int(3, 3).is_err());
    }

    #[test]
    fn test_bernoulli_clamps() {
        let mut rng = RandomSource::from_seed(2);
        for _ in 0..100 {
            assert!(rng.bernoulli(1.5));
            assert!(!rng.bernoulli(-0.2));
            assert!(!rng.bernoulli(f64::NAN));
        }
    }

    #[test]
    fn test_normal_zero_sd() {
        let mut rng = RandomSource::from_seed(3);
        assert_eq!(rng.normal(1.25, 0.0), 1.25);
    }

    #[test]
    fn test_exponential_mean() {
        let mut rng = RandomSource::from_seed(4);
        let n = 20_000;
        let mean: f64 = (0..n).map(|_| rng.exponential(2.0).unwrap()).sum::<f64>() / n as f64;
        assert!((mean - 0.5).abs() < 0.03, "mean was {mean}");
        assert!(rng.exponential(0.0).is_err());
    }

    #[test]
    fn test_weighted_index_uniform_weights() {
        let mut rng = RandomSource::from_seed(5);
        let mut counts = [0usize; 4];
        let n = 40_000;
        for _ in 0..n {
            counts[rng.weighted_index(&[1.0, 1.0, 1.0, 1.0]).unwrap()] += 1;
        }
        for c in counts {
            let freq = c as f64 / n as f64;
            assert!((freq - 0.25).abs() < 0.02, "frequency was {freq}");
        }
    }

    #[test]
    fn test_weighted_index_skips_zero_weights() {
        let mut rng = RandomSource::from_seed(6);
        for _ in 0..1000 {
            let idx = rng.weighted_index(&[0.0, 3.0, 0.0, 1.0, 0.0]).unwrap();
            assert!(idx == 1 || idx == 3);
        }
    }

    #[test]
    fn test_weighted_index_rejects_degenerate_weights() {
        let mut rng = RandomSource::from_seed(7);
        assert!(rng.weighted_index(&[]).is_err());
        assert!(rng.weighted_index(&[0.0, 0.0]).is_err());
        assert!(rng.weighted_index(&[1.0, -1.0]).is_err());
        assert!(rng.weighted_index(&[f64::NAN]).is_err());
    }

    #[test]
    fn test_random_subset_distinct() {
        let mut rng = RandomSource::from_seed(8);
        let items: Vec<u32> = (0..10).collect();
        let mut picked = rng.random_subset(&items, 4);
        picked.sort_unstable();
        picked.dedup();
        assert_eq!(picked.len(), 4);
        assert!(rng.random_subset(&items, 0).is_empty());
    }

    #[test]
    fn test_random_subset_oversized_returns_everything() {
        let mut rng = RandomSource::from_seed(10);
        let items: Vec<u32> = (0..5).collect();
        let mut picked = rng.random_subset(&items, 9);
        picked.sort_unstable();
        assert_eq!(picked, items);
    }

    #[test]
    fn test_binomial_bounds() {
        let mut rng = RandomSource::from_seed(9);
        assert_eq!(rng.binomial(10, 0.0).unwrap(), 0);
        assert_eq!(rng.binomial(10, 1.0).unwrap(), 10);
        assert!(rng.binomial(10, 2.0).is_err());
    }
}
