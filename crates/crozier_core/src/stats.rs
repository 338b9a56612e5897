//! Population statistics used by the snapshot report.
//!
//! Standard deviations are population (divide-by-n) deviations. Empty
//! samples report zero rather than NaN so snapshot rows stay numeric.

use crozier_data::MeanStd;

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub fn std_dev(values: &[f64]) -> f64 {
    mean_std(values).std
}

pub fn mean_std(values: &[f64]) -> MeanStd {
    if values.is_empty() {
        return MeanStd::default();
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    MeanStd {
        mean: m,
        std: var.sqrt(),
    }
}

/// Population covariance of two equally long samples.
pub fn covariance(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n == 0 {
        return 0.0;
    }
    let mx = mean(&x[..n]);
    let my = mean(&y[..n]);
    x.iter()
        .zip(y)
        .map(|(a, b)| (a - mx) * (b - my))
        .sum::<f64>()
        / n as f64
}

/// Pearson correlation between paired samples. `None` with fewer than two
/// pairs or when either side has no variance.
pub fn correlation(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() < 2 || x.len() != y.len() {
        return None;
    }
    let denom = std_dev(x) * std_dev(y);
    if denom <= f64::EPSILON {
        return None;
    }
    Some(covariance(x, y) / denom)
}

/// Shannon entropy of a profile's relative abundances. Zero entries are
/// skipped; an all-zero profile scores 0.
pub fn shannon(profile: &[f64]) -> f64 {
    let total: f64 = profile.iter().sum();
    if total <= 0.0 {
        return 0.0;
    }
    profile
        .iter()
        .filter(|c| **c > 0.0)
        .map(|c| {
            let p = c / total;
            -p * p.ln()
        })
        .sum()
}

/// Gini-Simpson index `1 - Σp²`. An all-zero profile scores 0.
pub fn simpson(profile: &[f64]) -> f64 {
    let total: f64 = profile.iter().sum();
    if total <= 0.0 {
        return 0.0;
    }
    1.0 - profile
        .iter()
        .filter(|c| **c > 0.0)
        .map(|c| (c / total).powi(2))
        .sum::<f64>()
}

/// Symmetric Bray-Curtis dissimilarity, `None` when both profiles are empty
/// of cues.
pub fn bray_curtis(a: &[f64], b: &[f64]) -> Option<f64> {
    let mut shared = 0.0;
    let mut total = 0.0;
    for (x, y) in a.iter().zip(b) {
        shared += x.min(*y);
        total += x + y;
    }
    if total <= 0.0 {
        return None;
    }
    Some(1.0 - 2.0 * shared / total)
}

/// Mean and spread of Bray-Curtis over every unordered pair of profiles.
/// Pairs where both profiles are all-zero are left out.
pub fn pairwise_bray_curtis(profiles: &[&[f64]]) -> MeanStd {
    let mut distances = Vec::with_capacity(profiles.len() * profiles.len().saturating_sub(1) / 2);
    for (i, a) in profiles.iter().enumerate() {
        for b in &profiles[i + 1..] {
            if let Some(d) = bray_curtis(a, b) {
                distances.push(d);
            }
        }
    }
    mean_std(&distances)
}

/// Component-wise mean of a set of equally long profiles.
pub fn mean_profile<'a>(profiles: impl IntoIterator<Item = &'a [f64]>, len: usize) -> Vec<f64> {
    let mut sum = vec![0.0; len];
    let mut count = 0usize;
    for profile in profiles {
        for (acc, v) in sum.iter_mut().zip(profile) {
            *acc += v;
        }
        count += 1;
    }
    if count > 0 {
        for acc in &mut sum {
            *acc /= count as f64;
        }
    }
    sum
}
