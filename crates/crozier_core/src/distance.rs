//! Dissimilarity between two cue profiles.
//!
//! All three measures share the Bray-Curtis shape `1 - 2*Σmin / denominator`
//! and differ only in how the denominator is accumulated. The first argument
//! is always the evaluator's template (colony mean or the evaluating
//! worker's own cues), the second the profile being judged.

use crate::config::Metric;
use crate::error::{Result, SimError};

/// Distance between `reference` and `other` under `metric`, in `[0, 1]`.
pub fn distance(metric: Metric, reference: &[f64], other: &[f64]) -> Result<f64> {
    match metric {
        Metric::Gestalt => gestalt(reference, other),
        Metric::DesirablePresent => desirable_present(reference, other),
        Metric::UndesirableAbsent => undesirable_absent(reference, other),
    }
}

/// Symmetric Bray-Curtis dissimilarity.
pub fn gestalt(reference: &[f64], other: &[f64]) -> Result<f64> {
    accumulate(reference, other, |r, o| r + o)
}

/// Cues the incomer carries beyond the template weigh on the denominator
/// only through the template side.
pub fn undesirable_absent(reference: &[f64], other: &[f64]) -> Result<f64> {
    accumulate(reference, other, |r, o| if o < r { 2.0 * o } else { r + o })
}

/// Cues of the template missing from the incomer only count once.
pub fn desirable_present(reference: &[f64], other: &[f64]) -> Result<f64> {
    accumulate(reference, other, |r, o| if r < o { 2.0 * r } else { r + o })
}

fn accumulate(
    reference: &[f64],
    other: &[f64],
    denominator_term: impl Fn(f64, f64) -> f64,
) -> Result<f64> {
    if reference.len() != other.len() {
        return Err(SimError::invalid(format!(
            "cue profiles differ in length ({} vs {})",
            reference.len(),
            other.len()
        )));
    }
    let mut shared = 0.0;
    let mut denominator = 0.0;
    for (&r, &o) in reference.iter().zip(other) {
        shared += r.min(o);
        denominator += denominator_term(r, o);
    }
    if denominator <= 0.0 {
        return Err(SimError::degenerate("sum of profile elements is zero"));
    }
    Ok((1.0 - 2.0 * shared / denominator).clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_gestalt_identical_is_zero() {
        let a = [1.0, 2.0, 3.0];
        assert!(gestalt(&a, &a).unwrap().abs() < EPS);
    }

    #[test]
    fn test_gestalt_disjoint_is_one() {
        let d = gestalt(&[1.0, 0.0], &[0.0, 4.0]).unwrap();
        assert!((d - 1.0).abs() < EPS);
    }

    #[test]
    fn test_gestalt_known_value() {
        // Σmin = 1 + 1 = 2, ΣA + ΣB = 3 + 3 = 6.
        let d = gestalt(&[1.0, 2.0], &[2.0, 1.0]).unwrap();
        assert!((d - (1.0 - 4.0 / 6.0)).abs() < EPS);
    }

    #[test]
    fn test_undesirable_absent_asymmetry() {
        let template = [2.0, 0.0];
        let incomer = [1.0, 3.0];
        // Σmin = 1; denominator = 2*1 + (0+3) = 5.
        let d = undesirable_absent(&template, &incomer).unwrap();
        assert!((d - (1.0 - 2.0 / 5.0)).abs() < EPS);
        // Swapped roles: denominator = (1+2) + 2*0 = 3.
        let swapped = undesirable_absent(&incomer, &template).unwrap();
        assert!((swapped - (1.0 - 2.0 / 3.0)).abs() < EPS);
    }

    #[test]
    fn test_desirable_present_known_value() {
        let template = [2.0, 0.0];
        let incomer = [1.0, 3.0];
        // Σmin = 1; denominator = (2+1) + 2*0 = 3.
        let d = desirable_present(&template, &incomer).unwrap();
        assert!((d - (1.0 - 2.0 / 3.0)).abs() < EPS);
    }

    #[test]
    fn test_all_zero_is_degenerate() {
        let zero = [0.0, 0.0];
        for metric in [Metric::Gestalt, Metric::DesirablePresent, Metric::UndesirableAbsent] {
            assert!(matches!(
                distance(metric, &zero, &zero),
                Err(SimError::DegenerateInput(_))
            ));
        }
    }

    #[test]
    fn test_length_mismatch_rejected() {
        assert!(matches!(
            gestalt(&[1.0], &[1.0, 2.0]),
            Err(SimError::InvalidArgument(_))
        ));
    }
}
