//! Average precision as a C/W/L measure.
//!
//! AP averages precision at the rank of every relevant item. Regrouping
//! its sum by the rank whose gain is counted gives a weight proportional
//! to `S_i = Σ_{j>=i} r_j / j`, so the user continues from rank `i` to
//! `i + 1` with probability `S_{i+1} / S_i`. Users of this model only
//! keep going while relevant items remain further down the list.
//!
//! # Formula
//!
//! ```text
//! S_i = Σ_{j>=i} r_j / j
//! c_i = S_{i+1} / S_i          (0 when S_i = 0)
//! AP  = (S_1 / R) * Σ w_i * r_i
//! ```
//!
//! `R` is the number of relevant items for the topic, taken from
//! [`Ranking::relevant_total`], so relevant items that were never
//! retrieved still lower the score.

use super::{require_unit_gains, CwlMetric};
use crate::error::MeasurementError;
use crate::ranking::Ranking;

/// Average precision.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AveragePrecision;

impl AveragePrecision {
    pub fn new() -> Self {
        Self
    }
}

/// Suffix sums `S_i = Σ_{j>=i} r_j / j`, with a trailing zero for `S_{n+1}`.
fn precision_suffix(gains: &[f64]) -> Vec<f64> {
    let mut suffix = vec![0.0; gains.len() + 1];
    for i in (0..gains.len()).rev() {
        suffix[i] = suffix[i + 1] + gains[i] / super::rank(i);
    }
    suffix
}

impl CwlMetric for AveragePrecision {
    fn name(&self) -> String {
        "AP".to_string()
    }

    fn validate(&self) -> Result<(), MeasurementError> {
        Ok(())
    }

    fn check_ranking(&self, ranking: &Ranking) -> Result<(), MeasurementError> {
        require_unit_gains("AP", ranking)
    }

    fn c_vector(&self, ranking: &Ranking) -> Vec<f64> {
        let suffix = precision_suffix(ranking.gains());
        (0..ranking.len())
            .map(|i| {
                if suffix[i] > 0.0 {
                    (suffix[i + 1] / suffix[i]).clamp(0.0, 1.0)
                } else {
                    0.0
                }
            })
            .collect()
    }

    fn utility_scale(&self, ranking: &Ranking, _c_vector: &[f64], _expected_items: f64) -> f64 {
        let relevant = ranking.relevant_total();
        if relevant == 0 {
            return 0.0;
        }
        precision_suffix(ranking.gains())[0] / relevant as f64
    }

    fn citation(&self) -> &'static str {
        "Moffat, Bailey, Scholer, Thomas (2017). Incorporating user expectations and behavior into the measurement of search effectiveness. ACM TOIS 35(3)."
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    /// Textbook average precision over binary judgments.
    fn classic_ap(gains: &[f64], relevant_total: usize) -> f64 {
        let mut found = 0.0;
        let mut sum = 0.0;
        for (i, &g) in gains.iter().enumerate() {
            if g > 0.0 {
                found += 1.0;
                sum += found / (i + 1) as f64;
            }
        }
        sum / relevant_total as f64
    }

    #[test]
    fn test_ap_matches_classic_definition() {
        let gains = [1.0, 0.0, 1.0, 0.0, 0.0];
        let m = AveragePrecision.measure(&ranking(&gains)).unwrap();
        assert_cwl_invariants(&m);
        // (1/1 + 2/3) / 2
        assert!((m.expected_utility - 0.8333333333333334).abs() < 1e-12);
        assert!((m.expected_utility - classic_ap(&gains, 2)).abs() < 1e-12);
    }

    #[test]
    fn test_ap_counts_unretrieved_relevant() {
        let gains = vec![0.0, 1.0, 1.0, 0.0, 1.0];
        let r = Ranking::builder("t", gains.clone())
            .relevant_total(5)
            .build()
            .unwrap();
        let m = AveragePrecision.measure(&r).unwrap();
        assert!((m.expected_utility - classic_ap(&gains, 5)).abs() < 1e-12);
    }

    #[test]
    fn test_ap_user_stops_after_last_relevant() {
        let m = AveragePrecision
            .measure(&ranking(&[1.0, 0.0, 1.0, 0.0, 0.0]))
            .unwrap();
        assert_eq!(m.c_vector[2], 0.0);
        assert_eq!(m.w_vector[3], 0.0);
        assert!(m.w_vector[2] > 0.0);
    }

    #[test]
    fn test_ap_no_relevant() {
        let m = AveragePrecision.measure(&ranking(&[0.0, 0.0])).unwrap();
        assert_eq!(m.expected_utility, 0.0);
        assert_eq!(m.expected_items, 1.0);
    }

    #[test]
    fn test_ap_rejects_graded_gains_above_one() {
        let err = AveragePrecision.measure(&ranking(&[2.0])).unwrap_err();
        assert!(matches!(err, MeasurementError::IncompatibleRanking { .. }));
    }
}
