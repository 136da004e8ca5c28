//! Discounted cumulative gain at a cutoff.
//!
//! DCG discounts the gain at rank `i` by `1 / log2(i + 1)`. Reading that
//! discount as the probability of reaching rank `i` gives a user who
//! continues from rank `i` with probability `log2(i + 1) / log2(i + 2)` and
//! never goes past rank `k`.
//!
//! # Formula
//!
//! ```text
//! c_i = log2(i + 1) / log2(i + 2)   for i < k
//! c_i = 0                           for i >= k
//! w_i = 1 / log2(i + 1)             (so ETU = DCG@k)
//! ```

use super::{cutoff_from, rank, require_cutoff, CwlMetric, Sweepable};
use crate::config::DEFAULT_CUTOFF;
use crate::error::MeasurementError;
use crate::ranking::Ranking;

/// Discounted cumulative gain truncated at rank `k`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dcg {
    /// Evaluation depth, `>= 1`
    pub k: usize,
}

impl Dcg {
    pub fn new(k: usize) -> Self {
        Self { k }
    }
}

impl Default for Dcg {
    fn default() -> Self {
        Self::new(DEFAULT_CUTOFF)
    }
}

impl CwlMetric for Dcg {
    fn name(&self) -> String {
        format!("DCG@{}", self.k)
    }

    fn validate(&self) -> Result<(), MeasurementError> {
        require_cutoff("DCG", self.k)
    }

    fn c_vector(&self, ranking: &Ranking) -> Vec<f64> {
        (0..ranking.len())
            .map(|i| {
                if i + 1 < self.k {
                    let r = rank(i);
                    (r + 1.0).log2() / (r + 2.0).log2()
                } else {
                    0.0
                }
            })
            .collect()
    }

    fn citation(&self) -> &'static str {
        "Järvelin & Kekäläinen (2002). Cumulated gain-based evaluation of IR techniques. ACM TOIS 20(4)."
    }
}

impl Sweepable for Dcg {
    type Metric = Dcg;

    fn parameter_name(&self) -> &'static str {
        "k"
    }

    fn at(&self, value: f64) -> Result<Dcg, MeasurementError> {
        cutoff_from("DCG", value).map(Dcg::new)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    fn classic_dcg(gains: &[f64], k: usize) -> f64 {
        gains
            .iter()
            .take(k)
            .enumerate()
            .map(|(i, g)| g / ((i + 2) as f64).log2())
            .sum()
    }

    #[test]
    fn test_dcg_weights_are_log_discounts() {
        let m = Dcg::new(10).measure(&ranking(&[1.0; 5])).unwrap();
        assert_cwl_invariants(&m);
        for (i, w) in m.w_vector.iter().enumerate() {
            let discount = 1.0 / ((i + 2) as f64).log2();
            assert!((w - discount).abs() < 1e-12, "rank {}", i + 1);
        }
    }

    #[test]
    fn test_dcg_total_utility_equals_dcg() {
        let gains = [1.0, 0.0, 0.5, 1.0, 0.0, 1.0];
        let m = Dcg::new(4).measure(&ranking(&gains)).unwrap();
        assert!((m.expected_total_utility - classic_dcg(&gains, 4)).abs() < 1e-12);
        // Nothing beyond the cutoff is inspected
        assert_eq!(m.w_vector[4], 0.0);
        assert_eq!(m.w_vector[5], 0.0);
    }

    #[test]
    fn test_dcg_at_one_only_inspects_first() {
        let m = Dcg::new(1).measure(&ranking(&[0.0, 1.0])).unwrap();
        assert_eq!(m.expected_items, 1.0);
        assert_eq!(m.expected_total_utility, 0.0);
    }

    #[test]
    fn test_dcg_zero_cutoff_rejected() {
        assert!(Dcg::new(0).measure(&ranking(&[1.0])).is_err());
        assert!(Dcg::default().at(0.0).is_err());
        assert_eq!(Dcg::default().at(4.6).unwrap(), Dcg::new(5));
    }
}
