//! Precision at a cutoff.
//!
//! The user inspects exactly `k` items (or the whole list if shorter) and
//! then stops. Expected utility is the gain collected divided by `k`, so a
//! list shorter than the cutoff counts its missing ranks as non-relevant.

use super::{cutoff_from, require_cutoff, CwlMetric, Sweepable};
use crate::config::DEFAULT_CUTOFF;
use crate::error::MeasurementError;
use crate::ranking::Ranking;

/// Precision at rank `k`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Precision {
    /// Evaluation depth, `>= 1`
    pub k: usize,
}

impl Precision {
    pub fn new(k: usize) -> Self {
        Self { k }
    }
}

impl Default for Precision {
    fn default() -> Self {
        Self::new(DEFAULT_CUTOFF)
    }
}

impl CwlMetric for Precision {
    fn name(&self) -> String {
        format!("P@{}", self.k)
    }

    fn validate(&self) -> Result<(), MeasurementError> {
        require_cutoff("P", self.k)
    }

    fn c_vector(&self, ranking: &Ranking) -> Vec<f64> {
        (0..ranking.len())
            .map(|i| if i + 1 < self.k { 1.0 } else { 0.0 })
            .collect()
    }

    fn utility_scale(&self, _ranking: &Ranking, _c_vector: &[f64], _expected_items: f64) -> f64 {
        1.0 / self.k as f64
    }
}

impl Sweepable for Precision {
    type Metric = Precision;

    fn parameter_name(&self) -> &'static str {
        "k"
    }

    fn at(&self, value: f64) -> Result<Precision, MeasurementError> {
        cutoff_from("P", value).map(Precision::new)
    }
}
