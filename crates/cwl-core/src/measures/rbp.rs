//! Rank-biased precision.
//!
//! The user inspects the first item and then continues with fixed
//! probability `theta` after every item, so the number of items inspected
//! is geometric with mean `1 / (1 - theta)` on an unbounded list.
//!
//! # Formula
//!
//! ```text
//! c_i = theta
//! RBP = (1 - theta) * Σ theta^(i-1) * g_i
//! ```

use super::{fmt_param, CwlMetric, Sweepable};
use crate::config::DEFAULT_RBP_THETA;
use crate::error::MeasurementError;
use crate::ranking::Ranking;

/// Rank-biased precision with persistence `theta`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rbp {
    /// Probability of continuing after each item, in `(0, 1)`
    pub theta: f64,
}

impl Rbp {
    pub fn new(theta: f64) -> Self {
        Self { theta }
    }
}

impl Default for Rbp {
    fn default() -> Self {
        Self::new(DEFAULT_RBP_THETA)
    }
}

impl CwlMetric for Rbp {
    fn name(&self) -> String {
        format!("RBP@{}", fmt_param(self.theta))
    }

    fn validate(&self) -> Result<(), MeasurementError> {
        if self.theta > 0.0 && self.theta < 1.0 {
            Ok(())
        } else {
            Err(MeasurementError::invalid_parameter(
                "RBP",
                "theta",
                self.theta,
                "0 < theta < 1",
            ))
        }
    }

    fn c_vector(&self, ranking: &Ranking) -> Vec<f64> {
        vec![self.theta; ranking.len()]
    }

    fn utility_scale(&self, _ranking: &Ranking, _c_vector: &[f64], _expected_items: f64) -> f64 {
        1.0 - self.theta
    }

    fn citation(&self) -> &'static str {
        "Moffat & Zobel (2008). Rank-biased precision for measurement of retrieval effectiveness. ACM TOIS 27(1)."
    }
}

impl Sweepable for Rbp {
    type Metric = Rbp;

    fn parameter_name(&self) -> &'static str {
        "theta"
    }

    fn at(&self, value: f64) -> Result<Rbp, MeasurementError> {
        Ok(Rbp::new(value))
    }
}
