//! Reciprocal rank.
//!
//! The user reads down the list and stops at the first relevant item. With
//! graded gains in `[0, 1]` the gain is read as the probability that the
//! item satisfies the user, so `c_i = 1 - r_i`.

use super::{require_unit_gains, CwlMetric};
use crate::error::MeasurementError;
use crate::ranking::Ranking;

/// Reciprocal rank of the first relevant item.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ReciprocalRank;

impl ReciprocalRank {
    pub fn new() -> Self {
        Self
    }
}

impl CwlMetric for ReciprocalRank {
    fn name(&self) -> String {
        "RR".to_string()
    }

    fn validate(&self) -> Result<(), MeasurementError> {
        Ok(())
    }

    fn check_ranking(&self, ranking: &Ranking) -> Result<(), MeasurementError> {
        require_unit_gains("RR", ranking)
    }

    fn c_vector(&self, ranking: &Ranking) -> Vec<f64> {
        ranking.gains().iter().map(|g| 1.0 - g).collect()
    }
}
