//! INSQ and INST: goal-sensitive adaptive measures.
//!
//! Both models describe a user who wants to find about `t` relevant items.
//! INSQ fixes the continuation function in advance from `t` alone; INST
//! additionally tracks how much of the goal remains, so a user who has
//! already found what they came for is more likely to stop.
//!
//! # Formula
//!
//! ```text
//! INSQ: c_i = ((i + 2t - 1) / (i + 2t))^2
//! INST: c_i = ((i + t + T_i - 1) / (i + t + T_i))^2,  T_i = t - Σ_{j<=i} r_j
//! ```

use super::{fmt_param, rank, require_positive, require_unit_gains, CwlMetric, Sweepable};
use crate::config::DEFAULT_INST_T;
use crate::error::MeasurementError;
use crate::ranking::Ranking;

/// Squared ratio `((d - 1) / d)^2`, floored at 0 for `d < 1`.
#[inline]
fn squared_ratio(denominator: f64) -> f64 {
    let ratio = (denominator - 1.0).max(0.0) / denominator;
    ratio * ratio
}

/// INSQ with expected relevant count `t`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Insq {
    /// Number of relevant items the user wants, `> 0`
    pub t: f64,
}

impl Insq {
    pub fn new(t: f64) -> Self {
        Self { t }
    }
}

impl Default for Insq {
    fn default() -> Self {
        Self::new(DEFAULT_INST_T)
    }
}

impl CwlMetric for Insq {
    fn name(&self) -> String {
        format!("INSQ-T={}", fmt_param(self.t))
    }

    fn validate(&self) -> Result<(), MeasurementError> {
        require_positive("INSQ", "t", self.t)
    }

    fn c_vector(&self, ranking: &Ranking) -> Vec<f64> {
        (0..ranking.len())
            .map(|i| squared_ratio(rank(i) + 2.0 * self.t))
            .collect()
    }

    fn citation(&self) -> &'static str {
        "Moffat, Scholer, Thomas (2012). Models and metrics: IR evaluation as a user process. ADCS."
    }
}

impl Sweepable for Insq {
    type Metric = Insq;

    fn parameter_name(&self) -> &'static str {
        "t"
    }

    fn at(&self, value: f64) -> Result<Insq, MeasurementError> {
        Ok(Insq::new(value))
    }
}

/// INST with expected relevant count `t`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Inst {
    /// Number of relevant items the user wants, `> 0`
    pub t: f64,
}

impl Inst {
    pub fn new(t: f64) -> Self {
        Self { t }
    }
}

impl Default for Inst {
    fn default() -> Self {
        Self::new(DEFAULT_INST_T)
    }
}

impl CwlMetric for Inst {
    fn name(&self) -> String {
        format!("INST-T={}", fmt_param(self.t))
    }

    fn validate(&self) -> Result<(), MeasurementError> {
        require_positive("INST", "t", self.t)
    }

    fn check_ranking(&self, ranking: &Ranking) -> Result<(), MeasurementError> {
        require_unit_gains("INST", ranking)
    }

    fn c_vector(&self, ranking: &Ranking) -> Vec<f64> {
        ranking
            .cumulative_gains()
            .iter()
            .enumerate()
            .map(|(i, found)| {
                let remaining = self.t - found;
                squared_ratio(rank(i) + self.t + remaining)
            })
            .collect()
    }

    fn citation(&self) -> &'static str {
        "Moffat, Bailey, Scholer, Thomas (2015). INST: An adaptive metric for information retrieval evaluation. ADCS."
    }
}

impl Sweepable for Inst {
    type Metric = Inst;

    fn parameter_name(&self) -> &'static str {
        "t"
    }

    fn at(&self, value: f64) -> Result<Inst, MeasurementError> {
        Ok(Inst::new(value))
    }
}
