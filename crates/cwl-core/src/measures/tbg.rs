//! Time-biased gain.
//!
//! The probability of still being engaged decays exponentially with the
//! time spent, halving every `halflife` cost units. Item cost stands in
//! for inspection time, so with unit costs the continuation probability is
//! the constant `exp(-ln 2 / halflife)`.
//!
//! # Formula
//!
//! ```text
//! c_i = exp(-ln(2) * cost_i / halflife)
//! ```

use super::{fmt_param, require_positive, CwlMetric, Sweepable};
use crate::config::DEFAULT_TBG_HALFLIFE;
use crate::error::MeasurementError;
use crate::ranking::Ranking;
use std::f64::consts::LN_2;

/// Time-biased gain with half-life `halflife`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tbg {
    /// Cost after which half of the users have stopped, `> 0`
    pub halflife: f64,
}

impl Tbg {
    pub fn new(halflife: f64) -> Self {
        Self { halflife }
    }
}

impl Default for Tbg {
    fn default() -> Self {
        Self::new(DEFAULT_TBG_HALFLIFE)
    }
}

impl CwlMetric for Tbg {
    fn name(&self) -> String {
        format!("TBG@{}", fmt_param(self.halflife))
    }

    fn validate(&self) -> Result<(), MeasurementError> {
        require_positive("TBG", "halflife", self.halflife)
    }

    fn c_vector(&self, ranking: &Ranking) -> Vec<f64> {
        ranking
            .costs()
            .iter()
            .map(|cost| (-LN_2 * cost / self.halflife).exp())
            .collect()
    }

    fn citation(&self) -> &'static str {
        "Smucker & Clarke (2012). Time-based calibration of effectiveness measures. SIGIR."
    }
}

impl Sweepable for Tbg {
    type Metric = Tbg;

    fn parameter_name(&self) -> &'static str {
        "halflife"
    }

    fn at(&self, value: f64) -> Result<Tbg, MeasurementError> {
        Ok(Tbg::new(value))
    }
}
