//! U-Measure.
//!
//! The user reads a trailtext of limited length `l`: the value of an item
//! decays linearly with the amount of text (cost) read up to and including
//! it, reaching zero once `l` units have been read.
//!
//! # Formula
//!
//! ```text
//! D_i = max(0, 1 - C_i / l),   C_i = Σ_{j<=i} cost_j
//! c_i = D_{i+1} / D_i          (0 when D_i = 0)
//! ```
//!
//! Beyond the last rank the next item is assumed to cost as much as the
//! last one.

use super::{fmt_param, require_positive, CwlMetric, Sweepable};
use crate::config::DEFAULT_UMEASURE_L;
use crate::error::MeasurementError;
use crate::ranking::Ranking;

/// U-Measure with text budget `l`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UMeasure {
    /// Amount of text (in cost units) after which items are worthless, `> 0`
    pub l: f64,
}

impl UMeasure {
    pub fn new(l: f64) -> Self {
        Self { l }
    }

    fn decay(&self, consumed: f64) -> f64 {
        (1.0 - consumed / self.l).max(0.0)
    }
}

impl Default for UMeasure {
    fn default() -> Self {
        Self::new(DEFAULT_UMEASURE_L)
    }
}

impl CwlMetric for UMeasure {
    fn name(&self) -> String {
        format!("U-L={}", fmt_param(self.l))
    }

    fn validate(&self) -> Result<(), MeasurementError> {
        require_positive("U-Measure", "l", self.l)
    }

    fn c_vector(&self, ranking: &Ranking) -> Vec<f64> {
        let costs = ranking.costs();
        let consumed = ranking.cumulative_costs();
        consumed
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                let current = self.decay(c);
                let next_cost = costs.get(i + 1).copied().unwrap_or(costs[i]);
                let next = self.decay(c + next_cost);
                if current > 0.0 {
                    (next / current).clamp(0.0, 1.0)
                } else {
                    0.0
                }
            })
            .collect()
    }

    fn citation(&self) -> &'static str {
        "Sakai & Dou (2013). Summaries, ranked retrieval and sessions: a unified framework for information access evaluation. SIGIR."
    }
}

impl Sweepable for UMeasure {
    type Metric = UMeasure;

    fn parameter_name(&self) -> &'static str {
        "l"
    }

    fn at(&self, value: f64) -> Result<UMeasure, MeasurementError> {
        Ok(UMeasure::new(value))
    }
}
