//! Bejewelled player model.
//!
//! The user arrives with a benefit target `t` and a cost budget `k` and
//! stops as soon as either is reached. Inspecting an item costs `hc` when
//! the item is relevant (the user clicks it) and `hb` otherwise (the user
//! only browses its snippet).
//!
//! # Formula
//!
//! ```text
//! cost_i = hc if g_i > 0 else hb
//! G_i = Σ_{j<=i} g_j,  K_i = Σ_{j<=i} cost_j
//! c_i = 1 if G_i < t and K_i < k else 0
//! ```
//!
//! In the dynamic variant the limits move as the user goes. Relevant items
//! raise the budget and non-relevant ones lower the target, each converted
//! at the user's initial exchange rate `k / t`. With `B_i` the browse cost
//! spent on non-relevant items so far:
//!
//! ```text
//! k_i = k + (k / t) * G_i
//! t_i = t - (t / k) * B_i
//! c_i = 1 if G_i < t_i and K_i < k_i else 0
//! ```

use super::{fmt_param, require_positive, CwlMetric, Sweepable};
use crate::config::{DEFAULT_BPM_HB, DEFAULT_BPM_HC, DEFAULT_BPM_K, DEFAULT_BPM_T};
use crate::error::MeasurementError;
use crate::ranking::Ranking;

/// How the stopping limits behave while the user scans the list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BpmMode {
    /// Fixed target and budget
    #[default]
    Static,
    /// Target and budget adapt to the benefit and cost seen so far
    Dynamic,
}

/// Bejewelled player model with benefit target `t` and cost budget `k`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bpm {
    pub mode: BpmMode,
    /// Benefit target
    pub t: f64,
    /// Cost budget
    pub k: f64,
    /// Cost of clicking a relevant item
    pub hc: f64,
    /// Cost of browsing past a non-relevant item
    pub hb: f64,
}

impl Bpm {
    pub fn new(t: f64, k: f64, hc: f64, hb: f64) -> Self {
        Self {
            mode: BpmMode::Static,
            t,
            k,
            hc,
            hb,
        }
    }

    pub fn dynamic(t: f64, k: f64, hc: f64, hb: f64) -> Self {
        Self {
            mode: BpmMode::Dynamic,
            ..Self::new(t, k, hc, hb)
        }
    }

    /// Benefit target and cost budget in force after `benefit` has been
    /// found and `browsed` spent on non-relevant items.
    fn limits(&self, benefit: f64, browsed: f64) -> (f64, f64) {
        match self.mode {
            BpmMode::Static => (self.t, self.k),
            BpmMode::Dynamic => (
                self.t - (self.t / self.k) * browsed,
                self.k + (self.k / self.t) * benefit,
            ),
        }
    }

    fn item_costs<'a>(&'a self, ranking: &'a Ranking) -> impl Iterator<Item = f64> + 'a {
        ranking
            .gains()
            .iter()
            .map(move |&g| if g > 0.0 { self.hc } else { self.hb })
    }
}

impl Default for Bpm {
    fn default() -> Self {
        Self::new(DEFAULT_BPM_T, DEFAULT_BPM_K, DEFAULT_BPM_HC, DEFAULT_BPM_HB)
    }
}

impl CwlMetric for Bpm {
    fn name(&self) -> String {
        let prefix = match self.mode {
            BpmMode::Static => "BPM",
            BpmMode::Dynamic => "BPM-D",
        };
        format!(
            "{}-T={}-K={}-hc={}-hb={}",
            prefix,
            fmt_param(self.t),
            fmt_param(self.k),
            fmt_param(self.hc),
            fmt_param(self.hb)
        )
    }

    fn validate(&self) -> Result<(), MeasurementError> {
        require_positive("BPM", "t", self.t)?;
        require_positive("BPM", "k", self.k)?;
        require_positive("BPM", "hc", self.hc)?;
        require_positive("BPM", "hb", self.hb)
    }

    fn c_vector(&self, ranking: &Ranking) -> Vec<f64> {
        let mut benefit = 0.0;
        let mut spent = 0.0;
        let mut browsed = 0.0;
        ranking
            .gains()
            .iter()
            .zip(self.item_costs(ranking))
            .map(|(&g, cost)| {
                benefit += g;
                spent += cost;
                if g <= 0.0 {
                    browsed += cost;
                }
                let (target, budget) = self.limits(benefit, browsed);
                if benefit < target && spent < budget {
                    1.0
                } else {
                    0.0
                }
            })
            .collect()
    }

    fn cost_vector(&self, ranking: &Ranking) -> Vec<f64> {
        self.item_costs(ranking).collect()
    }

    fn citation(&self) -> &'static str {
        "Zhang, Liu, Li, Zhang, Xu, Ma (2017). Evaluating web search with a bejeweled player model. SIGIR."
    }
}

impl Sweepable for Bpm {
    type Metric = Bpm;

    fn parameter_name(&self) -> &'static str {
        "t"
    }

    fn at(&self, value: f64) -> Result<Bpm, MeasurementError> {
        Ok(Bpm { t: value, ..*self })
    }
}
