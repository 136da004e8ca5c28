//! Information-foraging measures.
//!
//! Information foraging theory models a searcher who keeps going while the
//! "patch" is worth it. Two stopping pressures are combined with logistic
//! curves:
//!
//! - **goal**: continue while the gain collected `G_i` is below the goal `t`;
//! - **rate**: continue while the rate of gain `G_i / C_i` is above the
//!   expected rate `a`.
//!
//! # Formula
//!
//! ```text
//! goal_i = 1 - 1 / (1 + b1 * exp((t - G_i) * r1))
//! rate_i = 1 - 1 / (1 + b2 * exp((G_i / C_i - a) * r2))
//! c_i    = goal_i | rate_i | goal_i * rate_i
//! ```

use super::{fmt_param, require_positive, require_unit_gains, CwlMetric, Sweepable};
use crate::config::{DEFAULT_IFT_A, DEFAULT_IFT_B, DEFAULT_IFT_R, DEFAULT_IFT_T};
use crate::error::MeasurementError;
use crate::ranking::Ranking;

/// Which stopping pressures an [`Ift`] measure applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IftMode {
    Goal,
    Rate,
    GoalRate,
}

/// Information-foraging C/W/L measure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ift {
    pub mode: IftMode,
    /// Gain the user wants to collect
    pub t: f64,
    /// Goal logistic scale
    pub b1: f64,
    /// Goal logistic steepness
    pub r1: f64,
    /// Expected rate of gain per unit cost
    pub a: f64,
    /// Rate logistic scale
    pub b2: f64,
    /// Rate logistic steepness
    pub r2: f64,
}

impl Ift {
    /// Goal-sensitive variant with default logistic parameters.
    pub fn goal(t: f64) -> Self {
        Self {
            mode: IftMode::Goal,
            t,
            ..Self::default()
        }
    }

    /// Rate-sensitive variant with default logistic parameters.
    pub fn rate(a: f64) -> Self {
        Self {
            mode: IftMode::Rate,
            a,
            ..Self::default()
        }
    }

    /// Combined goal and rate variant.
    pub fn goal_rate(t: f64, a: f64) -> Self {
        Self {
            mode: IftMode::GoalRate,
            t,
            a,
            ..Self::default()
        }
    }

    fn goal_continuation(&self, gained: f64) -> f64 {
        1.0 - 1.0 / (1.0 + self.b1 * ((self.t - gained) * self.r1).exp())
    }

    fn rate_continuation(&self, gained: f64, spent: f64) -> f64 {
        1.0 - 1.0 / (1.0 + self.b2 * ((gained / spent - self.a) * self.r2).exp())
    }
}

impl Default for Ift {
    fn default() -> Self {
        Self {
            mode: IftMode::GoalRate,
            t: DEFAULT_IFT_T,
            b1: DEFAULT_IFT_B,
            r1: DEFAULT_IFT_R,
            a: DEFAULT_IFT_A,
            b2: DEFAULT_IFT_B,
            r2: DEFAULT_IFT_R,
        }
    }
}

impl CwlMetric for Ift {
    fn name(&self) -> String {
        match self.mode {
            IftMode::Goal => format!(
                "IFT-C1-T={}-b1={}-R1={}",
                fmt_param(self.t),
                fmt_param(self.b1),
                fmt_param(self.r1)
            ),
            IftMode::Rate => format!(
                "IFT-C2-A={}-b2={}-R2={}",
                fmt_param(self.a),
                fmt_param(self.b2),
                fmt_param(self.r2)
            ),
            IftMode::GoalRate => format!(
                "IFT-C1-C2-T={}-A={}",
                fmt_param(self.t),
                fmt_param(self.a)
            ),
        }
    }

    fn validate(&self) -> Result<(), MeasurementError> {
        if matches!(self.mode, IftMode::Goal | IftMode::GoalRate) {
            require_positive("IFT", "t", self.t)?;
            require_positive("IFT", "b1", self.b1)?;
            require_positive("IFT", "r1", self.r1)?;
        }
        if matches!(self.mode, IftMode::Rate | IftMode::GoalRate) {
            require_positive("IFT", "a", self.a)?;
            require_positive("IFT", "b2", self.b2)?;
            require_positive("IFT", "r2", self.r2)?;
        }
        Ok(())
    }

    fn check_ranking(&self, ranking: &Ranking) -> Result<(), MeasurementError> {
        require_unit_gains("IFT", ranking)
    }

    fn c_vector(&self, ranking: &Ranking) -> Vec<f64> {
        ranking
            .cumulative_gains()
            .into_iter()
            .zip(ranking.cumulative_costs())
            .map(|(gained, spent)| {
                let c = match self.mode {
                    IftMode::Goal => self.goal_continuation(gained),
                    IftMode::Rate => self.rate_continuation(gained, spent),
                    IftMode::GoalRate => {
                        self.goal_continuation(gained) * self.rate_continuation(gained, spent)
                    }
                };
                c.clamp(0.0, 1.0)
            })
            .collect()
    }

    fn citation(&self) -> &'static str {
        "Azzopardi, Thomas, Craswell (2018). Measuring the utility of search engine result pages. SIGIR."
    }
}

impl Sweepable for Ift {
    type Metric = Ift;

    fn parameter_name(&self) -> &'static str {
        match self.mode {
            IftMode::Rate => "a",
            IftMode::Goal | IftMode::GoalRate => "t",
        }
    }

    fn at(&self, value: f64) -> Result<Ift, MeasurementError> {
        Ok(match self.mode {
            IftMode::Rate => Ift { a: value, ..*self },
            IftMode::Goal | IftMode::GoalRate => Ift { t: value, ..*self },
        })
    }
}
