//! C/W/L measures.
//!
//! Every measure in this module is described by a continuation function C:
//! `c_i` is the probability that a user who has just inspected rank `i`
//! goes on to inspect rank `i + 1`. From C the framework derives
//!
//! - the weight vector W, `w_1 = 1` and `w_i = w_{i-1} * c_{i-1}`, which is
//!   the probability that rank `i` is inspected at all;
//! - the utility vector L, the utility the user collects at rank `i`;
//! - five summary statistics (see [`Measurement`]).
//!
//! Concrete measures only implement [`CwlMetric::c_vector`] (plus parameter
//! validation, and optionally L, cost and the utility scale). The
//! recurrence and all summations live in the provided
//! [`CwlMetric::measure`], written once for the whole family.
//!
//! # Measures
//!
//! | Measure | Type | Parameters |
//! |---------|------|------------|
//! | Precision@k | [`Precision`] | `k` |
//! | Reciprocal rank | [`ReciprocalRank`] | - |
//! | Average precision | [`AveragePrecision`] | - |
//! | DCG@k | [`Dcg`] | `k` |
//! | Rank-biased precision | [`Rbp`] | `theta` |
//! | Time-biased gain | [`Tbg`] | `halflife` |
//! | Bejewelled player model, static or dynamic | [`Bpm`] | `t`, `k`, `hc`, `hb` |
//! | INST | [`Inst`] | `t` |
//! | INSQ | [`Insq`] | `t` |
//! | U-Measure | [`UMeasure`] | `l` |
//! | Information foraging | [`Ift`] | `t`, `b1`, `r1`, `a`, `b2`, `r2` |
//!
//! # Example
//!
//! ```
//! use cwl_core::measures::{CwlMetric, Rbp};
//! use cwl_core::ranking::Ranking;
//!
//! let ranking = Ranking::new("t1", vec![1.0, 0.0, 1.0]).unwrap();
//! let m = Rbp::new(0.5).measure(&ranking).unwrap();
//! assert_eq!(m.w_vector, vec![1.0, 0.5, 0.25]);
//! assert!((m.expected_items - 1.75).abs() < 1e-12);
//! ```

mod ap;
mod bpm;
mod dcg;
mod ift;
mod inst;
mod precision;
mod rbp;
mod rr;
mod session;
mod spec;
mod tbg;
mod umeasure;

pub use ap::AveragePrecision;
pub use bpm::{Bpm, BpmMode};
pub use dcg::Dcg;
pub use ift::{Ift, IftMode};
pub use inst::{Insq, Inst};
pub use precision::Precision;
pub use rbp::Rbp;
pub use rr::ReciprocalRank;
pub use session::MeasureSession;
pub use spec::{load_metrics_file, MetricKind, MetricSpec};
pub use tbg::Tbg;
pub use umeasure::UMeasure;

use crate::error::MeasurementError;
use crate::ranking::Ranking;
use serde::Serialize;

// ============================================================================
// Measurement
// ============================================================================

/// Result of measuring one ranking with one measure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Measurement {
    /// Name of the measure, including its parameters
    pub metric_name: String,
    /// Topic the ranking belongs to
    pub topic_id: String,
    /// Continuation probability at each rank
    pub c_vector: Vec<f64>,
    /// Probability that each rank is inspected
    pub w_vector: Vec<f64>,
    /// Utility collected at each rank
    pub l_vector: Vec<f64>,
    /// Expected number of items inspected (expected depth)
    pub expected_items: f64,
    /// Expected utility per item inspected
    pub expected_utility: f64,
    /// Expected utility accumulated over the whole visit
    pub expected_total_utility: f64,
    /// Expected cost per item inspected
    pub expected_cost: f64,
    /// Expected cost accumulated over the whole visit
    pub expected_total_cost: f64,
}

/// Scalar statistics carried by a [`Measurement`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Statistic {
    ExpectedItems,
    ExpectedUtility,
    ExpectedTotalUtility,
    ExpectedCost,
    ExpectedTotalCost,
}

impl Statistic {
    /// All statistics, in report order.
    pub const ALL: [Statistic; 5] = [
        Statistic::ExpectedUtility,
        Statistic::ExpectedTotalUtility,
        Statistic::ExpectedCost,
        Statistic::ExpectedTotalCost,
        Statistic::ExpectedItems,
    ];

    /// Short column label used in reports (EU, ETU, EC, ETC, ED).
    pub fn label(&self) -> &'static str {
        match self {
            Statistic::ExpectedItems => "ED",
            Statistic::ExpectedUtility => "EU",
            Statistic::ExpectedTotalUtility => "ETU",
            Statistic::ExpectedCost => "EC",
            Statistic::ExpectedTotalCost => "ETC",
        }
    }
}

impl Measurement {
    /// Returns the value of one scalar statistic.
    pub fn statistic(&self, statistic: Statistic) -> f64 {
        match statistic {
            Statistic::ExpectedItems => self.expected_items,
            Statistic::ExpectedUtility => self.expected_utility,
            Statistic::ExpectedTotalUtility => self.expected_total_utility,
            Statistic::ExpectedCost => self.expected_cost,
            Statistic::ExpectedTotalCost => self.expected_total_cost,
        }
    }
}

// ============================================================================
// CwlMetric
// ============================================================================

/// The C/W/L contract shared by all measures.
///
/// Implementors supply [`c_vector`](Self::c_vector) and
/// [`validate`](Self::validate). `w_vector` and `measure` are provided and
/// should not be overridden: they are where the W recurrence is enforced.
///
/// The vector methods assume valid parameters; [`measure`](Self::measure)
/// checks them first.
pub trait CwlMetric: Send + Sync {
    /// Measure name including parameter values, e.g. `RBP@0.8`.
    fn name(&self) -> String;

    /// Checks that every parameter lies in its domain.
    fn validate(&self) -> Result<(), MeasurementError>;

    /// Continuation probability at each rank, each in `[0, 1]`.
    fn c_vector(&self, ranking: &Ranking) -> Vec<f64>;

    /// Checks measure-specific assumptions about the ranking.
    fn check_ranking(&self, _ranking: &Ranking) -> Result<(), MeasurementError> {
        Ok(())
    }

    /// Probability that each rank is inspected.
    fn w_vector(&self, ranking: &Ranking) -> Vec<f64> {
        weights_from_continuation(&self.c_vector(ranking))
    }

    /// Utility collected at each rank. Defaults to the gain.
    fn l_vector(&self, ranking: &Ranking) -> Vec<f64> {
        ranking.gains().to_vec()
    }

    /// Cost of each rank. Defaults to the ranking's costs.
    fn cost_vector(&self, ranking: &Ranking) -> Vec<f64> {
        ranking.costs().to_vec()
    }

    /// Factor turning `Σ w_i·l_i` into the expected utility.
    ///
    /// The default, `1 / expected_items`, is the C/W/L expected rate of
    /// utility per inspected item.
    fn utility_scale(&self, _ranking: &Ranking, _c_vector: &[f64], expected_items: f64) -> f64 {
        1.0 / expected_items
    }

    /// Reference for the user model.
    fn citation(&self) -> &'static str {
        ""
    }

    /// Measures a ranking.
    ///
    /// Validates parameters and ranking, then derives W from C and sums the
    /// statistics over the vectors.
    ///
    /// # Errors
    ///
    /// - [`MeasurementError::EmptyRanking`] if the ranking has no ranks
    /// - [`MeasurementError::InvalidParameter`] if a parameter is out of range
    /// - [`MeasurementError::IncompatibleRanking`] if the ranking breaks
    ///   the measure's assumptions
    fn measure(&self, ranking: &Ranking) -> Result<Measurement, MeasurementError> {
        if ranking.is_empty() {
            return Err(MeasurementError::EmptyRanking {
                topic_id: ranking.topic_id().to_string(),
            });
        }
        self.validate()?;
        self.check_ranking(ranking)?;

        let c_vector = self.c_vector(ranking);
        let w_vector = weights_from_continuation(&c_vector);
        let l_vector = self.l_vector(ranking);
        let costs = self.cost_vector(ranking);

        let expected_items: f64 = w_vector.iter().sum();
        let scale = self.utility_scale(ranking, &c_vector, expected_items);
        let expected_utility = scale * dot(&w_vector, &l_vector);
        let expected_total_utility = dot(&w_vector, ranking.gains());
        let expected_total_cost = dot(&w_vector, &costs);

        Ok(Measurement {
            metric_name: self.name(),
            topic_id: ranking.topic_id().to_string(),
            c_vector,
            w_vector,
            l_vector,
            expected_items,
            expected_utility,
            expected_total_utility,
            expected_cost: expected_total_cost / expected_items,
            expected_total_cost,
        })
    }
}

impl<M: CwlMetric + ?Sized> CwlMetric for Box<M> {
    fn name(&self) -> String {
        (**self).name()
    }

    fn validate(&self) -> Result<(), MeasurementError> {
        (**self).validate()
    }

    fn c_vector(&self, ranking: &Ranking) -> Vec<f64> {
        (**self).c_vector(ranking)
    }

    fn check_ranking(&self, ranking: &Ranking) -> Result<(), MeasurementError> {
        (**self).check_ranking(ranking)
    }

    fn w_vector(&self, ranking: &Ranking) -> Vec<f64> {
        (**self).w_vector(ranking)
    }

    fn l_vector(&self, ranking: &Ranking) -> Vec<f64> {
        (**self).l_vector(ranking)
    }

    fn cost_vector(&self, ranking: &Ranking) -> Vec<f64> {
        (**self).cost_vector(ranking)
    }

    fn utility_scale(&self, ranking: &Ranking, c_vector: &[f64], expected_items: f64) -> f64 {
        (**self).utility_scale(ranking, c_vector, expected_items)
    }

    fn citation(&self) -> &'static str {
        (**self).citation()
    }

    fn measure(&self, ranking: &Ranking) -> Result<Measurement, MeasurementError> {
        (**self).measure(ranking)
    }
}

/// Measures with one primary parameter that can be swept.
pub trait Sweepable {
    /// Measure produced for each grid point.
    type Metric: CwlMetric;

    /// Name of the swept parameter, e.g. `theta`.
    fn parameter_name(&self) -> &'static str;

    /// Returns the measure with its primary parameter set to `value`.
    ///
    /// Other parameters are copied from `self`. The result is not
    /// validated; invalid values surface when the measure is applied.
    fn at(&self, value: f64) -> Result<Self::Metric, MeasurementError>;
}

// ============================================================================
// Shared helpers
// ============================================================================

/// Applies the W recurrence: `w_1 = 1`, `w_i = w_{i-1} * c_{i-1}`.
pub fn weights_from_continuation(c_vector: &[f64]) -> Vec<f64> {
    let mut weights = Vec::with_capacity(c_vector.len());
    let mut w = 1.0;
    for &c in c_vector {
        weights.push(w);
        w *= c;
    }
    weights
}

#[inline]
fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Converts a 0-based index into a 1-based rank as `f64`.
#[inline]
fn rank(index: usize) -> f64 {
    index as f64 + 1.0
}

/// Shared check for measures whose model needs gains in `[0, 1]`.
fn require_unit_gains(metric: &str, ranking: &Ranking) -> Result<(), MeasurementError> {
    match ranking
        .gains()
        .iter()
        .enumerate()
        .find(|(_, g)| !(0.0..=1.0).contains(*g))
    {
        Some((i, g)) => Err(MeasurementError::IncompatibleRanking {
            metric: metric.to_string(),
            topic_id: ranking.topic_id().to_string(),
            reason: format!("gain {} at rank {} is outside [0, 1]", g, i + 1),
        }),
        None => Ok(()),
    }
}

/// Shared check for strictly positive, finite parameters.
fn require_positive(metric: &str, parameter: &str, value: f64) -> Result<(), MeasurementError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(MeasurementError::invalid_parameter(
            metric, parameter, value, "> 0",
        ))
    }
}

/// Shared cutoff parameter for rank-limited measures.
fn require_cutoff(metric: &str, k: usize) -> Result<(), MeasurementError> {
    if k >= 1 {
        Ok(())
    } else {
        Err(MeasurementError::invalid_parameter(metric, "k", 0.0, ">= 1"))
    }
}

/// Maps a swept value onto a rank cutoff.
fn cutoff_from(metric: &str, value: f64) -> Result<usize, MeasurementError> {
    if value.is_finite() && value >= 0.5 {
        Ok(value.round() as usize)
    } else {
        Err(MeasurementError::invalid_parameter(metric, "k", value, ">= 1"))
    }
}

/// Formats a parameter value compactly for measure names.
fn fmt_param(value: f64) -> String {
    let s = format!("{}", value);
    if s.len() > 8 {
        format!("{:.4}", value)
    } else {
        s
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    /// Measure with a fixed continuation probability, for testing the
    /// provided methods in isolation.
    struct Constant(f64);

    impl CwlMetric for Constant {
        fn name(&self) -> String {
            format!("CONST@{}", self.0)
        }

        fn validate(&self) -> Result<(), MeasurementError> {
            Ok(())
        }

        fn c_vector(&self, ranking: &Ranking) -> Vec<f64> {
            vec![self.0; ranking.len()]
        }
    }

    #[test]
    fn test_weights_from_continuation() {
        assert_eq!(
            weights_from_continuation(&[0.5, 0.5, 0.5]),
            vec![1.0, 0.5, 0.25]
        );
        assert_eq!(weights_from_continuation(&[0.0, 1.0]), vec![1.0, 0.0]);
        assert!(weights_from_continuation(&[]).is_empty());
    }

    #[test]
    fn test_measure_default_statistics() {
        let r = Ranking::with_costs("t", vec![1.0, 0.0, 1.0], vec![1.0, 2.0, 3.0]).unwrap();
        let m = Constant(0.5).measure(&r).unwrap();

        assert_cwl_invariants(&m);
        assert!((m.expected_items - 1.75).abs() < 1e-12);
        // ETU = 1*1 + 0.5*0 + 0.25*1
        assert!((m.expected_total_utility - 1.25).abs() < 1e-12);
        // Default scale: EU = ETU / ED
        assert!((m.expected_utility - 1.25 / 1.75).abs() < 1e-12);
        // ETC = 1*1 + 0.5*2 + 0.25*3
        assert!((m.expected_total_cost - 2.75).abs() < 1e-12);
        assert!((m.expected_cost - 2.75 / 1.75).abs() < 1e-12);
        assert_eq!(m.topic_id, "t");
        assert_eq!(m.metric_name, "CONST@0.5");
    }

    #[test]
    fn test_measure_is_idempotent() {
        let r = ranking(&[0.0, 1.0, 1.0, 0.0]);
        let metric = Constant(0.7);
        assert_eq!(metric.measure(&r).unwrap(), metric.measure(&r).unwrap());
    }

    #[test]
    fn test_w_vector_matches_measure() {
        let r = ranking(&[1.0, 1.0, 1.0]);
        let metric = Constant(0.3);
        assert_eq!(metric.w_vector(&r), metric.measure(&r).unwrap().w_vector);
    }

    #[test]
    fn test_boxed_metric_delegates() {
        let r = ranking(&[1.0, 0.0]);
        let boxed: Box<dyn CwlMetric> = Box::new(Constant(0.5));
        assert_eq!(boxed.measure(&r).unwrap(), Constant(0.5).measure(&r).unwrap());
        assert_eq!(boxed.name(), "CONST@0.5");
    }

    #[test]
    fn test_statistic_lookup() {
        let m = Constant(0.5).measure(&ranking(&[1.0, 1.0])).unwrap();
        assert_eq!(m.statistic(Statistic::ExpectedItems), m.expected_items);
        assert_eq!(m.statistic(Statistic::ExpectedTotalCost), m.expected_total_cost);
        assert_eq!(Statistic::ExpectedUtility.label(), "EU");
    }

    #[test]
    fn test_require_unit_gains() {
        assert!(require_unit_gains("X", &ranking(&[0.0, 0.5, 1.0])).is_ok());
        let err = require_unit_gains("X", &ranking(&[0.0, 2.0])).unwrap_err();
        assert!(matches!(err, MeasurementError::IncompatibleRanking { .. }));
        assert!(require_unit_gains("X", &ranking(&[-1.0])).is_err());
    }

    #[test]
    fn test_fmt_param() {
        assert_eq!(fmt_param(0.8), "0.8");
        assert_eq!(fmt_param(10.0), "10");
        assert_eq!(fmt_param(1.0 / 3.0), "0.3333");
    }
}
