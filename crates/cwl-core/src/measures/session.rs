//! Measure-then-read sessions.
//!
//! [`CwlMetric::measure`] is pure and returns a fresh [`Measurement`]. Some
//! callers prefer to hold one measure, measure a ranking, and then read the
//! statistics back one at a time. [`MeasureSession`] supports that protocol
//! without letting a stale measurement outlive a parameter change.

use super::{CwlMetric, Measurement};
use crate::error::MeasurementError;
use crate::ranking::Ranking;

/// A measure plus its most recent measurement.
///
/// A session starts unmeasured: every accessor returns
/// [`MeasurementError::NotMeasured`] until [`measure`](Self::measure)
/// succeeds. Taking mutable access to the measure discards the cached
/// result.
///
/// # Example
///
/// ```
/// use cwl_core::measures::{MeasureSession, Rbp};
/// use cwl_core::ranking::Ranking;
///
/// let ranking = Ranking::new("t1", vec![1.0, 0.0, 1.0]).unwrap();
/// let mut session = MeasureSession::new(Rbp::new(0.5));
/// assert!(session.expected_items().is_err());
///
/// session.measure(&ranking).unwrap();
/// assert!((session.expected_items().unwrap() - 1.75).abs() < 1e-12);
///
/// session.metric_mut().theta = 0.9;
/// assert!(session.expected_items().is_err());
/// ```
#[derive(Debug, Clone)]
pub struct MeasureSession<M: CwlMetric> {
    metric: M,
    last: Option<Measurement>,
}

impl<M: CwlMetric> MeasureSession<M> {
    pub fn new(metric: M) -> Self {
        Self { metric, last: None }
    }

    /// Measures `ranking` and caches the result.
    ///
    /// On error the previous measurement is discarded as well, so the
    /// session never reports statistics for parameters it could not apply.
    pub fn measure(&mut self, ranking: &Ranking) -> Result<&Measurement, MeasurementError> {
        self.last = None;
        let measurement = self.metric.measure(ranking)?;
        let cached: &Measurement = self.last.insert(measurement);
        Ok(cached)
    }

    pub fn metric(&self) -> &M {
        &self.metric
    }

    /// Mutable access to the measure's parameters. Clears the cached result.
    pub fn metric_mut(&mut self) -> &mut M {
        self.last = None;
        &mut self.metric
    }

    /// The cached measurement, if any.
    pub fn last(&self) -> Option<&Measurement> {
        self.last.as_ref()
    }

    pub fn is_measured(&self) -> bool {
        self.last.is_some()
    }

    fn measured(&self) -> Result<&Measurement, MeasurementError> {
        self.last.as_ref().ok_or(MeasurementError::NotMeasured)
    }

    pub fn metric_name(&self) -> Result<&str, MeasurementError> {
        self.measured().map(|m| m.metric_name.as_str())
    }

    pub fn c_vector(&self) -> Result<&[f64], MeasurementError> {
        self.measured().map(|m| m.c_vector.as_slice())
    }

    pub fn w_vector(&self) -> Result<&[f64], MeasurementError> {
        self.measured().map(|m| m.w_vector.as_slice())
    }

    pub fn l_vector(&self) -> Result<&[f64], MeasurementError> {
        self.measured().map(|m| m.l_vector.as_slice())
    }

    pub fn expected_items(&self) -> Result<f64, MeasurementError> {
        self.measured().map(|m| m.expected_items)
    }

    pub fn expected_utility(&self) -> Result<f64, MeasurementError> {
        self.measured().map(|m| m.expected_utility)
    }

    pub fn expected_total_utility(&self) -> Result<f64, MeasurementError> {
        self.measured().map(|m| m.expected_total_utility)
    }

    pub fn expected_cost(&self) -> Result<f64, MeasurementError> {
        self.measured().map(|m| m.expected_cost)
    }

    pub fn expected_total_cost(&self) -> Result<f64, MeasurementError> {
        self.measured().map(|m| m.expected_total_cost)
    }
}
