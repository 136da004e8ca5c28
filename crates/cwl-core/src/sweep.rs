//! Parameter sweeps.
//!
//! A sweep applies one measure, at each value of a parameter grid, to every
//! ranking in a set, and collects per-topic sequences of the scalar
//! statistics in grid order. The result is what external plotting tools
//! consume (one line per topic, x axis = parameter value).
//!
//! [`sweep`] runs sequentially; [`par_sweep`] spreads the (grid point,
//! topic) units over rayon's pool and writes each result back to its
//! index, so both return identical output.

use crate::error::MeasurementError;
use crate::measures::{CwlMetric, Measurement, Statistic, Sweepable};
use crate::ranking::Ranking;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, instrument};

/// Topic id → one value per grid point, in grid order.
pub type TopicSeries = BTreeMap<String, Vec<f64>>;

/// Per-topic statistic sequences produced by a sweep.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepResult {
    /// Name of the swept parameter
    pub parameter: String,
    /// Parameter values, in the order they were swept
    pub grid: Vec<f64>,
    pub expected_items: TopicSeries,
    pub expected_utility: TopicSeries,
    pub expected_total_utility: TopicSeries,
    pub expected_cost: TopicSeries,
    pub expected_total_cost: TopicSeries,
}

impl SweepResult {
    fn empty(parameter: &str, grid: &[f64]) -> Self {
        Self {
            parameter: parameter.to_string(),
            grid: grid.to_vec(),
            expected_items: BTreeMap::new(),
            expected_utility: BTreeMap::new(),
            expected_total_utility: BTreeMap::new(),
            expected_cost: BTreeMap::new(),
            expected_total_cost: BTreeMap::new(),
        }
    }

    /// The mapping for one statistic.
    pub fn get(&self, statistic: Statistic) -> &TopicSeries {
        match statistic {
            Statistic::ExpectedItems => &self.expected_items,
            Statistic::ExpectedUtility => &self.expected_utility,
            Statistic::ExpectedTotalUtility => &self.expected_total_utility,
            Statistic::ExpectedCost => &self.expected_cost,
            Statistic::ExpectedTotalCost => &self.expected_total_cost,
        }
    }

    fn get_mut(&mut self, statistic: Statistic) -> &mut TopicSeries {
        match statistic {
            Statistic::ExpectedItems => &mut self.expected_items,
            Statistic::ExpectedUtility => &mut self.expected_utility,
            Statistic::ExpectedTotalUtility => &mut self.expected_total_utility,
            Statistic::ExpectedCost => &mut self.expected_cost,
            Statistic::ExpectedTotalCost => &mut self.expected_total_cost,
        }
    }

    /// Topic ids present in the result, sorted.
    pub fn topics(&self) -> impl Iterator<Item = &str> {
        self.expected_items.keys().map(String::as_str)
    }

    /// Appends one grid point's measurement for a topic.
    fn push(&mut self, measurement: &Measurement) {
        for statistic in Statistic::ALL {
            self.get_mut(statistic)
                .entry(measurement.topic_id.clone())
                .or_default()
                .push(measurement.statistic(statistic));
        }
    }
}

fn check_unique_topics(rankings: &[Ranking]) -> Result<(), MeasurementError> {
    let mut seen = HashSet::with_capacity(rankings.len());
    for ranking in rankings {
        if !seen.insert(ranking.topic_id()) {
            return Err(MeasurementError::DuplicateTopic(
                ranking.topic_id().to_string(),
            ));
        }
    }
    Ok(())
}

/// Sweeps `metric`'s primary parameter over `grid`.
///
/// For each grid value in order, the measure is rebuilt with that value
/// and applied to every ranking. Rankings are not modified.
///
/// # Errors
///
/// - [`MeasurementError::DuplicateTopic`] if two rankings share a topic id
/// - any error from building or applying the measure; the first one aborts
///   the sweep and no partial result is returned
///
/// # Example
///
/// ```
/// use cwl_core::measures::Rbp;
/// use cwl_core::ranking::Ranking;
/// use cwl_core::sweep::sweep;
///
/// let rankings = vec![
///     Ranking::new("t1", vec![1.0, 0.0, 1.0]).unwrap(),
///     Ranking::new("t2", vec![0.0, 1.0]).unwrap(),
/// ];
/// let result = sweep(&Rbp::default(), &rankings, &[0.1, 0.5, 0.9]).unwrap();
/// assert_eq!(result.expected_items.len(), 2);
/// assert_eq!(result.expected_items["t1"].len(), 3);
/// ```
#[instrument(skip_all, fields(parameter = metric.parameter_name(), grid = grid.len(), topics = rankings.len()))]
pub fn sweep<S: Sweepable + ?Sized>(
    metric: &S,
    rankings: &[Ranking],
    grid: &[f64],
) -> Result<SweepResult, MeasurementError> {
    check_unique_topics(rankings)?;
    let mut result = SweepResult::empty(metric.parameter_name(), grid);

    for &value in grid {
        let instance = metric.at(value)?;
        debug!("Sweeping {} = {}", metric.parameter_name(), value);
        for ranking in rankings {
            let measurement = instance.measure(ranking)?;
            result.push(&measurement);
        }
    }

    Ok(result)
}

/// Parallel version of [`sweep`] with the same contract and output.
///
/// Every (grid point, topic) pair is an independent unit of work. Results
/// are collected into a vector indexed like the sequential loop and then
/// assembled in order, so grid order is preserved per topic.
#[instrument(skip_all, fields(parameter = metric.parameter_name(), grid = grid.len(), topics = rankings.len()))]
pub fn par_sweep<S: Sweepable + ?Sized>(
    metric: &S,
    rankings: &[Ranking],
    grid: &[f64],
) -> Result<SweepResult, MeasurementError> {
    check_unique_topics(rankings)?;

    let instances: Vec<S::Metric> = grid
        .iter()
        .map(|&value| metric.at(value))
        .collect::<Result<_, _>>()?;

    let n_topics = rankings.len();
    let measurements: Vec<Measurement> = (0..grid.len() * n_topics)
        .into_par_iter()
        .map(|unit| instances[unit / n_topics].measure(&rankings[unit % n_topics]))
        .collect::<Result<_, _>>()?;
    debug!("Measured {} sweep units", measurements.len());

    let mut result = SweepResult::empty(metric.parameter_name(), grid);
    for measurement in &measurements {
        result.push(measurement);
    }
    Ok(result)
}
