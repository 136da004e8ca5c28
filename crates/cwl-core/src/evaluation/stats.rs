//! Summary statistics over topics.
//!
//! A run is evaluated one topic at a time; reports want one number per
//! measure. [`summarize`] groups measurements by measure name and reports,
//! for each C/W/L statistic, the mean over topics with a percentile
//! bootstrap confidence interval.
//!
//! # References
//!
//! - Efron & Tibshirani (1993). "An Introduction to the Bootstrap"
//! - Sakai (2014). "Statistical reform in information retrieval?"

use crate::measures::{Measurement, Statistic};
use serde::Serialize;
use std::collections::BTreeMap;

/// Mean with a 95% confidence interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BootstrapResult {
    pub mean: f64,
    pub lower: f64,
    pub upper: f64,
}

impl BootstrapResult {
    /// Formats the result as "mean [lower, upper]".
    pub fn format(&self, precision: usize) -> String {
        format!(
            "{:.prec$} [{:.prec$}, {:.prec$}]",
            self.mean,
            self.lower,
            self.upper,
            prec = precision
        )
    }
}

/// Arithmetic mean; NaN for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Computes a 95% percentile bootstrap confidence interval for the mean.
///
/// Resamples `values` with replacement `n_bootstrap` times and takes the
/// 2.5th and 97.5th percentiles of the resample means. `seed` makes the
/// interval reproducible.
///
/// Returns NaN for all three fields if `values` is empty. With
/// `n_bootstrap == 0` the bounds collapse onto the mean.
///
/// # Example
///
/// ```
/// use cwl_core::evaluation::bootstrap_ci;
///
/// let rbp = vec![0.41, 0.55, 0.38, 0.62, 0.47];
/// let ci = bootstrap_ci(&rbp, 1000, 42);
/// assert!(ci.lower <= ci.mean && ci.mean <= ci.upper);
/// ```
pub fn bootstrap_ci(values: &[f64], n_bootstrap: usize, seed: u64) -> BootstrapResult {
    if values.is_empty() {
        return BootstrapResult {
            mean: f64::NAN,
            lower: f64::NAN,
            upper: f64::NAN,
        };
    }

    let n = values.len();
    let sample_mean = mean(values);
    if n_bootstrap == 0 {
        return BootstrapResult {
            mean: sample_mean,
            lower: sample_mean,
            upper: sample_mean,
        };
    }

    let mut rng = LcgRng::new(seed);
    let mut resample_means: Vec<f64> = (0..n_bootstrap)
        .map(|_| {
            let sum: f64 = (0..n).map(|_| values[rng.next_usize(n)]).sum();
            sum / n as f64
        })
        .collect();
    resample_means.sort_by(f64::total_cmp);

    let last = resample_means.len() - 1;
    let lower_idx = ((n_bootstrap as f64) * 0.025) as usize;
    let upper_idx = ((n_bootstrap as f64) * 0.975) as usize;

    BootstrapResult {
        mean: sample_mean,
        lower: resample_means[lower_idx.min(last)],
        upper: resample_means[upper_idx.min(last)],
    }
}

/// Per-measure summary over all topics it was applied to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSummary {
    pub metric_name: String,
    pub topics: usize,
    /// Keyed by statistic, in report order
    pub statistics: BTreeMap<Statistic, BootstrapResult>,
}

impl MetricSummary {
    pub fn get(&self, statistic: Statistic) -> Option<&BootstrapResult> {
        self.statistics.get(&statistic)
    }
}

/// Groups measurements by measure name and summarises each statistic.
///
/// Measures appear in the order they are first seen in `measurements`.
pub fn summarize(measurements: &[Measurement], n_bootstrap: usize, seed: u64) -> Vec<MetricSummary> {
    let mut order: Vec<&str> = Vec::new();
    let mut grouped: BTreeMap<&str, Vec<&Measurement>> = BTreeMap::new();
    for m in measurements {
        let group = grouped.entry(m.metric_name.as_str()).or_default();
        if group.is_empty() {
            order.push(m.metric_name.as_str());
        }
        group.push(m);
    }

    order
        .into_iter()
        .map(|name| {
            let group = &grouped[name];
            let statistics = Statistic::ALL
                .into_iter()
                .map(|statistic| {
                    let values: Vec<f64> = group.iter().map(|m| m.statistic(statistic)).collect();
                    (statistic, bootstrap_ci(&values, n_bootstrap, seed))
                })
                .collect();
            MetricSummary {
                metric_name: name.to_string(),
                topics: group.len(),
                statistics,
            }
        })
        .collect()
}

// ============================================================================
// Internal: seeded LCG
// ============================================================================

/// Linear congruential generator (Knuth's MMIX constants).
///
/// Resampling only needs reproducible, roughly uniform indices.
struct LcgRng {
    state: u64,
}

impl LcgRng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.state
    }

    fn next_usize(&mut self, max: usize) -> usize {
        // High bits of an LCG are the well-mixed ones
        ((self.next() >> 33) as usize) % max
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measures::{CwlMetric, Precision, Rbp};
    use crate::ranking::Ranking;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[1.0, 2.0, 3.0]), 2.0);
        assert!(mean(&[]).is_nan());
    }

    #[test]
    fn test_bootstrap_ci_basic() {
        let values = vec![0.85, 0.90, 0.88, 0.92, 0.87, 0.89, 0.91, 0.86, 0.88, 0.90];
        let result = bootstrap_ci(&values, 1000, 42);

        assert!((result.mean - 0.886).abs() < 1e-9);
        assert!(result.lower <= result.mean);
        assert!(result.upper >= result.mean);

        let width = result.upper - result.lower;
        assert!(width > 0.005 && width < 0.1, "unexpected CI width {}", width);
    }

    #[test]
    fn test_bootstrap_ci_single_value() {
        let result = bootstrap_ci(&[0.9], 100, 42);
        assert_eq!(result.mean, 0.9);
        assert_eq!(result.lower, 0.9);
        assert_eq!(result.upper, 0.9);
    }

    #[test]
    fn test_bootstrap_ci_empty() {
        let result = bootstrap_ci(&[], 100, 42);
        assert!(result.mean.is_nan());
        assert!(result.lower.is_nan());
    }

    #[test]
    fn test_bootstrap_ci_zero_resamples() {
        let result = bootstrap_ci(&[1.0, 3.0], 0, 42);
        assert_eq!(result.lower, 2.0);
        assert_eq!(result.upper, 2.0);
    }

    #[test]
    fn test_bootstrap_ci_reproducible() {
        let values = [0.1, 0.5, 0.3, 0.9, 0.7, 0.2];
        assert_eq!(bootstrap_ci(&values, 500, 7), bootstrap_ci(&values, 500, 7));
    }

    #[test]
    fn test_bootstrap_format() {
        let result = BootstrapResult {
            mean: 0.5,
            lower: 0.25,
            upper: 0.75,
        };
        assert_eq!(result.format(2), "0.50 [0.25, 0.75]");
    }

    #[test]
    fn test_summarize_groups_by_metric() {
        let rankings = [
            Ranking::new("t1", vec![1.0, 0.0]).unwrap(),
            Ranking::new("t2", vec![0.0, 0.0]).unwrap(),
        ];
        let mut measurements = Vec::new();
        for r in &rankings {
            measurements.push(Rbp::new(0.5).measure(r).unwrap());
            measurements.push(Precision::new(2).measure(r).unwrap());
        }

        let summaries = summarize(&measurements, 200, 42);
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].metric_name, "RBP@0.5");
        assert_eq!(summaries[1].metric_name, "P@2");
        assert_eq!(summaries[1].topics, 2);

        // P@2 is 0.5 on t1 and 0 on t2
        let eu = summaries[1].get(Statistic::ExpectedUtility).unwrap();
        assert!((eu.mean - 0.25).abs() < 1e-12);
        assert_eq!(summaries[1].statistics.len(), Statistic::ALL.len());
    }

    #[test]
    fn test_lcg_reproducibility() {
        let mut rng1 = LcgRng::new(42);
        let mut rng2 = LcgRng::new(42);
        for _ in 0..100 {
            assert_eq!(rng1.next(), rng2.next());
        }
    }
}
