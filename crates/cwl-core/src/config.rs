//! Production configuration constants.
//!
//! Default parameters for every measure, numeric tolerances, and the
//! metric set evaluated when the caller does not name one. The CLI and the
//! benchmarks use these values so that reported numbers stay comparable.
//!
//! # Usage
//!
//! ```
//! use cwl_core::config::{DEFAULT_METRICS, DEFAULT_RBP_THETA};
//!
//! assert!(DEFAULT_RBP_THETA > 0.0 && DEFAULT_RBP_THETA < 1.0);
//! assert!(!DEFAULT_METRICS.is_empty());
//! ```

// =============================================================================
// Numerics
// =============================================================================

/// Absolute tolerance used when comparing derived statistics.
pub const EPSILON: f64 = 1e-9;

/// Cost charged for inspecting one item when no cost file is supplied.
pub const DEFAULT_ITEM_COST: f64 = 1.0;

// =============================================================================
// Measure Defaults
// =============================================================================

/// RBP persistence.
///
/// Moffat & Zobel suggest 0.8 for a typical searcher.
pub const DEFAULT_RBP_THETA: f64 = 0.8;

/// TBG half-life, in cost units (items when costs are unit).
pub const DEFAULT_TBG_HALFLIFE: f64 = 4.0;

/// BPM benefit target.
pub const DEFAULT_BPM_T: f64 = 2.0;

/// BPM cost budget.
pub const DEFAULT_BPM_K: f64 = 10.0;

/// BPM cost of clicking a relevant item.
pub const DEFAULT_BPM_HC: f64 = 1.0;

/// BPM cost of browsing past a non-relevant item.
pub const DEFAULT_BPM_HB: f64 = 1.0;

/// Evaluation depth for DCG and Precision.
pub const DEFAULT_CUTOFF: usize = 10;

/// INST/INSQ expected number of relevant items sought.
pub const DEFAULT_INST_T: f64 = 1.0;

/// U-Measure text budget, in cost units.
pub const DEFAULT_UMEASURE_L: f64 = 50.0;

/// IFT goal (gain the user wants to collect).
pub const DEFAULT_IFT_T: f64 = 2.0;

/// IFT expected rate of gain per unit cost.
pub const DEFAULT_IFT_A: f64 = 0.2;

/// IFT scaling factor applied to the goal/rate logistic.
pub const DEFAULT_IFT_B: f64 = 0.9;

/// IFT steepness of the goal/rate logistic.
pub const DEFAULT_IFT_R: f64 = 10.0;

/// Metric set evaluated when the caller does not supply one.
///
/// Each entry is a [`MetricSpec`](crate::measures::MetricSpec) string.
pub const DEFAULT_METRICS: &[&str] = &[
    "P:k=10",
    "RR",
    "AP",
    "DCG:k=10",
    "RBP:theta=0.5",
    "RBP:theta=0.8",
    "RBP:theta=0.95",
    "INST:t=1",
    "INSQ:t=1",
    "TBG:halflife=4",
    "BPM:t=2,k=10,hc=1,hb=1",
    "BPM-D:t=2,k=10,hc=0.5,hb=0.5",
    "UMEASURE:l=50",
];

// =============================================================================
// Summary Statistics
// =============================================================================

/// Bootstrap resamples used for per-metric confidence intervals.
pub const DEFAULT_BOOTSTRAP_SAMPLES: usize = 1000;

/// Seed for the bootstrap resampler so reports are reproducible.
pub const DEFAULT_BOOTSTRAP_SEED: u64 = 42;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_theta_in_domain() {
        let theta = DEFAULT_RBP_THETA;
        assert!(theta > 0.0 && theta < 1.0, "theta must lie in (0, 1)");
    }

    #[test]
    fn test_default_metrics_parse() {
        for spec in DEFAULT_METRICS {
            assert!(
                crate::measures::MetricSpec::parse(spec).is_ok(),
                "default metric {} should parse",
                spec
            );
        }
    }
}
