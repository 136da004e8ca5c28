//! # cwl-core
//!
//! C/W/L (Continue, Weight, Last) evaluation of ranked retrieval results.
//!
//! A C/W/L measure is a user model: at each rank the user continues to the
//! next item with probability `c_i`. The probability of reaching each rank,
//! and from it expected depth, utility and cost, follow from C alone. This
//! crate provides the framework, the classic measures expressed in it, and
//! the plumbing to run them over TREC-style evaluation data.
//!
//! ## Modules
//!
//! - [`ranking`] - Validated per-topic ranked lists of gains and costs
//! - [`measures`] - The [`CwlMetric`] trait and concrete measures
//! - [`sweep`] - Parameter sweeps over a set of rankings
//! - [`evaluation`] - TREC qrels/run/cost loading and topic summaries
//! - [`config`] - Default parameters and tolerances
//! - [`error`] - Error types
//!
//! ## Example
//!
//! ```
//! use cwl_core::{CwlMetric, Ranking, Rbp};
//!
//! let ranking = Ranking::new("401", vec![1.0, 0.0, 1.0, 1.0]).unwrap();
//! let m = Rbp::new(0.8).measure(&ranking).unwrap();
//! assert!(m.expected_utility > 0.0);
//! assert_eq!(m.w_vector[0], 1.0);
//! ```

pub mod config;
pub mod error;
pub mod evaluation;
pub mod measures;
pub mod ranking;
pub mod sweep;

pub use error::{LoadError, MeasurementError, RankingError};
pub use measures::{
    AveragePrecision, Bpm, BpmMode, CwlMetric, Dcg, Ift, IftMode, Insq, Inst, MeasureSession,
    Measurement, MetricKind, MetricSpec, Precision, Rbp, ReciprocalRank, Statistic, Sweepable,
    Tbg, UMeasure,
};
pub use ranking::Ranking;
pub use sweep::{par_sweep, sweep, SweepResult};
