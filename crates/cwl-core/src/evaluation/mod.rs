//! Evaluating system runs against relevance judgments.
//!
//! This module connects TREC-style files to the measures:
//!
//! 1. [`load_qrels`], [`load_run`] and optionally [`load_costs`] read the
//!    input files.
//! 2. [`build_rankings`] turns them into one [`Ranking`](crate::ranking::Ranking)
//!    per topic, with gains normalised to `[0, 1]`.
//! 3. Any [`CwlMetric`](crate::measures::CwlMetric) measures the rankings;
//!    [`summarize`] reports each statistic's mean over topics with a
//!    bootstrap confidence interval.
//!
//! # Example
//!
//! ```no_run
//! use cwl_core::evaluation::{build_rankings, load_qrels, load_run};
//! use cwl_core::measures::{CwlMetric, Rbp};
//! use std::path::Path;
//!
//! let qrels = load_qrels(Path::new("qrels.txt"))?;
//! let run = load_run(Path::new("run.txt"))?;
//! for ranking in build_rankings(&qrels, &run, None, None)? {
//!     let m = Rbp::new(0.8).measure(&ranking)?;
//!     println!("{} {:.4}", ranking.topic_id(), m.expected_utility);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod stats;
pub mod trec;

pub use stats::{bootstrap_ci, mean, summarize, BootstrapResult, MetricSummary};
pub use trec::{
    build_rankings, load_costs, load_qrels, load_run, CostTable, Qrels, Run, RunEntry,
};
