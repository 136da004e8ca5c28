//! Error types for cwl-core.
//!
//! This module defines the error types used across the core library:
//! ranking construction, measurement, and loading of TREC-style input files.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while constructing a [`Ranking`](crate::ranking::Ranking).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RankingError {
    /// Topic identifier was empty or whitespace
    #[error("Ranking has an empty topic id")]
    EmptyTopicId,
    /// Ranking contained no items
    #[error("Ranking for topic {topic_id} is empty")]
    Empty { topic_id: String },
    /// Gain at a rank was NaN or infinite
    #[error("Ranking for topic {topic_id} has non-finite gain {value} at rank {rank}")]
    NonFiniteGain {
        topic_id: String,
        rank: usize,
        value: f64,
    },
    /// Cost at a rank was non-finite, zero or negative
    #[error("Ranking for topic {topic_id} has invalid cost {value} at rank {rank} (must be finite and > 0)")]
    InvalidCost {
        topic_id: String,
        rank: usize,
        value: f64,
    },
    /// Cost vector length differs from gain vector length
    #[error("Ranking for topic {topic_id} has {gains} gains but {costs} costs")]
    CostLengthMismatch {
        topic_id: String,
        gains: usize,
        costs: usize,
    },
    /// Declared number of relevant documents is below what the ranking already holds
    #[error("Ranking for topic {topic_id} declares {relevant_total} relevant documents but contains {found}")]
    RelevantTotalTooSmall {
        topic_id: String,
        relevant_total: usize,
        found: usize,
    },
}

/// Errors raised while measuring a ranking or building a measure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeasurementError {
    /// A measure parameter lies outside its valid domain
    #[error("{metric}: parameter {parameter}={value} is out of range (expected {expected})")]
    InvalidParameter {
        metric: String,
        parameter: String,
        value: f64,
        expected: String,
    },
    /// Ranking has no items to measure
    #[error("Cannot measure empty ranking for topic {topic_id}")]
    EmptyRanking { topic_id: String },
    /// Ranking violates an assumption of the measure
    #[error("{metric} cannot measure topic {topic_id}: {reason}")]
    IncompatibleRanking {
        metric: String,
        topic_id: String,
        reason: String,
    },
    /// A statistic was read before any measurement was taken
    #[error("No measurement available: call measure() first")]
    NotMeasured,
    /// Metric name in a specification string is not known
    #[error("Unknown metric: {0}")]
    UnknownMetric(String),
    /// Specification string could not be parsed
    #[error("Malformed metric specification: {0}")]
    MalformedSpec(String),
    /// Same topic supplied twice to a sweep
    #[error("Duplicate topic in sweep input: {0}")]
    DuplicateTopic(String),
}

/// Errors that can occur while loading qrels, runs, cost and metric files.
///
/// Rejected metric specifications are reported as [`LoadError::InvalidFormat`]
/// with the offending line.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Failed to read file
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A line did not match the expected format
    #[error("{path}:{line}: {reason}")]
    InvalidFormat {
        path: PathBuf,
        line: usize,
        reason: String,
    },
    /// Loaded data did not form a valid ranking
    #[error(transparent)]
    Ranking(#[from] RankingError),
}

impl LoadError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        LoadError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn format(path: &std::path::Path, line: usize, reason: impl Into<String>) -> Self {
        LoadError::InvalidFormat {
            path: path.to_path_buf(),
            line,
            reason: reason.into(),
        }
    }
}

impl MeasurementError {
    /// Builds an [`MeasurementError::InvalidParameter`] for `metric`.
    pub fn invalid_parameter(
        metric: &str,
        parameter: &str,
        value: f64,
        expected: &str,
    ) -> Self {
        MeasurementError::InvalidParameter {
            metric: metric.to_string(),
            parameter: parameter.to_string(),
            value,
            expected: expected.to_string(),
        }
    }
}
