//! Metric specification strings.
//!
//! A specification names a measure and optionally overrides some of its
//! parameters:
//!
//! ```text
//! RBP
//! RBP:theta=0.8
//! BPM:t=2,k=10,hc=0.5,hb=0.5
//! P:k=10
//! ```
//!
//! Names are case-insensitive. Parameters left out take their defaults from
//! [`crate::config`].

use super::{
    cutoff_from, AveragePrecision, Bpm, BpmMode, CwlMetric, Dcg, Ift, IftMode, Insq, Inst,
    Precision, Rbp, ReciprocalRank, Sweepable, Tbg, UMeasure,
};
use crate::error::{LoadError, MeasurementError};
use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// The measure families a [`MetricSpec`] can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MetricKind {
    Precision,
    Rr,
    Ap,
    Dcg,
    Rbp,
    Tbg,
    Bpm,
    BpmDynamic,
    Inst,
    Insq,
    UMeasure,
    IftGoal,
    IftRate,
    IftGoalRate,
}

impl MetricKind {
    pub const ALL: [MetricKind; 14] = [
        MetricKind::Precision,
        MetricKind::Rr,
        MetricKind::Ap,
        MetricKind::Dcg,
        MetricKind::Rbp,
        MetricKind::Tbg,
        MetricKind::Bpm,
        MetricKind::BpmDynamic,
        MetricKind::Inst,
        MetricKind::Insq,
        MetricKind::UMeasure,
        MetricKind::IftGoal,
        MetricKind::IftRate,
        MetricKind::IftGoalRate,
    ];

    /// Canonical specification name.
    pub fn name(&self) -> &'static str {
        match self {
            MetricKind::Precision => "P",
            MetricKind::Rr => "RR",
            MetricKind::Ap => "AP",
            MetricKind::Dcg => "DCG",
            MetricKind::Rbp => "RBP",
            MetricKind::Tbg => "TBG",
            MetricKind::Bpm => "BPM",
            MetricKind::BpmDynamic => "BPM-D",
            MetricKind::Inst => "INST",
            MetricKind::Insq => "INSQ",
            MetricKind::UMeasure => "UMEASURE",
            MetricKind::IftGoal => "IFT-GOAL",
            MetricKind::IftRate => "IFT-RATE",
            MetricKind::IftGoalRate => "IFT-GOAL-RATE",
        }
    }

    /// Looks up a kind by name, ignoring case. Accepts a few aliases.
    pub fn from_name(name: &str) -> Option<Self> {
        let upper = name.trim().to_ascii_uppercase();
        match upper.as_str() {
            "PRECISION" => Some(MetricKind::Precision),
            "U" | "U-MEASURE" => Some(MetricKind::UMeasure),
            "BPMD" | "BPM-DYNAMIC" => Some(MetricKind::BpmDynamic),
            _ => Self::ALL.into_iter().find(|k| k.name() == upper),
        }
    }

    /// Parameters accepted by this kind; the first is the one swept.
    pub fn parameters(&self) -> &'static [&'static str] {
        match self {
            MetricKind::Precision | MetricKind::Dcg => &["k"],
            MetricKind::Rr | MetricKind::Ap => &[],
            MetricKind::Rbp => &["theta"],
            MetricKind::Tbg => &["halflife"],
            MetricKind::Bpm | MetricKind::BpmDynamic => &["t", "k", "hc", "hb"],
            MetricKind::Inst | MetricKind::Insq => &["t"],
            MetricKind::UMeasure => &["l"],
            MetricKind::IftGoal => &["t", "b1", "r1"],
            MetricKind::IftRate => &["a", "b2", "r2"],
            MetricKind::IftGoalRate => &["t", "a", "b1", "r1", "b2", "r2"],
        }
    }

    /// The parameter a sweep varies, if the kind has one.
    pub fn primary_parameter(&self) -> Option<&'static str> {
        self.parameters().first().copied()
    }

    pub fn description(&self) -> &'static str {
        match self {
            MetricKind::Precision => "Precision at cutoff k",
            MetricKind::Rr => "Reciprocal rank",
            MetricKind::Ap => "Average precision",
            MetricKind::Dcg => "Discounted cumulative gain at cutoff k",
            MetricKind::Rbp => "Rank-biased precision with persistence theta",
            MetricKind::Tbg => "Time-biased gain with the given halflife",
            MetricKind::Bpm => "Bejewelled player model (benefit t, budget k)",
            MetricKind::BpmDynamic => "Bejewelled player model with adaptive t and k",
            MetricKind::Inst => "Adaptive goal-sensitive measure, T relevant wanted",
            MetricKind::Insq => "Static goal-sensitive measure, T relevant wanted",
            MetricKind::UMeasure => "U-Measure with text budget l",
            MetricKind::IftGoal => "Information foraging, goal sensitive",
            MetricKind::IftRate => "Information foraging, rate sensitive",
            MetricKind::IftGoalRate => "Information foraging, goal and rate sensitive",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A parsed metric specification.
///
/// # Example
///
/// ```
/// use cwl_core::measures::{CwlMetric, MetricSpec};
///
/// let spec: MetricSpec = "rbp:theta=0.8".parse().unwrap();
/// assert_eq!(spec.to_string(), "RBP:theta=0.8");
/// assert_eq!(spec.build().unwrap().name(), "RBP@0.8");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSpec {
    kind: MetricKind,
    params: BTreeMap<String, f64>,
}

impl MetricSpec {
    /// Specification for `kind` with all parameters at their defaults.
    pub fn new(kind: MetricKind) -> Self {
        Self {
            kind,
            params: BTreeMap::new(),
        }
    }

    /// Parses `NAME` or `NAME:param=value,param=value`.
    ///
    /// # Errors
    ///
    /// - [`MeasurementError::UnknownMetric`] for an unknown name
    /// - [`MeasurementError::MalformedSpec`] for syntax errors or repeated
    ///   parameters
    /// - [`MeasurementError::InvalidParameter`] for a parameter the measure
    ///   does not take
    pub fn parse(spec: &str) -> Result<Self, MeasurementError> {
        let spec = spec.trim();
        let (name, rest) = match spec.split_once(':') {
            Some((name, rest)) => (name, Some(rest)),
            None => (spec, None),
        };
        if name.trim().is_empty() {
            return Err(MeasurementError::MalformedSpec(spec.to_string()));
        }
        let kind = MetricKind::from_name(name)
            .ok_or_else(|| MeasurementError::UnknownMetric(name.trim().to_string()))?;

        let mut parsed = Self::new(kind);
        let Some(rest) = rest else {
            return Ok(parsed);
        };

        for pair in rest.split(',') {
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| MeasurementError::MalformedSpec(spec.to_string()))?;
            let key = key.trim().to_ascii_lowercase();
            let value: f64 = value
                .trim()
                .parse()
                .map_err(|_| MeasurementError::MalformedSpec(spec.to_string()))?;
            parsed.check_known(&key, value)?;
            if parsed.params.insert(key, value).is_some() {
                return Err(MeasurementError::MalformedSpec(spec.to_string()));
            }
        }
        Ok(parsed)
    }

    pub fn kind(&self) -> MetricKind {
        self.kind
    }

    /// Explicitly set parameters.
    pub fn params(&self) -> &BTreeMap<String, f64> {
        &self.params
    }

    /// Returns a copy with one parameter overridden.
    pub fn with_parameter(&self, name: &str, value: f64) -> Result<Self, MeasurementError> {
        let key = name.to_ascii_lowercase();
        self.check_known(&key, value)?;
        let mut spec = self.clone();
        spec.params.insert(key, value);
        Ok(spec)
    }

    /// Builds and validates the measure.
    pub fn build(&self) -> Result<Box<dyn CwlMetric>, MeasurementError> {
        let metric = self.instantiate()?;
        metric.validate()?;
        Ok(metric)
    }

    fn check_known(&self, key: &str, value: f64) -> Result<(), MeasurementError> {
        if self.kind.parameters().contains(&key) {
            Ok(())
        } else {
            let expected = match self.kind.parameters() {
                [] => "no parameters".to_string(),
                names => format!("one of {}", names.join(", ")),
            };
            Err(MeasurementError::invalid_parameter(
                self.kind.name(),
                key,
                value,
                &expected,
            ))
        }
    }

    fn param(&self, name: &str, default: f64) -> f64 {
        self.params.get(name).copied().unwrap_or(default)
    }

    fn cutoff(&self, default: usize) -> Result<usize, MeasurementError> {
        match self.params.get("k") {
            None => Ok(default),
            Some(&k) if k.fract() == 0.0 => cutoff_from(self.kind.name(), k),
            Some(&k) => Err(MeasurementError::invalid_parameter(
                self.kind.name(),
                "k",
                k,
                "integer >= 1",
            )),
        }
    }

    /// Constructs the measure without validating its parameters.
    fn instantiate(&self) -> Result<Box<dyn CwlMetric>, MeasurementError> {
        let metric: Box<dyn CwlMetric> = match self.kind {
            MetricKind::Precision => {
                Box::new(Precision::new(self.cutoff(Precision::default().k)?))
            }
            MetricKind::Dcg => Box::new(Dcg::new(self.cutoff(Dcg::default().k)?)),
            MetricKind::Rr => Box::new(ReciprocalRank),
            MetricKind::Ap => Box::new(AveragePrecision),
            MetricKind::Rbp => Box::new(Rbp::new(self.param("theta", Rbp::default().theta))),
            MetricKind::Tbg => Box::new(Tbg::new(
                self.param("halflife", Tbg::default().halflife),
            )),
            MetricKind::Bpm | MetricKind::BpmDynamic => {
                let d = Bpm::default();
                let mode = match self.kind {
                    MetricKind::BpmDynamic => BpmMode::Dynamic,
                    _ => BpmMode::Static,
                };
                Box::new(Bpm {
                    mode,
                    t: self.param("t", d.t),
                    k: self.param("k", d.k),
                    hc: self.param("hc", d.hc),
                    hb: self.param("hb", d.hb),
                })
            }
            MetricKind::Inst => Box::new(Inst::new(self.param("t", Inst::default().t))),
            MetricKind::Insq => Box::new(Insq::new(self.param("t", Insq::default().t))),
            MetricKind::UMeasure => {
                Box::new(UMeasure::new(self.param("l", UMeasure::default().l)))
            }
            MetricKind::IftGoal | MetricKind::IftRate | MetricKind::IftGoalRate => {
                let d = Ift::default();
                let mode = match self.kind {
                    MetricKind::IftGoal => IftMode::Goal,
                    MetricKind::IftRate => IftMode::Rate,
                    _ => IftMode::GoalRate,
                };
                Box::new(Ift {
                    mode,
                    t: self.param("t", d.t),
                    b1: self.param("b1", d.b1),
                    r1: self.param("r1", d.r1),
                    a: self.param("a", d.a),
                    b2: self.param("b2", d.b2),
                    r2: self.param("r2", d.r2),
                })
            }
        };
        Ok(metric)
    }
}

impl FromStr for MetricSpec {
    type Err = MeasurementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for MetricSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind.name())?;
        for (i, (key, value)) in self.params.iter().enumerate() {
            let sep = if i == 0 { ':' } else { ',' };
            write!(f, "{}{}={}", sep, key, value)?;
        }
        Ok(())
    }
}

impl Sweepable for MetricSpec {
    type Metric = Box<dyn CwlMetric>;

    fn parameter_name(&self) -> &'static str {
        self.kind.primary_parameter().unwrap_or("none")
    }

    fn at(&self, value: f64) -> Result<Box<dyn CwlMetric>, MeasurementError> {
        let parameter = self.kind.primary_parameter().ok_or_else(|| {
            MeasurementError::MalformedSpec(format!("{} has no parameter to sweep", self.kind))
        })?;
        let value = match self.kind {
            MetricKind::Precision | MetricKind::Dcg => cutoff_from(self.kind.name(), value)? as f64,
            _ => value,
        };
        self.with_parameter(parameter, value)?.instantiate()
    }
}

/// Loads metric specifications from a file, one per line.
///
/// Blank lines and lines starting with `#` are skipped. Every spec is
/// built once so that bad parameters are reported with their line number.
pub fn load_metrics_file(path: &Path) -> Result<Vec<MetricSpec>, LoadError> {
    let file = File::open(path).map_err(|e| LoadError::io(path, e))?;
    let reader = BufReader::new(file);
    let mut specs = Vec::new();

    for (line_num, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| LoadError::io(path, e))?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let spec = MetricSpec::parse(line)
            .map_err(|e| LoadError::format(path, line_num + 1, e.to_string()))?;
        spec.build()
            .map_err(|e| LoadError::format(path, line_num + 1, e.to_string()))?;
        specs.push(spec);
    }

    debug!("Loaded {} metric specs from {}", specs.len(), path.display());
    Ok(specs)
}
