//! Evaluation and sweep commands.
//!
//! Loads the input files into rankings, then either applies each measure to
//! each topic or sweeps one measure's parameter across all topics.

use anyhow::{Context, Result};
use cwl_core::evaluation::{build_rankings, load_costs, load_qrels, load_run};
use cwl_core::measures::{CwlMetric, Measurement, MetricSpec};
use cwl_core::ranking::Ranking;
use cwl_core::sweep::{par_sweep, sweep, SweepResult};
use std::path::Path;
use tracing::{info, warn};

/// Loads qrels, run and optional costs, and builds one ranking per topic.
pub fn load_rankings(
    qrels_path: &Path,
    run_path: &Path,
    cost_path: Option<&Path>,
    depth: Option<usize>,
) -> Result<Vec<Ranking>> {
    let qrels = load_qrels(qrels_path)
        .with_context(|| format!("Failed to load qrels: {}", qrels_path.display()))?;
    if qrels.is_empty() {
        warn!("Qrels file {} contains no judgments", qrels_path.display());
    }
    let run = load_run(run_path)
        .with_context(|| format!("Failed to load run: {}", run_path.display()))?;
    let costs = cost_path
        .map(|path| {
            load_costs(path).with_context(|| format!("Failed to load costs: {}", path.display()))
        })
        .transpose()?;

    let rankings = build_rankings(&qrels, &run, costs.as_ref(), depth)
        .context("Failed to build rankings")?;
    info!(
        "Built {} rankings from {} judged topics",
        rankings.len(),
        qrels.topics().count()
    );
    Ok(rankings)
}

/// Applies every measure to every ranking.
///
/// Results are ordered by topic, then by the order of `specs`. The first
/// failure aborts the evaluation.
pub fn evaluate(rankings: &[Ranking], specs: &[MetricSpec]) -> Result<Vec<Measurement>> {
    let metrics: Vec<Box<dyn CwlMetric>> = specs
        .iter()
        .map(|spec| spec.build().with_context(|| format!("Invalid metric '{}'", spec)))
        .collect::<Result<_>>()?;

    let mut measurements = Vec::with_capacity(rankings.len() * metrics.len());
    for ranking in rankings {
        for metric in &metrics {
            let m = metric.measure(ranking).with_context(|| {
                format!(
                    "Failed to measure topic {} with {}",
                    ranking.topic_id(),
                    metric.name()
                )
            })?;
            measurements.push(m);
        }
    }
    Ok(measurements)
}

/// Sweeps the primary parameter of the measure named by `spec`.
pub fn run_sweep(
    rankings: &[Ranking],
    spec: &str,
    values: &[f64],
    parallel: bool,
) -> Result<SweepResult> {
    let spec = MetricSpec::parse(spec).with_context(|| format!("Invalid metric '{}'", spec))?;
    let Some(parameter) = spec.kind().primary_parameter() else {
        anyhow::bail!("{} has no parameter to sweep", spec.kind());
    };
    info!(
        "Sweeping {} of {} over {} values",
        parameter,
        spec.kind(),
        values.len()
    );

    let result = if parallel {
        par_sweep(&spec, rankings, values)
    } else {
        sweep(&spec, rankings, values)
    };
    result.with_context(|| format!("Sweep of {} failed", spec))
}
