//! Metric set resolution for the CLI.
//!
//! The measures to evaluate come from, in order of precedence:
//! 1. `-m/--metric` flags
//! 2. `--metrics-file`
//! 3. `$CWL_METRICS_FILE`
//! 4. the built-in default set ([`DEFAULT_METRICS`])

use anyhow::{Context, Result};
use cwl_core::config::DEFAULT_METRICS;
use cwl_core::measures::{load_metrics_file, MetricSpec};
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment variable naming a default metrics file
const METRICS_FILE_ENV: &str = "CWL_METRICS_FILE";

/// Picks the metrics file: the flag wins over the environment.
fn metrics_file_path(custom: Option<&Path>, env_value: Option<String>) -> Option<PathBuf> {
    custom
        .map(Path::to_path_buf)
        .or_else(|| env_value.filter(|v| !v.trim().is_empty()).map(PathBuf::from))
}

/// Parses a list of specification strings.
fn parse_specs<S: AsRef<str>>(specs: &[S]) -> Result<Vec<MetricSpec>> {
    specs
        .iter()
        .map(|s| {
            let s = s.as_ref();
            let spec = MetricSpec::parse(s).with_context(|| format!("Invalid metric '{}'", s))?;
            spec.build()
                .with_context(|| format!("Invalid metric '{}'", s))?;
            Ok(spec)
        })
        .collect()
}

fn resolve_with_env(
    cli_metrics: &[String],
    metrics_file: Option<&Path>,
    env_value: Option<String>,
) -> Result<Vec<MetricSpec>> {
    if !cli_metrics.is_empty() {
        return parse_specs(cli_metrics);
    }

    if let Some(path) = metrics_file_path(metrics_file, env_value) {
        info!("Reading metrics from {}", path.display());
        let specs = load_metrics_file(&path)
            .with_context(|| format!("Failed to load metrics file: {}", path.display()))?;
        if specs.is_empty() {
            anyhow::bail!("Metrics file {} names no metrics", path.display());
        }
        return Ok(specs);
    }

    parse_specs(DEFAULT_METRICS)
}

/// Resolves the measures to evaluate.
pub fn resolve_metric_specs(
    cli_metrics: &[String],
    metrics_file: Option<&Path>,
) -> Result<Vec<MetricSpec>> {
    resolve_with_env(cli_metrics, metrics_file, std::env::var(METRICS_FILE_ENV).ok())
}
