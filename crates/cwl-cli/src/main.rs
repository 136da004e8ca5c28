//! cwl-eval - evaluate TREC runs with C/W/L measures.
//!
//! # Usage
//!
//! ```bash
//! # Default metric set, one line per topic and metric
//! cwl-eval qrels.txt run.txt
//!
//! # Selected metrics with per-document costs, JSON output
//! cwl-eval qrels.txt run.txt -m RBP:theta=0.8 -m "BPM:t=2,k=10" --cost-file costs.txt --json
//!
//! # Mean over topics with bootstrap confidence intervals
//! cwl-eval qrels.txt run.txt --summary
//!
//! # Sweep RBP persistence, CSV for plotting
//! cwl-eval qrels.txt run.txt --sweep RBP --values 0.1,0.5,0.9 --csv
//!
//! # Available measures
//! cwl-eval --list-metrics
//! ```

mod config;
mod evaluate;
mod output;

use anyhow::{bail, Result};
use clap::Parser;
use cwl_core::config::{DEFAULT_BOOTSTRAP_SAMPLES, DEFAULT_BOOTSTRAP_SEED};
use cwl_core::evaluation::summarize;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// C/W/L evaluation of ranked retrieval runs.
///
/// Reads TREC qrels and a TREC run, builds one ranking per topic, and
/// reports expected utility (EU), expected total utility (ETU), expected
/// cost (EC), expected total cost (ETC) and expected depth (ED) for each
/// measure.
#[derive(Parser)]
#[command(name = "cwl-eval", version, about)]
struct Cli {
    /// Relevance judgments (topic iteration doc grade)
    #[arg(required_unless_present = "list_metrics")]
    qrels: Option<PathBuf>,

    /// System run (topic Q0 doc rank score tag)
    #[arg(required_unless_present = "list_metrics")]
    run: Option<PathBuf>,

    /// Measure to apply, e.g. RBP:theta=0.8 (repeatable)
    #[arg(short = 'm', long = "metric")]
    metrics: Vec<String>,

    /// File with one measure specification per line
    #[arg(long)]
    metrics_file: Option<PathBuf>,

    /// Per-document inspection costs (doc cost)
    #[arg(long)]
    cost_file: Option<PathBuf>,

    /// Evaluate only the first N documents of each topic
    #[arg(long)]
    depth: Option<usize>,

    /// Output results as JSON
    #[arg(long, conflicts_with = "csv")]
    json: bool,

    /// Output sweep results as CSV
    #[arg(long, requires = "sweep")]
    csv: bool,

    /// Report the mean of each statistic over topics with a 95% CI
    #[arg(long)]
    summary: bool,

    /// Bootstrap resamples for --summary confidence intervals
    #[arg(long, default_value_t = DEFAULT_BOOTSTRAP_SAMPLES)]
    bootstrap_samples: usize,

    /// Seed for bootstrap resampling
    #[arg(long, default_value_t = DEFAULT_BOOTSTRAP_SEED)]
    seed: u64,

    /// Measure whose primary parameter is swept, e.g. RBP or BPM:k=10
    #[arg(long, conflicts_with_all = ["metrics", "metrics_file", "summary"])]
    sweep: Option<String>,

    /// Comma-separated parameter values for --sweep
    #[arg(long, value_delimiter = ',', requires = "sweep")]
    values: Vec<f64>,

    /// Spread sweep work across all cores
    #[arg(long, requires = "sweep")]
    parallel: bool,

    /// List available measures and exit
    #[arg(long)]
    list_metrics: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.list_metrics {
        println!("{}", output::format_metric_list());
        return Ok(());
    }

    let (Some(qrels), Some(run)) = (&cli.qrels, &cli.run) else {
        bail!("Both QRELS and RUN are required. Use --help for usage information.");
    };
    if cli.depth == Some(0) {
        bail!("--depth must be at least 1");
    }
    let rankings =
        evaluate::load_rankings(qrels, run, cli.cost_file.as_deref(), cli.depth)?;
    info!("Evaluating {} topics", rankings.len());

    if let Some(sweep_spec) = &cli.sweep {
        if cli.values.is_empty() {
            bail!("--sweep needs parameter values, e.g. --values 0.1,0.5,0.9");
        }
        let result = evaluate::run_sweep(&rankings, sweep_spec, &cli.values, cli.parallel)?;
        let output = if cli.json {
            output::format_sweep_json(&result)
        } else if cli.csv {
            output::format_sweep_csv(&result)
        } else {
            output::format_sweep_human(&result)
        };
        println!("{}", output);
        return Ok(());
    }

    let specs = config::resolve_metric_specs(&cli.metrics, cli.metrics_file.as_deref())?;
    let measurements = evaluate::evaluate(&rankings, &specs)?;

    let output = if cli.summary {
        let summaries = summarize(&measurements, cli.bootstrap_samples, cli.seed);
        if cli.json {
            output::format_summary_json(&summaries)
        } else {
            output::format_summary_human(&summaries)
        }
    } else if cli.json {
        output::format_json(&measurements)
    } else {
        output::format_human(&measurements)
    };
    println!("{}", output);

    Ok(())
}
