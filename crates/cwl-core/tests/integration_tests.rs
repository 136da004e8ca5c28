//! End-to-end tests for the evaluation pipeline.
//!
//! These tests exercise the full workflow:
//! 1. Loading: qrels + run + costs → rankings
//! 2. Measuring: metric specs → per-topic measurements → summaries
//! 3. Sweeping: one measure over a parameter grid, sequential and parallel
//!
//! Run with: `cargo test -p cwl-core --test integration_tests`

use cwl_core::evaluation::{build_rankings, load_costs, load_qrels, load_run, summarize};
use cwl_core::measures::{load_metrics_file, CwlMetric, MeasureSession, Rbp, Statistic};
use cwl_core::sweep::{par_sweep, sweep};
use cwl_core::{MeasurementError, MetricSpec, Ranking};
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use tempfile::TempDir;

// ============================================================================
// Test Fixtures
// ============================================================================

struct Fixture {
    _dir: TempDir,
    qrels: PathBuf,
    run: PathBuf,
    costs: PathBuf,
    metrics: PathBuf,
}

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = File::create(&path).unwrap();
    write!(file, "{}", content).unwrap();
    path
}

/// Two judged topics and one unjudged topic, graded 0-3.
fn fixture() -> Fixture {
    let dir = TempDir::new().unwrap();
    let qrels = write(
        &dir,
        "qrels.txt",
        "t1 0 d1 3\n\
         t1 0 d2 0\n\
         t1 0 d3 1\n\
         t1 0 d4 2\n\
         t2 0 d5 1\n\
         t2 0 d6 3\n",
    );
    let run = write(
        &dir,
        "run.txt",
        "t1 Q0 d1 1 10.0 sys\n\
         t1 Q0 d2 2 9.0 sys\n\
         t1 Q0 d3 3 8.0 sys\n\
         t1 Q0 d9 4 7.0 sys\n\
         t2 Q0 d7 1 5.0 sys\n\
         t2 Q0 d6 2 4.0 sys\n\
         t3 Q0 d1 1 1.0 sys\n",
    );
    let costs = write(&dir, "costs.txt", "d1 2.0\nd6 0.5\n");
    let metrics = write(
        &dir,
        "metrics.txt",
        "# evaluation set\nP:k=3\nRBP:theta=0.5\nAP\nBPM:t=1,k=3\n",
    );
    Fixture {
        _dir: dir,
        qrels,
        run,
        costs,
        metrics,
    }
}

fn rankings(f: &Fixture) -> Vec<Ranking> {
    let qrels = load_qrels(&f.qrels).unwrap();
    let run = load_run(&f.run).unwrap();
    let costs = load_costs(&f.costs).unwrap();
    build_rankings(&qrels, &run, Some(&costs), None).unwrap()
}

// ============================================================================
// Pipeline
// ============================================================================

#[test]
fn test_files_to_rankings() {
    let f = fixture();
    let rankings = rankings(&f);

    assert_eq!(rankings.len(), 3);
    let t1 = &rankings[0];
    assert_eq!(t1.gains(), &[1.0, 0.0, 1.0 / 3.0, 0.0]);
    assert_eq!(t1.costs(), &[2.0, 1.0, 1.0, 1.0]);
    assert_eq!(t1.relevant_total(), 3);

    let t2 = &rankings[1];
    assert_eq!(t2.gains(), &[0.0, 1.0]);
    assert_eq!(t2.costs(), &[1.0, 0.5]);
}

#[test]
fn test_metrics_file_evaluation_and_summary() {
    let f = fixture();
    let rankings = rankings(&f);
    let specs = load_metrics_file(&f.metrics).unwrap();
    assert_eq!(specs.len(), 4);

    let mut measurements = Vec::new();
    for ranking in &rankings {
        for spec in &specs {
            let metric = spec.build().unwrap();
            measurements.push(metric.measure(ranking).unwrap());
        }
    }
    assert_eq!(measurements.len(), 12);

    // P@3 on t1: (1 + 0 + 1/3) / 3
    let p_t1 = &measurements[0];
    assert_eq!(p_t1.metric_name, "P@3");
    assert!((p_t1.expected_utility - 4.0 / 9.0).abs() < 1e-12);
    // Costs flow through to ETC: 2 + 1 + 1
    assert!((p_t1.expected_total_cost - 4.0).abs() < 1e-12);

    let summaries = summarize(&measurements, 500, 42);
    assert_eq!(summaries.len(), 4);
    for summary in &summaries {
        assert_eq!(summary.topics, 3);
        let ed = summary.get(Statistic::ExpectedItems).unwrap();
        assert!(ed.lower <= ed.mean && ed.mean <= ed.upper);
    }
}

#[test]
fn test_sweep_pipeline() {
    let f = fixture();
    let rankings = rankings(&f);
    let spec = MetricSpec::parse("RBP").unwrap();
    let grid = [0.1, 0.5, 0.9];

    let result = sweep(&spec, &rankings, &grid).unwrap();
    assert_eq!(result.parameter, "theta");
    for statistic in Statistic::ALL {
        let series = result.get(statistic);
        assert_eq!(series.len(), 3);
        for values in series.values() {
            assert_eq!(values.len(), grid.len());
        }
    }
    for (j, &theta) in grid.iter().enumerate() {
        let direct = Rbp::new(theta).measure(&rankings[1]).unwrap();
        assert_eq!(result.expected_utility["t2"][j], direct.expected_utility);
        assert_eq!(result.expected_total_cost["t2"][j], direct.expected_total_cost);
    }

    assert_eq!(par_sweep(&spec, &rankings, &grid).unwrap(), result);
}

#[test]
fn test_sweep_failure_is_total() {
    let f = fixture();
    let rankings = rankings(&f);
    let err = sweep(&Rbp::default(), &rankings, &[0.5, 0.9, 1.0]).unwrap_err();
    assert!(matches!(err, MeasurementError::InvalidParameter { .. }));
}

#[test]
fn test_session_over_topics() {
    let f = fixture();
    let rankings = rankings(&f);
    let mut session = MeasureSession::new(Rbp::new(0.5));

    assert_eq!(session.expected_utility(), Err(MeasurementError::NotMeasured));
    for ranking in &rankings {
        session.measure(ranking).unwrap();
        assert_eq!(session.last().unwrap().topic_id, ranking.topic_id());
    }
    // Unjudged t3 is measured last
    assert_eq!(session.expected_total_utility().unwrap(), 0.0);
}
