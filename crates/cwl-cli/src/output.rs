//! Output formatting for evaluation and sweep results.
//!
//! Human-readable tables for the terminal, JSON for scripting, and CSV for
//! feeding sweeps into plotting tools.

use cwl_core::evaluation::MetricSummary;
use cwl_core::measures::{CwlMetric, Measurement, MetricKind, MetricSpec, Statistic};
use cwl_core::sweep::SweepResult;
use serde::Serialize;

/// Decimal places in human-readable output
const PRECISION: usize = 4;

/// Column width for measure names
const METRIC_COLUMN: usize = 28;

/// JSON output structure for per-topic results
#[derive(Serialize)]
pub struct JsonOutput<'a> {
    pub topics: usize,
    pub measurements: &'a [Measurement],
}

fn header(first: &str, first_width: usize, second: &str, second_width: usize) -> String {
    let mut line = format!("{:<first_width$} {:<second_width$}", first, second);
    for statistic in Statistic::ALL {
        line.push_str(&format!(" {:>10}", statistic.label()));
    }
    line
}

fn statistic_cells(m: &Measurement) -> String {
    Statistic::ALL
        .into_iter()
        .map(|s| format!(" {:>10.prec$}", m.statistic(s), prec = PRECISION))
        .collect()
}

/// Formats per-topic results as a table: `topic metric EU ETU EC ETC ED`.
pub fn format_human(measurements: &[Measurement]) -> String {
    if measurements.is_empty() {
        return "No topics to evaluate".to_string();
    }

    let topic_width = measurements
        .iter()
        .map(|m| m.topic_id.len())
        .max()
        .unwrap_or(0)
        .max("topic".len());

    let mut output = header("topic", topic_width, "metric", METRIC_COLUMN);
    for m in measurements {
        output.push('\n');
        output.push_str(&format!(
            "{:<topic_width$} {:<METRIC_COLUMN$}{}",
            m.topic_id,
            m.metric_name,
            statistic_cells(m)
        ));
    }
    output
}

/// Formats per-topic results as JSON, vectors included.
pub fn format_json(measurements: &[Measurement]) -> String {
    let mut topics: Vec<&str> = measurements.iter().map(|m| m.topic_id.as_str()).collect();
    topics.dedup();
    let output = JsonOutput {
        topics: topics.len(),
        measurements,
    };
    serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
}

/// Formats summaries as one line per measure and statistic.
pub fn format_summary_human(summaries: &[MetricSummary]) -> String {
    if summaries.is_empty() {
        return "No topics to evaluate".to_string();
    }

    let mut output = format!(
        "{:<METRIC_COLUMN$} {:>6} {:>4}  mean [95% CI]",
        "metric", "topics", "stat"
    );
    for summary in summaries {
        for statistic in Statistic::ALL {
            if let Some(result) = summary.get(statistic) {
                output.push_str(&format!(
                    "\n{:<METRIC_COLUMN$} {:>6} {:>4}  {}",
                    summary.metric_name,
                    summary.topics,
                    statistic.label(),
                    result.format(PRECISION)
                ));
            }
        }
    }
    output
}

pub fn format_summary_json(summaries: &[MetricSummary]) -> String {
    serde_json::to_string_pretty(summaries).unwrap_or_else(|_| "[]".to_string())
}

/// One row of a sweep: a topic at one grid value.
fn sweep_rows(result: &SweepResult) -> impl Iterator<Item = (&str, f64, Vec<f64>)> + '_ {
    result.topics().flat_map(move |topic| {
        result.grid.iter().enumerate().map(move |(j, &value)| {
            let cells = Statistic::ALL
                .into_iter()
                .map(|s| result.get(s)[topic][j])
                .collect();
            (topic, value, cells)
        })
    })
}

/// Formats a sweep as long-form CSV: `topic,<parameter>,EU,ETU,EC,ETC,ED`.
pub fn format_sweep_csv(result: &SweepResult) -> String {
    let mut output = format!("topic,{}", result.parameter);
    for statistic in Statistic::ALL {
        output.push(',');
        output.push_str(statistic.label());
    }
    for (topic, value, cells) in sweep_rows(result) {
        output.push_str(&format!("\n{},{}", topic, value));
        for cell in cells {
            output.push_str(&format!(",{}", cell));
        }
    }
    output
}

pub fn format_sweep_json(result: &SweepResult) -> String {
    serde_json::to_string_pretty(result).unwrap_or_else(|_| "{}".to_string())
}

/// Formats a sweep as an aligned table, one row per topic and grid value.
pub fn format_sweep_human(result: &SweepResult) -> String {
    let topic_width = result.topics().map(str::len).max().unwrap_or(0).max(5);
    let param_width = result.parameter.len().max(8);

    let mut output = header("topic", topic_width, &result.parameter, param_width);
    for (topic, value, cells) in sweep_rows(result) {
        output.push_str(&format!(
            "\n{:<topic_width$} {:<param_width$}",
            topic,
            value.to_string()
        ));
        for cell in cells {
            output.push_str(&format!(" {:>10.prec$}", cell, prec = PRECISION));
        }
    }
    output
}

/// Lists the measures a specification can name, with their parameters.
pub fn format_metric_list() -> String {
    let mut output = String::from("Available metrics (NAME or NAME:param=value,...):\n");
    for kind in MetricKind::ALL {
        let params = match kind.parameters() {
            [] => "-".to_string(),
            names => names.join(","),
        };
        output.push_str(&format!(
            "\n  {:<14} {:<22} {}",
            kind.name(),
            params,
            kind.description()
        ));
    }
    output.push_str("\n\nDefaults:");
    for kind in MetricKind::ALL {
        if let Ok(metric) = MetricSpec::new(kind).build() {
            output.push_str(&format!("\n  {:<14} {}", kind.name(), metric.name()));
            if !metric.citation().is_empty() {
                output.push_str(&format!("\n  {:<14} {}", "", metric.citation()));
            }
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use cwl_core::evaluation::summarize;
    use cwl_core::measures::{Precision, Rbp};
    use cwl_core::ranking::Ranking;
    use cwl_core::sweep::sweep;

    fn measurements() -> Vec<Measurement> {
        let rankings = [
            Ranking::new("401", vec![1.0, 0.0, 1.0]).unwrap(),
            Ranking::new("402", vec![0.0, 1.0]).unwrap(),
        ];
        rankings
            .iter()
            .flat_map(|r| {
                vec![
                    Rbp::new(0.5).measure(r).unwrap(),
                    Precision::new(2).measure(r).unwrap(),
                ]
            })
            .collect()
    }

    #[test]
    fn test_format_human_empty() {
        assert!(format_human(&[]).contains("No topics"));
    }

    #[test]
    fn test_format_human_table() {
        let output = format_human(&measurements());
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("topic"));
        assert!(lines[0].contains("EU") && lines[0].contains("ED"));
        assert!(lines[1].starts_with("401"));
        assert!(lines[1].contains("RBP@0.5"));
        // P@2 on 402: EU 0.5000, ED 2.0000
        assert!(lines[4].contains("0.5000"));
        assert!(lines[4].contains("2.0000"));
    }

    #[test]
    fn test_format_json() {
        let output = format_json(&measurements());
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["topics"], 2);
        assert_eq!(value["measurements"][0]["metric_name"], "RBP@0.5");
        assert!(value["measurements"][0]["w_vector"].is_array());
    }

    #[test]
    fn test_format_summary() {
        let summaries = summarize(&measurements(), 100, 42);
        let output = format_summary_human(&summaries);
        assert!(output.contains("P@2"));
        assert!(output.contains(" EU "));
        assert_eq!(output.lines().count(), 1 + 2 * Statistic::ALL.len());

        let json: serde_json::Value =
            serde_json::from_str(&format_summary_json(&summaries)).unwrap();
        assert_eq!(json[1]["topics"], 2);
    }

    #[test]
    fn test_format_sweep_csv() {
        let rankings = vec![
            Ranking::new("a", vec![1.0, 1.0]).unwrap(),
            Ranking::new("b", vec![0.0, 1.0]).unwrap(),
        ];
        let result = sweep(&Rbp::default(), &rankings, &[0.25, 0.5]).unwrap();
        let csv = format_sweep_csv(&result);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "topic,theta,EU,ETU,EC,ETC,ED");
        assert_eq!(lines.len(), 5);
        assert!(lines[1].starts_with("a,0.25,"));
        assert!(lines[2].starts_with("a,0.5,"));
        assert!(lines[3].starts_with("b,0.25,"));
        // ED for theta=0.5 on two items is 1.5
        assert!(lines[2].ends_with(",1.5"));
    }

    #[test]
    fn test_format_sweep_human_and_json() {
        let rankings = vec![Ranking::new("a", vec![1.0]).unwrap()];
        let result = sweep(&Rbp::default(), &rankings, &[0.5]).unwrap();
        assert!(format_sweep_human(&result).lines().nth(1).unwrap().starts_with("a "));
        assert!(format_sweep_json(&result).contains("\"parameter\": \"theta\""));
    }

    #[test]
    fn test_metric_list_names_every_kind() {
        let output = format_metric_list();
        for kind in MetricKind::ALL {
            assert!(output.contains(kind.name()));
        }
        assert!(output.contains("RBP@0.8"));
        assert!(output.contains("BPM-D-T=2-K=10"));
        // Published model references are listed under each default
        assert!(output.contains("Bejeweled player model"));
        assert!(output.contains("Sakai & Dou (2013)"));
    }
}
