//! TREC-format judgments, runs and cost files.
//!
//! # Formats
//!
//! | File | Line format |
//! |------|-------------|
//! | qrels | `topic iteration doc_id grade` |
//! | run | `topic Q0 doc_id rank score tag` |
//! | costs | `doc_id cost` |
//!
//! Fields are whitespace separated. Blank lines and lines starting with `#`
//! are skipped. Errors carry the 1-based line number.
//!
//! Run documents are ordered the way trec_eval orders them: by descending
//! score, ties broken by descending document id. The rank column is
//! ignored.

use crate::config::DEFAULT_ITEM_COST;
use crate::error::LoadError;
use crate::ranking::Ranking;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, instrument, warn};

/// Relevance judgments: topic → document → grade.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Qrels {
    judgments: BTreeMap<String, HashMap<String, f64>>,
}

impl Qrels {
    /// Records one judgment, replacing an earlier grade for the same pair.
    pub fn insert(&mut self, topic_id: &str, doc_id: &str, grade: f64) {
        self.judgments
            .entry(topic_id.to_string())
            .or_default()
            .insert(doc_id.to_string(), grade);
    }

    /// Judged topics, sorted.
    pub fn topics(&self) -> impl Iterator<Item = &str> {
        self.judgments.keys().map(String::as_str)
    }

    pub fn contains_topic(&self, topic_id: &str) -> bool {
        self.judgments.contains_key(topic_id)
    }

    /// Grade of a document, `None` if unjudged.
    pub fn grade(&self, topic_id: &str, doc_id: &str) -> Option<f64> {
        self.judgments.get(topic_id)?.get(doc_id).copied()
    }

    /// Number of documents judged relevant (grade > 0) for a topic.
    pub fn relevant_count(&self, topic_id: &str) -> usize {
        self.judgments
            .get(topic_id)
            .map(|docs| docs.values().filter(|&&g| g > 0.0).count())
            .unwrap_or(0)
    }

    /// Highest grade across all topics, or 0 if nothing is relevant.
    pub fn max_grade(&self) -> f64 {
        self.judgments
            .values()
            .flat_map(|docs| docs.values())
            .copied()
            .fold(0.0, f64::max)
    }

    pub fn len(&self) -> usize {
        self.judgments.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One retrieved document in a run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunEntry {
    pub doc_id: String,
    pub score: f64,
}

/// A system run: topic → retrieved documents in evaluation order.
pub type Run = BTreeMap<String, Vec<RunEntry>>;

/// Per-document inspection cost.
pub type CostTable = HashMap<String, f64>;

/// Iterates over the non-blank, non-comment lines of a file as
/// `(line_number, fields)`.
fn for_each_record(
    path: &Path,
    mut f: impl FnMut(usize, &[&str]) -> Result<(), LoadError>,
) -> Result<(), LoadError> {
    let file = File::open(path).map_err(|e| LoadError::io(path, e))?;
    let reader = BufReader::new(file);

    for (line_num, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| LoadError::io(path, e))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = trimmed.split_whitespace().collect();
        f(line_num + 1, &fields)?;
    }
    Ok(())
}

fn parse_number(path: &Path, line: usize, what: &str, field: &str) -> Result<f64, LoadError> {
    match field.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(LoadError::format(
            path,
            line,
            format!("invalid {} '{}'", what, field),
        )),
    }
}

/// Loads a qrels file.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn load_qrels(path: &Path) -> Result<Qrels, LoadError> {
    let mut qrels = Qrels::default();
    for_each_record(path, |line, fields| {
        if fields.len() != 4 {
            return Err(LoadError::format(
                path,
                line,
                format!("expected 4 fields (topic iteration doc grade), got {}", fields.len()),
            ));
        }
        let grade = parse_number(path, line, "grade", fields[3])?;
        qrels.insert(fields[0], fields[2], grade);
        Ok(())
    })?;

    debug!(
        "Loaded {} judgments for {} topics",
        qrels.len(),
        qrels.judgments.len()
    );
    Ok(qrels)
}

/// Loads a run file and orders each topic's documents for evaluation.
///
/// A document retrieved twice for the same topic is a format error.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn load_run(path: &Path) -> Result<Run, LoadError> {
    let mut run = Run::new();
    let mut seen: HashSet<(String, String)> = HashSet::new();

    for_each_record(path, |line, fields| {
        if fields.len() != 6 {
            return Err(LoadError::format(
                path,
                line,
                format!(
                    "expected 6 fields (topic Q0 doc rank score tag), got {}",
                    fields.len()
                ),
            ));
        }
        let (topic_id, doc_id) = (fields[0], fields[2]);
        let score = parse_number(path, line, "score", fields[4])?;
        if !seen.insert((topic_id.to_string(), doc_id.to_string())) {
            return Err(LoadError::format(
                path,
                line,
                format!("document {} retrieved twice for topic {}", doc_id, topic_id),
            ));
        }
        run.entry(topic_id.to_string()).or_default().push(RunEntry {
            doc_id: doc_id.to_string(),
            score,
        });
        Ok(())
    })?;

    for entries in run.values_mut() {
        entries.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| b.doc_id.cmp(&a.doc_id))
        });
    }

    debug!("Loaded run with {} topics", run.len());
    Ok(run)
}

/// Loads a cost file. Costs must be finite and positive.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn load_costs(path: &Path) -> Result<CostTable, LoadError> {
    let mut costs = CostTable::new();
    for_each_record(path, |line, fields| {
        if fields.len() != 2 {
            return Err(LoadError::format(
                path,
                line,
                format!("expected 2 fields (doc cost), got {}", fields.len()),
            ));
        }
        let cost = parse_number(path, line, "cost", fields[1])?;
        if cost <= 0.0 {
            return Err(LoadError::format(
                path,
                line,
                format!("cost must be > 0, got {}", cost),
            ));
        }
        costs.insert(fields[0].to_string(), cost);
        Ok(())
    })?;

    debug!("Loaded costs for {} documents", costs.len());
    Ok(costs)
}

/// Turns judgments and a run into one [`Ranking`] per run topic.
///
/// - gain = grade clamped to `[0, max_grade]`, divided by the largest
///   grade in `qrels`; unjudged documents gain 0
/// - cost = the document's entry in `costs`, else
///   [`DEFAULT_ITEM_COST`]
/// - relevant total = documents judged relevant for the topic
/// - `depth` keeps only the first `depth` documents of each topic
///
/// Topics without judgments are kept with zero gain and logged.
pub fn build_rankings(
    qrels: &Qrels,
    run: &Run,
    costs: Option<&CostTable>,
    depth: Option<usize>,
) -> Result<Vec<Ranking>, LoadError> {
    let max_grade = qrels.max_grade();
    let mut rankings = Vec::with_capacity(run.len());

    for (topic_id, entries) in run {
        if !qrels.contains_topic(topic_id) {
            warn!("Topic {} has no judgments; all gains are 0", topic_id);
        }

        let gains: Vec<f64> = entries
            .iter()
            .map(|e| match qrels.grade(topic_id, &e.doc_id) {
                Some(grade) if max_grade > 0.0 => grade.clamp(0.0, max_grade) / max_grade,
                _ => 0.0,
            })
            .collect();
        let item_costs: Vec<f64> = entries
            .iter()
            .map(|e| {
                costs
                    .and_then(|table| table.get(&e.doc_id))
                    .copied()
                    .unwrap_or(DEFAULT_ITEM_COST)
            })
            .collect();

        let ranking = Ranking::builder(topic_id.as_str(), gains)
            .costs(item_costs)
            .relevant_total(qrels.relevant_count(topic_id))
            .build()?;
        let ranking = match depth {
            Some(depth) => ranking.truncated(depth),
            None => ranking,
        };
        rankings.push(ranking);
    }

    let unretrieved = qrels.topics().filter(|t| !run.contains_key(*t)).count();
    if unretrieved > 0 {
        debug!("{} judged topics have no run entries and are skipped", unretrieved);
    }
    Ok(rankings)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_file(lines: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        file
    }

    fn sample_qrels() -> NamedTempFile {
        write_file(&[
            "# topic iter doc grade",
            "401 0 d1 2",
            "401 0 d2 0",
            "401 0 d3 1",
            "401 0 d9 2",
            "402 0 d4 1",
            "",
            "402 0 d5 -2",
        ])
    }

    fn sample_run() -> NamedTempFile {
        write_file(&[
            "401 Q0 d2 1 9.5 sys",
            "401 Q0 d1 2 9.7 sys",
            "401 Q0 d3 3 1.0 sys",
            "401 Q0 d7 4 1.0 sys",
            "402 Q0 d5 1 3.0 sys",
            "402 Q0 d4 2 2.0 sys",
            "403 Q0 d8 1 1.0 sys",
        ])
    }

    #[test]
    fn test_load_qrels() {
        let file = sample_qrels();
        let qrels = load_qrels(file.path()).unwrap();

        assert_eq!(qrels.len(), 6);
        assert_eq!(qrels.topics().collect::<Vec<_>>(), vec!["401", "402"]);
        assert_eq!(qrels.grade("401", "d1"), Some(2.0));
        assert_eq!(qrels.grade("401", "d7"), None);
        assert_eq!(qrels.relevant_count("401"), 3);
        assert_eq!(qrels.relevant_count("402"), 1);
        assert_eq!(qrels.max_grade(), 2.0);
    }

    #[test]
    fn test_load_qrels_malformed_line() {
        let file = write_file(&["401 0 d1 2", "401 0 d2"]);
        let err = load_qrels(file.path()).unwrap_err();
        assert!(matches!(err, LoadError::InvalidFormat { line: 2, .. }));

        let file = write_file(&["401 0 d1 high"]);
        let err = load_qrels(file.path()).unwrap_err();
        assert!(err.to_string().contains("invalid grade 'high'"));
    }

    #[test]
    fn test_load_run_orders_by_score() {
        let file = sample_run();
        let run = load_run(file.path()).unwrap();

        let docs: Vec<&str> = run["401"].iter().map(|e| e.doc_id.as_str()).collect();
        // d3 and d7 tie on score: descending doc id puts d7 first
        assert_eq!(docs, vec!["d1", "d2", "d7", "d3"]);
        assert_eq!(run.len(), 3);
    }

    #[test]
    fn test_load_run_rejects_duplicates() {
        let file = write_file(&["401 Q0 d1 1 2.0 sys", "401 Q0 d1 2 1.0 sys"]);
        let err = load_run(file.path()).unwrap_err();
        assert!(matches!(err, LoadError::InvalidFormat { line: 2, .. }));
    }

    #[test]
    fn test_load_costs() {
        let file = write_file(&["d1 2.5", "d2 0.5"]);
        let costs = load_costs(file.path()).unwrap();
        assert_eq!(costs.get("d1"), Some(&2.5));

        let file = write_file(&["d1 0"]);
        assert!(load_costs(file.path()).is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = load_qrels(Path::new("/nonexistent/qrels.txt")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn test_build_rankings() {
        let qrels = load_qrels(sample_qrels().path()).unwrap();
        let run = load_run(sample_run().path()).unwrap();
        let rankings = build_rankings(&qrels, &run, None, None).unwrap();

        assert_eq!(rankings.len(), 3);
        let r401 = &rankings[0];
        assert_eq!(r401.topic_id(), "401");
        // d1(2) d2(0) d7(unjudged) d3(1), normalised by max grade 2
        assert_eq!(r401.gains(), &[1.0, 0.0, 0.0, 0.5]);
        // d9 is relevant but not retrieved
        assert_eq!(r401.relevant_total(), 3);

        // Negative grades clamp to 0
        assert_eq!(rankings[1].gains(), &[0.0, 0.5]);

        // Unjudged topic still evaluated
        assert_eq!(rankings[2].topic_id(), "403");
        assert_eq!(rankings[2].gains(), &[0.0]);
        assert_eq!(rankings[2].relevant_total(), 0);
    }

    #[test]
    fn test_build_rankings_with_costs_and_depth() {
        let qrels = load_qrels(sample_qrels().path()).unwrap();
        let run = load_run(sample_run().path()).unwrap();
        let mut costs = CostTable::new();
        costs.insert("d1".to_string(), 3.0);

        let rankings = build_rankings(&qrels, &run, Some(&costs), Some(2)).unwrap();
        assert_eq!(rankings[0].costs(), &[3.0, DEFAULT_ITEM_COST]);
        assert_eq!(rankings[0].len(), 2);
        assert_eq!(rankings[0].relevant_total(), 3);
    }
}
