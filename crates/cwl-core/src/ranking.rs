//! Ranked lists of judged items, one per topic.
//!
//! A [`Ranking`] is the input to every measure: the gains observed at each
//! rank of a retrieved list, the cost of inspecting each item, and how many
//! relevant items exist for the topic in total. Rankings are validated on
//! construction and immutable afterwards.

use crate::config::DEFAULT_ITEM_COST;
use crate::error::RankingError;
use serde::Serialize;

/// The judged ranked list for one topic.
///
/// Ranks are 1-indexed conceptually; index `i` in the vectors holds rank
/// `i + 1`.
///
/// # Example
///
/// ```
/// use cwl_core::ranking::Ranking;
///
/// let ranking = Ranking::new("401", vec![1.0, 0.0, 0.5]).unwrap();
/// assert_eq!(ranking.len(), 3);
/// assert_eq!(ranking.costs(), &[1.0, 1.0, 1.0]);
/// assert_eq!(ranking.relevant_total(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranking {
    topic_id: String,
    gains: Vec<f64>,
    costs: Vec<f64>,
    relevant_total: usize,
}

impl Ranking {
    /// Creates a ranking with unit cost per item.
    pub fn new(topic_id: impl Into<String>, gains: Vec<f64>) -> Result<Self, RankingError> {
        Self::builder(topic_id, gains).build()
    }

    /// Creates a ranking with an explicit cost per item.
    pub fn with_costs(
        topic_id: impl Into<String>,
        gains: Vec<f64>,
        costs: Vec<f64>,
    ) -> Result<Self, RankingError> {
        Self::builder(topic_id, gains).costs(costs).build()
    }

    /// Starts a builder for rankings that need costs or a relevant total.
    pub fn builder(topic_id: impl Into<String>, gains: Vec<f64>) -> RankingBuilder {
        RankingBuilder {
            topic_id: topic_id.into(),
            gains,
            costs: None,
            relevant_total: None,
        }
    }

    /// Topic identifier.
    pub fn topic_id(&self) -> &str {
        &self.topic_id
    }

    /// Gain at each rank.
    pub fn gains(&self) -> &[f64] {
        &self.gains
    }

    /// Cost of inspecting the item at each rank.
    pub fn costs(&self) -> &[f64] {
        &self.costs
    }

    /// Number of relevant items known for this topic, retrieved or not.
    pub fn relevant_total(&self) -> usize {
        self.relevant_total
    }

    /// Ranking depth.
    pub fn len(&self) -> usize {
        self.gains.len()
    }

    /// Always false for a constructed ranking; provided for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.gains.is_empty()
    }

    /// Gain accumulated up to and including each rank.
    pub fn cumulative_gains(&self) -> Vec<f64> {
        cumulative_sum(&self.gains)
    }

    /// Cost accumulated up to and including each rank.
    pub fn cumulative_costs(&self) -> Vec<f64> {
        cumulative_sum(&self.costs)
    }

    /// Returns a copy truncated to the first `depth` ranks.
    ///
    /// The relevant total is kept, so recall-oriented measures still see
    /// relevant items that fell below the cutoff.
    pub fn truncated(&self, depth: usize) -> Self {
        let depth = depth.max(1).min(self.len());
        Self {
            topic_id: self.topic_id.clone(),
            gains: self.gains[..depth].to_vec(),
            costs: self.costs[..depth].to_vec(),
            relevant_total: self.relevant_total,
        }
    }
}

/// Builder returned by [`Ranking::builder`].
#[derive(Debug, Clone)]
pub struct RankingBuilder {
    topic_id: String,
    gains: Vec<f64>,
    costs: Option<Vec<f64>>,
    relevant_total: Option<usize>,
}

impl RankingBuilder {
    /// Sets the per-rank inspection costs.
    pub fn costs(mut self, costs: Vec<f64>) -> Self {
        self.costs = Some(costs);
        self
    }

    /// Sets the number of relevant items known from the judgments.
    pub fn relevant_total(mut self, relevant_total: usize) -> Self {
        self.relevant_total = Some(relevant_total);
        self
    }

    /// Validates and builds the ranking.
    pub fn build(self) -> Result<Ranking, RankingError> {
        let RankingBuilder {
            topic_id,
            gains,
            costs,
            relevant_total,
        } = self;

        if topic_id.trim().is_empty() {
            return Err(RankingError::EmptyTopicId);
        }
        if gains.is_empty() {
            return Err(RankingError::Empty { topic_id });
        }
        if let Some((rank, &value)) = gains.iter().enumerate().find(|(_, g)| !g.is_finite()) {
            return Err(RankingError::NonFiniteGain {
                topic_id,
                rank: rank + 1,
                value,
            });
        }

        let costs = costs.unwrap_or_else(|| vec![DEFAULT_ITEM_COST; gains.len()]);
        if costs.len() != gains.len() {
            return Err(RankingError::CostLengthMismatch {
                topic_id,
                gains: gains.len(),
                costs: costs.len(),
            });
        }
        if let Some((rank, &value)) = costs
            .iter()
            .enumerate()
            .find(|(_, c)| !c.is_finite() || **c <= 0.0)
        {
            return Err(RankingError::InvalidCost {
                topic_id,
                rank: rank + 1,
                value,
            });
        }

        let found = count_relevant(&gains);
        let relevant_total = relevant_total.unwrap_or(found);
        if relevant_total < found {
            return Err(RankingError::RelevantTotalTooSmall {
                topic_id,
                relevant_total,
                found,
            });
        }

        Ok(Ranking {
            topic_id,
            gains,
            costs,
            relevant_total,
        })
    }
}

fn count_relevant(gains: &[f64]) -> usize {
    gains.iter().filter(|&&g| g > 0.0).count()
}

fn cumulative_sum(values: &[f64]) -> Vec<f64> {
    values
        .iter()
        .scan(0.0, |acc, &v| {
            *acc += v;
            Some(*acc)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_defaults_unit_costs() {
        let ranking = Ranking::new("t1", vec![1.0, 0.0, 1.0]).unwrap();
        assert_eq!(ranking.topic_id(), "t1");
        assert_eq!(ranking.costs(), &[1.0, 1.0, 1.0]);
        assert_eq!(ranking.relevant_total(), 2);
        assert!(!ranking.is_empty());
    }

    #[test]
    fn test_empty_ranking_rejected() {
        let result = Ranking::new("t", vec![]);
        assert_eq!(
            result,
            Err(RankingError::Empty {
                topic_id: "t".to_string()
            })
        );
    }

    #[test]
    fn test_blank_topic_rejected() {
        assert_eq!(
            Ranking::new("  ", vec![1.0]),
            Err(RankingError::EmptyTopicId)
        );
    }

    #[test]
    fn test_non_finite_gain_reports_rank() {
        let result = Ranking::new("t", vec![0.0, f64::NAN]);
        assert!(matches!(
            result,
            Err(RankingError::NonFiniteGain { rank: 2, .. })
        ));
    }

    #[test]
    fn test_negative_gain_allowed() {
        // Junk grades are negative in some TREC tracks
        let ranking = Ranking::new("t", vec![-2.0, 1.0]).unwrap();
        assert_eq!(ranking.gains(), &[-2.0, 1.0]);
        assert_eq!(ranking.relevant_total(), 1);
    }

    #[test]
    fn test_invalid_costs() {
        let mismatch = Ranking::with_costs("t", vec![1.0, 0.0], vec![1.0]);
        assert!(matches!(
            mismatch,
            Err(RankingError::CostLengthMismatch {
                gains: 2,
                costs: 1,
                ..
            })
        ));

        let zero = Ranking::with_costs("t", vec![1.0, 0.0], vec![1.0, 0.0]);
        assert!(matches!(zero, Err(RankingError::InvalidCost { rank: 2, .. })));
    }

    #[test]
    fn test_relevant_total_must_cover_retrieved() {
        let result = Ranking::builder("t", vec![1.0, 1.0])
            .relevant_total(1)
            .build();
        assert!(matches!(
            result,
            Err(RankingError::RelevantTotalTooSmall { found: 2, .. })
        ));

        let ranking = Ranking::builder("t", vec![1.0, 0.0])
            .relevant_total(5)
            .build()
            .unwrap();
        assert_eq!(ranking.relevant_total(), 5);
    }

    #[test]
    fn test_cumulative_vectors() {
        let ranking =
            Ranking::with_costs("t", vec![1.0, 0.0, 0.5], vec![2.0, 1.0, 3.0]).unwrap();
        assert_eq!(ranking.cumulative_gains(), vec![1.0, 1.0, 1.5]);
        assert_eq!(ranking.cumulative_costs(), vec![2.0, 3.0, 6.0]);
    }

    #[test]
    fn test_truncated_keeps_relevant_total() {
        let ranking = Ranking::new("t", vec![0.0, 1.0, 1.0]).unwrap();
        let top = ranking.truncated(1);
        assert_eq!(top.len(), 1);
        assert_eq!(top.relevant_total(), 2);
        assert_eq!(ranking.truncated(10).len(), 3);
    }
}
