//! Reducing per-example similarities to one per-intent score.
//!
//! The default is [`Aggregation::Max`]: a query that matches any single
//! phrasing of an intent counts fully, so intents with diverse phrasing are not
//! penalized the way averaging would penalize them.

use crate::error::{ConfigError, Result, RouterError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reduces an ordered list of per-example scores to a single score.
pub trait AggregationPolicy: Send + Sync + fmt::Debug {
    /// Aggregate `scores`. Fails with [`RouterError::EmptyAggregation`] on an
    /// empty slice.
    fn aggregate(&self, scores: &[f32]) -> Result<f32>;

    /// Short identifier for logs and output.
    fn name(&self) -> &str;
}

/// Built-in aggregation policies.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    /// Best single example.
    #[default]
    Max,
    /// Arithmetic mean of all examples.
    Mean,
    /// Median; mean of the two middle values for even counts.
    Median,
    /// Mean of the `k` best examples (all of them if there are fewer than `k`).
    TopKMean { k: usize },
}

impl Aggregation {
    /// Check parameters that serde cannot.
    pub fn validate(&self) -> Result<()> {
        match self {
            Aggregation::TopKMean { k: 0 } => Err(ConfigError::InvalidTopK(0).into()),
            _ => Ok(()),
        }
    }
}

impl AggregationPolicy for Aggregation {
    fn aggregate(&self, scores: &[f32]) -> Result<f32> {
        if scores.is_empty() {
            return Err(RouterError::EmptyAggregation);
        }

        let value = match self {
            Aggregation::Max => scores.iter().copied().fold(f32::NEG_INFINITY, f32::max),
            Aggregation::Mean => mean(scores),
            Aggregation::Median => {
                let sorted = sorted_descending(scores);
                let mid = sorted.len() / 2;
                if sorted.len() % 2 == 0 {
                    (sorted[mid - 1] + sorted[mid]) / 2.0
                } else {
                    sorted[mid]
                }
            }
            Aggregation::TopKMean { k } => {
                if *k == 0 {
                    return Err(ConfigError::InvalidTopK(0).into());
                }
                let sorted = sorted_descending(scores);
                mean(&sorted[..(*k).min(sorted.len())])
            }
        };

        Ok(value)
    }

    fn name(&self) -> &str {
        match self {
            Aggregation::Max => "max",
            Aggregation::Mean => "mean",
            Aggregation::Median => "median",
            Aggregation::TopKMean { .. } => "top_k_mean",
        }
    }
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Aggregation::TopKMean { k } => write!(f, "top_k_mean(k={})", k),
            other => f.write_str(other.name()),
        }
    }
}

fn mean(scores: &[f32]) -> f32 {
    scores.iter().sum::<f32>() / scores.len() as f32
}

fn sorted_descending(scores: &[f32]) -> Vec<f32> {
    let mut sorted = scores.to_vec();
    sorted.sort_by(|a, b| b.total_cmp(a));
    sorted
}
