//! Shared types used across the routing pipeline.

use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// A fixed-length embedding vector.
///
/// The length is fixed per encoder instance. Vectors are compared as-is:
/// nothing in the pipeline pads or truncates them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vector(Vec<f32>);

impl Vector {
    pub fn new(values: Vec<f32>) -> Self {
        Self(values)
    }

    /// Number of components.
    pub fn dimension(&self) -> usize {
        self.0.len()
    }

    /// Euclidean (L2) norm.
    pub fn norm(&self) -> f32 {
        self.0.iter().map(|x| x * x).sum::<f32>().sqrt()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<f32> {
        self.0
    }
}

impl Deref for Vector {
    type Target = [f32];

    fn deref(&self) -> &[f32] {
        &self.0
    }
}

impl AsRef<[f32]> for Vector {
    fn as_ref(&self) -> &[f32] {
        &self.0
    }
}

impl From<Vec<f32>> for Vector {
    fn from(values: Vec<f32>) -> Self {
        Self(values)
    }
}

impl From<&[f32]> for Vector {
    fn from(values: &[f32]) -> Self {
        Self(values.to_vec())
    }
}

impl FromIterator<f32> for Vector {
    fn from_iter<I: IntoIterator<Item = f32>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Aggregated similarity of a query against one intent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    /// Intent name.
    pub intent: String,
    /// Aggregated similarity, conceptually in [-1, 1] for cosine.
    pub score: f32,
    /// Declaration index of the intent in its catalog; lower wins ties.
    pub position: usize,
}

impl ScoreEntry {
    pub fn new(intent: impl Into<String>, score: f32, position: usize) -> Self {
        Self {
            intent: intent.into(),
            score,
            position,
        }
    }
}

/// Why a query did not resolve to an intent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NoMatchReason {
    /// The best score was strictly below the configured threshold.
    BelowThreshold { top_score: f32, threshold: f32 },
}

impl NoMatchReason {
    /// Stable short code, e.g. `below_threshold`.
    pub fn code(&self) -> &'static str {
        match self {
            NoMatchReason::BelowThreshold { .. } => "below_threshold",
        }
    }
}

impl std::fmt::Display for NoMatchReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NoMatchReason::BelowThreshold {
                top_score,
                threshold,
            } => write!(f, "top score {:.3} is below threshold {:.3}", top_score, threshold),
        }
    }
}

/// Outcome of classifying one query.
///
/// The full ranked list is present in both variants so runner-up scores can be
/// inspected. A non-empty ranked list does not imply a match; check the variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RoutingResult {
    Matched {
        intent: String,
        confidence: f32,
        ranked: Vec<ScoreEntry>,
    },
    NoMatch {
        ranked: Vec<ScoreEntry>,
        reason: NoMatchReason,
    },
}

impl RoutingResult {
    pub fn is_match(&self) -> bool {
        matches!(self, RoutingResult::Matched { .. })
    }

    /// Name of the matched intent, `None` on no-match.
    pub fn intent(&self) -> Option<&str> {
        match self {
            RoutingResult::Matched { intent, .. } => Some(intent),
            RoutingResult::NoMatch { .. } => None,
        }
    }

    /// Confidence of the matched intent, `None` on no-match.
    pub fn confidence(&self) -> Option<f32> {
        match self {
            RoutingResult::Matched { confidence, .. } => Some(*confidence),
            RoutingResult::NoMatch { .. } => None,
        }
    }

    /// All intents, best first.
    pub fn ranked(&self) -> &[ScoreEntry] {
        match self {
            RoutingResult::Matched { ranked, .. } | RoutingResult::NoMatch { ranked, .. } => ranked,
        }
    }

    /// Highest-ranked entry, whether or not it matched.
    pub fn top(&self) -> Option<&ScoreEntry> {
        self.ranked().first()
    }

    pub fn no_match_reason(&self) -> Option<&NoMatchReason> {
        match self {
            RoutingResult::Matched { .. } => None,
            RoutingResult::NoMatch { reason, .. } => Some(reason),
        }
    }

    /// Score of a given intent in the ranked list.
    pub fn score_of(&self, intent: &str) -> Option<f32> {
        self.ranked()
            .iter()
            .find(|e| e.intent == intent)
            .map(|e| e.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vector_norm_and_dimension() {
        let v = Vector::from(vec![3.0, 4.0]);
        assert_eq!(v.dimension(), 2);
        assert!((v.norm() - 5.0).abs() < 1e-6);
        assert_eq!(&v[..], &[3.0, 4.0]);
    }

    #[test]
    fn no_match_accessors() {
        let result = RoutingResult::NoMatch {
            ranked: vec![ScoreEntry::new("BookFlight", 0.75, 0)],
            reason: NoMatchReason::BelowThreshold {
                top_score: 0.75,
                threshold: 0.8,
            },
        };

        assert!(!result.is_match());
        assert_eq!(result.intent(), None);
        assert_eq!(result.top().map(|e| e.intent.as_str()), Some("BookFlight"));
        assert_eq!(result.no_match_reason().map(|r| r.code()), Some("below_threshold"));
    }

    #[test]
    fn result_serializes_with_outcome_tag() {
        let result = RoutingResult::Matched {
            intent: "WeatherInfo".to_string(),
            confidence: 1.0,
            ranked: vec![ScoreEntry::new("WeatherInfo", 1.0, 1)],
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["outcome"], "matched");
        assert_eq!(json["intent"], "WeatherInfo");
        assert_eq!(json["ranked"][0]["position"], 1);
    }
}
