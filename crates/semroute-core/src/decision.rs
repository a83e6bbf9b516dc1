//! Ranking per-intent scores and deciding between a match and a no-match.

use crate::error::{ConfigError, Result, RouterError};
use crate::types::{NoMatchReason, RoutingResult, ScoreEntry};
use std::cmp::Ordering;

/// Rank entries by score descending; ties go to the lower catalog position.
pub fn rank(entries: &mut [ScoreEntry]) {
    entries.sort_by(compare_entries);
}

fn compare_entries(a: &ScoreEntry, b: &ScoreEntry) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.position.cmp(&b.position))
}

/// Apply the threshold policy to a set of per-intent scores.
///
/// - No threshold: the top-ranked entry always wins.
/// - With a threshold: a top score strictly below it yields
///   [`RoutingResult::NoMatch`] with [`NoMatchReason::BelowThreshold`]. A score
///   equal to the threshold matches.
///
/// # Errors
///
/// [`RouterError::EmptyCatalog`] if `entries` is empty, and
/// [`ConfigError::InvalidThreshold`] for a NaN or infinite threshold.
pub fn decide(mut entries: Vec<ScoreEntry>, threshold: Option<f32>) -> Result<RoutingResult> {
    if let Some(threshold) = threshold {
        if !threshold.is_finite() {
            return Err(ConfigError::InvalidThreshold(threshold).into());
        }
    }
    if entries.is_empty() {
        return Err(RouterError::EmptyCatalog);
    }

    rank(&mut entries);

    let top_score = entries[0].score;
    if let Some(threshold) = threshold {
        if top_score < threshold {
            return Ok(RoutingResult::NoMatch {
                ranked: entries,
                reason: NoMatchReason::BelowThreshold {
                    top_score,
                    threshold,
                },
            });
        }
    }

    Ok(RoutingResult::Matched {
        intent: entries[0].intent.clone(),
        confidence: top_score,
        ranked: entries,
    })
}
