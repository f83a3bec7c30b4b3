//! Ranking and threshold bucketing of scored candidates

use super::models::{Drink, MenuMatches, Profile, ScoredDrink};
use super::score::{match_score, ScoringContext};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Score thresholds for the match/suggestion tiers
///
/// Configurable, but the defaults are part of the design contract:
/// score > 0.7 is a match, 0.4 < score <= 0.7 is a suggestion, anything
/// at or below 0.4 is dropped.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RankThresholds {
    #[serde(default = "default_match_threshold")]
    pub match_threshold: f32,
    #[serde(default = "default_suggest_threshold")]
    pub suggest_threshold: f32,
}

fn default_match_threshold() -> f32 {
    0.7
}

fn default_suggest_threshold() -> f32 {
    0.4
}

impl Default for RankThresholds {
    fn default() -> Self {
        Self {
            match_threshold: default_match_threshold(),
            suggest_threshold: default_suggest_threshold(),
        }
    }
}

/// Score every candidate and partition into matches and suggestions
///
/// Sorting is descending by score and stable: equal scores keep their
/// original input order.
pub fn rank(
    drinks: Vec<Drink>,
    profile: &Profile,
    ctx: &ScoringContext<'_>,
    thresholds: RankThresholds,
) -> MenuMatches {
    let mut scored: Vec<ScoredDrink> = drinks
        .into_iter()
        .map(|drink| {
            let score = match_score(&drink, profile, ctx);
            ScoredDrink { drink, score }
        })
        .collect();

    // Vec::sort_by is stable; ties preserve input order
    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

    let mut result = MenuMatches::default();
    for entry in scored {
        if entry.score > thresholds.match_threshold {
            result.matches.push(entry.drink);
        } else if entry.score > thresholds.suggest_threshold {
            result.suggestions.push(entry.drink);
        }
        // At or below the suggestion threshold: dropped
    }

    result
}
