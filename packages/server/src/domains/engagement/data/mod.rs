use serde::{Deserialize, Serialize};

use crate::domains::engagement::models::{RatingSummary, Score};

/// Body of a rating request. The score is range-checked by the action.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RateInput {
    pub score: i64,
}

/// Outcome of a rating, with the average rounded for display
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingResult {
    pub average_rating: f64,
    pub ratings_count: i64,
    /// The caller's score as now recorded
    pub score: Score,
}

impl RatingResult {
    pub fn new(summary: RatingSummary, score: Score) -> Self {
        Self {
            average_rating: summary.rounded_average(),
            ratings_count: summary.count,
            score,
        }
    }
}
