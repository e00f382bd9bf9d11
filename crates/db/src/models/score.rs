//! Score models.

use serde::Serialize;
use sqlx::FromRow;
use staffeval_core::scoring::ScoreEntry;
use staffeval_core::types::DbId;

/// A score joined with its criterion, for the detail breakdown.
///
/// `criterion_weight` is the weight recorded with the score, not the
/// criterion's current weight.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ScoreDetail {
    pub id: DbId,
    pub criterion_id: DbId,
    pub criterion_title: String,
    pub criterion_weight: i32,
    pub score: f64,
}

impl ScoreDetail {
    pub fn entry(&self) -> ScoreEntry {
        ScoreEntry {
            score: self.score,
            weight: self.criterion_weight,
        }
    }
}

/// Minimal score row used when aggregating many assessments at once.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct WeightedScore {
    pub assessment_id: DbId,
    pub score: f64,
    pub weight: i32,
}
