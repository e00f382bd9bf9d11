//! Repository for the `scores` table.

use std::collections::HashMap;

use sqlx::PgPool;
use staffeval_core::scoring::ScoreEntry;
use staffeval_core::types::DbId;

use crate::models::score::{ScoreDetail, WeightedScore};

/// Read access to scores. Scores are only ever written together with their
/// assessment, see [`AssessmentRepo::create_with_scores`](super::AssessmentRepo::create_with_scores).
pub struct ScoreRepo;

impl ScoreRepo {
    /// The full breakdown for one assessment, heaviest criterion first.
    pub async fn list_for_assessment(
        pool: &PgPool,
        assessment_id: DbId,
    ) -> Result<Vec<ScoreDetail>, sqlx::Error> {
        sqlx::query_as::<_, ScoreDetail>(
            "SELECT s.id, s.criterion_id, c.title AS criterion_title,
                    s.weight AS criterion_weight, s.score
             FROM scores s
             JOIN criteria c ON c.id = s.criterion_id
             WHERE s.assessment_id = $1
             ORDER BY s.weight DESC, c.id ASC",
        )
        .bind(assessment_id)
        .fetch_all(pool)
        .await
    }

    /// Score entries for many assessments, grouped by assessment ID.
    ///
    /// Assessments without scores are absent from the map.
    pub async fn entries_by_assessment(
        pool: &PgPool,
        assessment_ids: &[DbId],
    ) -> Result<HashMap<DbId, Vec<ScoreEntry>>, sqlx::Error> {
        if assessment_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = sqlx::query_as::<_, WeightedScore>(
            "SELECT s.assessment_id, s.score, s.weight
             FROM scores s
             WHERE s.assessment_id = ANY($1)
             ORDER BY s.assessment_id, s.id",
        )
        .bind(assessment_ids)
        .fetch_all(pool)
        .await?;

        let mut grouped: HashMap<DbId, Vec<ScoreEntry>> = HashMap::new();
        for row in rows {
            grouped.entry(row.assessment_id).or_default().push(ScoreEntry {
                score: row.score,
                weight: row.weight,
            });
        }
        Ok(grouped)
    }
}
