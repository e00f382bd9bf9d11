//! Repository for the `assessments` table.

use sqlx::PgPool;
use staffeval_core::types::DbId;

use crate::models::assessment::{
    Assessment, AssessmentPartiesRow, AssessmentWithNames, CreateAssessment,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, evaluator_id, subject_id, status, created_at";

/// Columns for the assessment + evaluator/subject name join.
const NAMED_COLUMNS: &str = "a.id, a.status, a.created_at, \
    a.evaluator_id, ev.full_name AS evaluator_name, \
    a.subject_id, sub.full_name AS subject_name, sub.department AS subject_department";

const NAMED_FROM: &str = "assessments a \
    LEFT JOIN profiles ev ON ev.id = a.evaluator_id \
    LEFT JOIN profiles sub ON sub.id = a.subject_id";

/// Provides create, read and delete operations for assessments.
pub struct AssessmentRepo;

impl AssessmentRepo {
    /// Insert an assessment and all of its scores in a single transaction.
    ///
    /// Either every row is written or none is; a failing score insert rolls
    /// back the assessment row as well. Each score stores its criterion's
    /// current weight, so later weight edits leave this assessment's total
    /// unchanged. An unknown criterion has no weight and fails the insert.
    pub async fn create_with_scores(
        pool: &PgPool,
        input: &CreateAssessment,
    ) -> Result<Assessment, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO assessments (evaluator_id, subject_id, status)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        let assessment = sqlx::query_as::<_, Assessment>(&query)
            .bind(input.evaluator_id)
            .bind(input.subject_id)
            .bind(input.status.as_str())
            .fetch_one(&mut *tx)
            .await?;

        let criterion_ids: Vec<DbId> = input.scores.iter().map(|s| s.criterion_id).collect();
        let scores: Vec<f64> = input.scores.iter().map(|s| s.score).collect();

        sqlx::query(
            "INSERT INTO scores (assessment_id, criterion_id, score, weight)
             SELECT $1, t.criterion_id, t.score, c.weight
             FROM UNNEST($2::BIGINT[], $3::DOUBLE PRECISION[]) AS t(criterion_id, score)
             LEFT JOIN criteria c ON c.id = t.criterion_id",
        )
        .bind(assessment.id)
        .bind(&criterion_ids)
        .bind(&scores)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!(
            assessment_id = assessment.id,
            score_count = scores.len(),
            "Assessment and scores committed"
        );
        Ok(assessment)
    }

    /// Load only the participant IDs of an assessment.
    pub async fn find_parties(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<AssessmentPartiesRow>, sqlx::Error> {
        sqlx::query_as::<_, AssessmentPartiesRow>(
            "SELECT evaluator_id, subject_id FROM assessments WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Find one assessment with evaluator and subject names.
    pub async fn find_with_names(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<AssessmentWithNames>, sqlx::Error> {
        let query = format!("SELECT {NAMED_COLUMNS} FROM {NAMED_FROM} WHERE a.id = $1");
        sqlx::query_as::<_, AssessmentWithNames>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Evaluation history, newest first.
    ///
    /// With `subject_id` set, only assessments of that subject are returned.
    pub async fn list_with_names(
        pool: &PgPool,
        subject_id: Option<DbId>,
    ) -> Result<Vec<AssessmentWithNames>, sqlx::Error> {
        let query = format!(
            "SELECT {NAMED_COLUMNS} FROM {NAMED_FROM}
             WHERE ($1::BIGINT IS NULL OR a.subject_id = $1)
             ORDER BY a.created_at DESC, a.id DESC"
        );
        sqlx::query_as::<_, AssessmentWithNames>(&query)
            .bind(subject_id)
            .fetch_all(pool)
            .await
    }

    /// Every assessment, oldest first, for dashboard aggregation.
    pub async fn list_for_report(pool: &PgPool) -> Result<Vec<AssessmentWithNames>, sqlx::Error> {
        let query = format!(
            "SELECT {NAMED_COLUMNS} FROM {NAMED_FROM} ORDER BY a.created_at ASC, a.id ASC"
        );
        sqlx::query_as::<_, AssessmentWithNames>(&query)
            .fetch_all(pool)
            .await
    }

    /// Delete every assessment in which `subject_id` is the subject.
    /// Scores go with them by cascade. Returns the number of assessments removed.
    pub async fn delete_for_subject(pool: &PgPool, subject_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM assessments WHERE subject_id = $1")
            .bind(subject_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
