//! Repository for the `criteria` table.

use sqlx::PgPool;
use staffeval_core::criteria::{CriterionChanges, NewCriterion};
use staffeval_core::types::DbId;

use crate::models::criterion::Criterion;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, weight, description, is_active, created_at, updated_at";

/// Provides CRUD operations for evaluation criteria.
pub struct CriterionRepo;

impl CriterionRepo {
    /// Insert a new criterion, returning the created row.
    pub async fn create(pool: &PgPool, input: &NewCriterion) -> Result<Criterion, sqlx::Error> {
        let query = format!(
            "INSERT INTO criteria (title, weight, description)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Criterion>(&query)
            .bind(&input.title)
            .bind(input.weight)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    /// Find a criterion by ID, active or not.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Criterion>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM criteria WHERE id = $1");
        sqlx::query_as::<_, Criterion>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List criteria, heaviest first. Inactive rows are included on request.
    pub async fn list(pool: &PgPool, include_inactive: bool) -> Result<Vec<Criterion>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM criteria
             WHERE is_active = true OR $1
             ORDER BY weight DESC, created_at ASC, id ASC"
        );
        sqlx::query_as::<_, Criterion>(&query)
            .bind(include_inactive)
            .fetch_all(pool)
            .await
    }

    /// IDs of all active criteria, in the same order as [`Self::list`].
    pub async fn active_ids(pool: &PgPool) -> Result<Vec<DbId>, sqlx::Error> {
        let rows: Vec<(DbId,)> = sqlx::query_as(
            "SELECT id FROM criteria WHERE is_active = true
             ORDER BY weight DESC, created_at ASC, id ASC",
        )
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Update a criterion. Only non-`None` fields in `input` are applied; a
    /// blank description clears the stored one.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &CriterionChanges,
    ) -> Result<Option<Criterion>, sqlx::Error> {
        let (set_description, description) = match input.description_update() {
            Some(value) => (true, value),
            None => (false, None),
        };
        let query = format!(
            "UPDATE criteria SET
                title = COALESCE($2, title),
                weight = COALESCE($3, weight),
                description = CASE WHEN $4 THEN $5 ELSE description END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Criterion>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(input.weight)
            .bind(set_description)
            .bind(description)
            .fetch_optional(pool)
            .await
    }

    /// Soft-deactivate a criterion so that existing scores keep their weight.
    ///
    /// Returns `true` if the row was updated.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE criteria SET is_active = false WHERE id = $1 AND is_active = true")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
