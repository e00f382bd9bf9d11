//! Repository for the `profiles` table.

use sqlx::PgPool;
use staffeval_core::types::DbId;

use crate::models::profile::Profile;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, full_name, role, department, created_at, updated_at";

/// Provides read operations for profiles.
pub struct ProfileRepo;

impl ProfileRepo {
    /// Find a profile by its ID (equal to the owning user's ID).
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM profiles WHERE id = $1");
        sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all profiles ordered by full name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Profile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM profiles ORDER BY full_name ASC, id ASC");
        sqlx::query_as::<_, Profile>(&query).fetch_all(pool).await
    }
}
