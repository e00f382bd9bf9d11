//! Repository for members: an identity row plus its profile.

use sqlx::{PgPool, Postgres, Transaction};
use staffeval_core::types::DbId;

use crate::models::profile::{CreateMember, Member, UpdateMember};

/// Column list for the `profiles` + `users` join.
const MEMBER_COLUMNS: &str = "p.id, u.email, p.full_name, p.role, p.department, \
    u.is_active, u.last_login_at, p.created_at, p.updated_at";

const MEMBER_FROM: &str = "profiles p JOIN users u ON u.id = p.id";

/// Provides CRUD operations for members.
pub struct MemberRepo;

impl MemberRepo {
    /// Create the identity and profile rows in one transaction.
    ///
    /// If the profile insert fails the identity insert is rolled back, so a
    /// login without a profile can never be left behind.
    pub async fn create(pool: &PgPool, input: &CreateMember) -> Result<Member, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let (user_id,): (DbId,) = sqlx::query_as(
            "INSERT INTO users (email, password_hash) VALUES ($1, $2) RETURNING id",
        )
        .bind(&input.email)
        .bind(&input.password_hash)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO profiles (id, full_name, role, department) VALUES ($1, $2, $3, $4)",
        )
        .bind(user_id)
        .bind(&input.full_name)
        .bind(input.role.as_str())
        .bind(&input.department)
        .execute(&mut *tx)
        .await?;

        let member = Self::find_in_tx(&mut tx, user_id).await?;
        tx.commit().await?;

        tracing::debug!(user_id, role = %input.role, "Member created");
        Ok(member)
    }

    /// Find a member by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Member>, sqlx::Error> {
        let query = format!("SELECT {MEMBER_COLUMNS} FROM {MEMBER_FROM} WHERE p.id = $1");
        sqlx::query_as::<_, Member>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all members ordered by full name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Member>, sqlx::Error> {
        let query =
            format!("SELECT {MEMBER_COLUMNS} FROM {MEMBER_FROM} ORDER BY p.full_name ASC, p.id ASC");
        sqlx::query_as::<_, Member>(&query).fetch_all(pool).await
    }

    /// Update profile fields and, optionally, the password hash and active
    /// flag. Deactivating a member revokes all of their refresh sessions.
    ///
    /// Returns `None` if no member with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateMember,
    ) -> Result<Option<Member>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let (set_department, department) = match &input.department {
            Some(value) => (true, value.clone()),
            None => (false, None),
        };

        let updated = sqlx::query(
            "UPDATE profiles SET
                full_name = COALESCE($2, full_name),
                role = COALESCE($3, role),
                department = CASE WHEN $4 THEN $5 ELSE department END
             WHERE id = $1",
        )
        .bind(id)
        .bind(&input.full_name)
        .bind(input.role.map(|r| r.as_str()))
        .bind(set_department)
        .bind(department)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            return Ok(None);
        }

        if let Some(hash) = &input.password_hash {
            sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
                .bind(id)
                .bind(hash)
                .execute(&mut *tx)
                .await?;
        }

        if let Some(is_active) = input.is_active {
            sqlx::query("UPDATE users SET is_active = $2 WHERE id = $1")
                .bind(id)
                .bind(is_active)
                .execute(&mut *tx)
                .await?;
            if !is_active {
                sqlx::query(
                    "UPDATE user_sessions SET is_revoked = true
                     WHERE user_id = $1 AND is_revoked = false",
                )
                .bind(id)
                .execute(&mut *tx)
                .await?;
            }
        }

        let member = Self::find_in_tx(&mut tx, id).await?;
        tx.commit().await?;
        Ok(Some(member))
    }

    /// Delete a member's identity. The profile, the member's assessments
    /// (as evaluator or subject) and their scores are removed by cascade.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
    ) -> Result<Member, sqlx::Error> {
        let query = format!("SELECT {MEMBER_COLUMNS} FROM {MEMBER_FROM} WHERE p.id = $1");
        sqlx::query_as::<_, Member>(&query)
            .bind(id)
            .fetch_one(&mut **tx)
            .await
    }
}
