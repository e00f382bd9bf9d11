//! Evaluation criterion model.

use serde::Serialize;
use sqlx::FromRow;
use staffeval_core::types::{DbId, Timestamp};

/// A row from the `criteria` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Criterion {
    pub id: DbId,
    pub title: String,
    pub weight: i32,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
