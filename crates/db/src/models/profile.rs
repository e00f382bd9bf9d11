//! Profile (staff record) model and DTOs.
//!
//! A profile shares its primary key with the `users` row it belongs to and
//! is the only source of a member's role.

use serde::Serialize;
use sqlx::FromRow;
use staffeval_core::error::CoreError;
use staffeval_core::roles::Role;
use staffeval_core::types::{DbId, Timestamp};

/// A row from the `profiles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Profile {
    pub id: DbId,
    pub full_name: String,
    pub role: String,
    pub department: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Profile {
    /// Parse the stored role name.
    pub fn parsed_role(&self) -> Result<Role, CoreError> {
        self.role.parse()
    }
}

/// A profile joined with its identity row, as shown to admins.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Member {
    pub id: DbId,
    pub email: String,
    pub full_name: String,
    pub role: String,
    pub department: Option<String>,
    pub is_active: bool,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Member {
    pub fn parsed_role(&self) -> Result<Role, CoreError> {
        self.role.parse()
    }
}

/// DTO for creating a member (identity + profile).
#[derive(Debug, Clone)]
pub struct CreateMember {
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub role: Role,
    pub department: Option<String>,
}

/// DTO for updating a member. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateMember {
    pub full_name: Option<String>,
    pub role: Option<Role>,
    /// `Some(None)` clears the department.
    pub department: Option<Option<String>>,
    pub password_hash: Option<String>,
    /// `Some(false)` deactivates the login and revokes its sessions.
    pub is_active: Option<bool>,
}
