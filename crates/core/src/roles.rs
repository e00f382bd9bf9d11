//! Role names and the [`Role`] enum.
//!
//! The string forms must match the `chk_profiles_role` constraint in
//! `20260301000002_create_profiles.sql`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_SUPERVISOR: &str = "supervisor";
pub const ROLE_STAFF: &str = "staff";

/// A member's role as stored in `profiles.role`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Supervisor,
    Staff,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => ROLE_ADMIN,
            Role::Supervisor => ROLE_SUPERVISOR,
            Role::Staff => ROLE_STAFF,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    /// Parses a stored role name. Comparison is case-insensitive and ignores
    /// surrounding whitespace, since older rows were written by hand.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            ROLE_ADMIN => Ok(Role::Admin),
            ROLE_SUPERVISOR => Ok(Role::Supervisor),
            ROLE_STAFF => Ok(Role::Staff),
            other => Err(CoreError::Validation(format!("Unknown role '{other}'"))),
        }
    }
}
