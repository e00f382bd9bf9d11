//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - `Create*` DTOs for inserts where the API shape differs from the row
//! - Joined read models used by list and detail views

pub mod assessment;
pub mod criterion;
pub mod profile;
pub mod score;
pub mod session;
pub mod user;
