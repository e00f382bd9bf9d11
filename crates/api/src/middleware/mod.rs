//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- identity ID from a JWT Bearer token.
//! - [`auth::CurrentUser`] -- the caller's profile, role included, loaded from the database.
//! - [`rbac::RequireAdmin`] -- requires the `admin` role.
//! - [`rbac::RequireEvaluator`] -- requires `supervisor` or `admin`.
//! - [`rbac::RequireAuth`] -- requires any caller with a profile.

pub mod auth;
pub mod rbac;
