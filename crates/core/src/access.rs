//! Centralized authorization policy.
//!
//! Every role check in the service goes through this module so that the
//! rules can be tested without a database or an HTTP stack. The API layer
//! resolves the caller's role from `profiles` and then asks these functions.

use crate::error::CoreError;
use crate::roles::Role;
use crate::types::DbId;

/// Landing page for callers with no valid session.
pub const LOGIN_PATH: &str = "/login";

/// Landing page for authenticated callers that lack the required role.
pub const DASHBOARD_PATH: &str = "/dashboard";

/// The minimum privilege an operation needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Any caller with a profile.
    Authenticated,
    /// Admins and supervisors (evaluation submission).
    Evaluator,
    /// Admins only (member and criteria management).
    Admin,
}

impl Requirement {
    fn description(self) -> &'static str {
        match self {
            Requirement::Authenticated => "An authenticated profile is required",
            Requirement::Evaluator => "Supervisor or Admin role required",
            Requirement::Admin => "Admin role required",
        }
    }
}

/// Returns whether `role` satisfies `requirement`.
pub fn is_allowed(role: Role, requirement: Requirement) -> bool {
    match requirement {
        Requirement::Authenticated => true,
        Requirement::Evaluator => matches!(role, Role::Admin | Role::Supervisor),
        Requirement::Admin => role == Role::Admin,
    }
}

/// Check `role` against `requirement`, producing a `Forbidden` error on denial.
pub fn authorize(role: Role, requirement: Requirement) -> Result<(), CoreError> {
    if is_allowed(role, requirement) {
        Ok(())
    } else {
        Err(CoreError::Forbidden(requirement.description().into()))
    }
}

/// The two profiles attached to an assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssessmentParties {
    pub evaluator_id: DbId,
    pub subject_id: DbId,
}

/// Whether the caller may read a single assessment.
///
/// Admins and supervisors see everything; anyone else only sees assessments
/// in which they are the subject or the evaluator.
pub fn can_view_assessment(caller_id: DbId, role: Role, parties: AssessmentParties) -> bool {
    match role {
        Role::Admin | Role::Supervisor => true,
        Role::Staff => caller_id == parties.subject_id || caller_id == parties.evaluator_id,
    }
}

/// Which rows the evaluation history listing may return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryScope {
    All,
    SubjectOnly(DbId),
}

impl HistoryScope {
    /// Staff only see the assessments they were evaluated in.
    pub fn for_caller(caller_id: DbId, role: Role) -> Self {
        match role {
            Role::Staff => HistoryScope::SubjectOnly(caller_id),
            Role::Admin | Role::Supervisor => HistoryScope::All,
        }
    }

    /// The subject filter to apply, if any.
    pub fn subject_filter(self) -> Option<DbId> {
        match self {
            HistoryScope::All => None,
            HistoryScope::SubjectOnly(id) => Some(id),
        }
    }
}
