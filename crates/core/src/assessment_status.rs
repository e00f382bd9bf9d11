//! Assessment lifecycle status.
//!
//! Stored as text in `assessments.status`; the values must match the
//! `chk_assessments_status` constraint.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_COMPLETED: &str = "completed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentStatus {
    Pending,
    Completed,
}

impl AssessmentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AssessmentStatus::Pending => STATUS_PENDING,
            AssessmentStatus::Completed => STATUS_COMPLETED,
        }
    }
}

impl fmt::Display for AssessmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssessmentStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            STATUS_PENDING => Ok(AssessmentStatus::Pending),
            STATUS_COMPLETED => Ok(AssessmentStatus::Completed),
            other => Err(CoreError::Validation(format!(
                "Unknown assessment status '{other}'"
            ))),
        }
    }
}
