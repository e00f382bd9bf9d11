//! Assessment models and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use staffeval_core::access::AssessmentParties;
use staffeval_core::assessment_status::AssessmentStatus;
use staffeval_core::error::CoreError;
use staffeval_core::scoring::SubmittedScore;
use staffeval_core::types::{DbId, Timestamp};

/// A row from the `assessments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Assessment {
    pub id: DbId,
    pub evaluator_id: DbId,
    pub subject_id: DbId,
    pub status: String,
    pub created_at: Timestamp,
}

/// Only the participant ids of an assessment; loaded before any other
/// assessment data so that access can be decided first.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct AssessmentPartiesRow {
    pub evaluator_id: DbId,
    pub subject_id: DbId,
}

impl From<AssessmentPartiesRow> for AssessmentParties {
    fn from(row: AssessmentPartiesRow) -> Self {
        AssessmentParties {
            evaluator_id: row.evaluator_id,
            subject_id: row.subject_id,
        }
    }
}

/// An assessment with evaluator and subject names joined in.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AssessmentWithNames {
    pub id: DbId,
    pub status: String,
    pub created_at: Timestamp,
    pub evaluator_id: DbId,
    pub evaluator_name: Option<String>,
    pub subject_id: DbId,
    pub subject_name: Option<String>,
    pub subject_department: Option<String>,
}

impl AssessmentWithNames {
    pub fn parsed_status(&self) -> Result<AssessmentStatus, CoreError> {
        self.status.parse()
    }
}

/// DTO for creating an assessment together with its scores.
#[derive(Debug, Clone)]
pub struct CreateAssessment {
    pub evaluator_id: DbId,
    pub subject_id: DbId,
    pub status: AssessmentStatus,
    pub scores: Vec<SubmittedScore>,
}
