//! Handlers for the `/evaluations` resource.
//!
//! Submission requires an evaluator (admin or supervisor). History and
//! detail are open to every member but scoped by the access policy: staff
//! list only their own evaluations, and a detail request is decided from
//! the assessment's parties before anything else is read.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use staffeval_core::access::{can_view_assessment, HistoryScope};
use staffeval_core::assessment_status::AssessmentStatus;
use staffeval_core::error::CoreError;
use staffeval_core::scoring::{ScoreEntry, ScoreSummary, SubmittedScore};
use staffeval_core::types::DbId;
use staffeval_db::models::assessment::{Assessment, AssessmentWithNames, CreateAssessment};
use staffeval_db::models::score::ScoreDetail;
use staffeval_db::repositories::{AssessmentRepo, CriterionRepo, ProfileRepo, ScoreRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAuth, RequireEvaluator};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /evaluations`.
#[derive(Debug, Deserialize)]
pub struct SubmitEvaluationRequest {
    pub subject_id: DbId,
    pub scores: Vec<SubmittedScore>,
}

/// A freshly stored assessment and its total.
#[derive(Debug, Serialize)]
pub struct SubmittedEvaluation {
    pub assessment: Assessment,
    pub summary: ScoreSummary,
}

/// One row of the evaluation history.
#[derive(Debug, Serialize)]
pub struct EvaluationListItem {
    #[serde(flatten)]
    pub assessment: AssessmentWithNames,
    pub summary: ScoreSummary,
}

/// Full breakdown of one assessment.
#[derive(Debug, Serialize)]
pub struct EvaluationDetail {
    #[serde(flatten)]
    pub assessment: AssessmentWithNames,
    pub scores: Vec<ScoreDetail>,
    pub summary: ScoreSummary,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/evaluations
///
/// Every active criterion must be scored exactly once within the configured
/// scale's range. The assessment and its scores are stored in one
/// transaction. Returns 201 Created.
pub async fn submit_evaluation(
    State(state): State<AppState>,
    RequireEvaluator(evaluator): RequireEvaluator,
    Json(input): Json<SubmitEvaluationRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<SubmittedEvaluation>>)> {
    if input.subject_id == evaluator.user_id {
        return Err(AppError::Core(CoreError::Validation(
            "Evaluators cannot evaluate themselves".into(),
        )));
    }

    if ProfileRepo::find_by_id(&state.pool, input.subject_id)
        .await?
        .is_none()
    {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Profile",
            id: input.subject_id,
        }));
    }

    let scale = state.config.scoring_scale;
    let active = CriterionRepo::active_ids(&state.pool).await?;
    let scores = scale.validate_submission(&active, &input.scores)?;

    let assessment = AssessmentRepo::create_with_scores(
        &state.pool,
        &CreateAssessment {
            evaluator_id: evaluator.user_id,
            subject_id: input.subject_id,
            status: AssessmentStatus::Completed,
            scores,
        },
    )
    .await?;

    let breakdown = ScoreRepo::list_for_assessment(&state.pool, assessment.id).await?;
    let summary = scale.summarize(&entries(&breakdown));

    tracing::info!(
        assessment_id = assessment.id,
        evaluator_id = evaluator.user_id,
        subject_id = input.subject_id,
        total = ?summary.total(),
        "Evaluation submitted",
    );
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: SubmittedEvaluation {
                assessment,
                summary,
            },
        }),
    ))
}

/// GET /api/v1/evaluations
///
/// Newest first. Staff only see evaluations in which they are the subject.
pub async fn list_evaluations(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> AppResult<Json<DataResponse<Vec<EvaluationListItem>>>> {
    let scope = HistoryScope::for_caller(user.user_id, user.role);
    let rows = AssessmentRepo::list_with_names(&state.pool, scope.subject_filter()).await?;

    let ids: Vec<DbId> = rows.iter().map(|r| r.id).collect();
    let mut entries_by_id = ScoreRepo::entries_by_assessment(&state.pool, &ids).await?;

    let scale = state.config.scoring_scale;
    let items = rows
        .into_iter()
        .map(|assessment| {
            let entries = entries_by_id.remove(&assessment.id).unwrap_or_default();
            EvaluationListItem {
                summary: scale.summarize(&entries),
                assessment,
            }
        })
        .collect();

    Ok(Json(DataResponse { data: items }))
}

/// GET /api/v1/evaluations/{id}
///
/// Readable by admins, supervisors and the two parties of the assessment.
/// Anyone else gets 403 without names or scores having been loaded.
pub async fn get_evaluation(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<EvaluationDetail>>> {
    let parties = AssessmentRepo::find_parties(&state.pool, id)
        .await?
        .ok_or(not_found(id))?;

    if !can_view_assessment(user.user_id, user.role, parties.into()) {
        tracing::warn!(
            assessment_id = id,
            user_id = user.user_id,
            role = %user.role,
            "Evaluation detail denied",
        );
        return Err(AppError::Core(CoreError::Forbidden(
            "You do not have access to this evaluation".into(),
        )));
    }

    let assessment = AssessmentRepo::find_with_names(&state.pool, id)
        .await?
        .ok_or(not_found(id))?;
    let scores = ScoreRepo::list_for_assessment(&state.pool, id).await?;
    let summary = state.config.scoring_scale.summarize(&entries(&scores));

    Ok(Json(DataResponse {
        data: EvaluationDetail {
            assessment,
            scores,
            summary,
        },
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn entries(scores: &[ScoreDetail]) -> Vec<ScoreEntry> {
    scores.iter().map(ScoreDetail::entry).collect()
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Assessment",
        id,
    })
}
