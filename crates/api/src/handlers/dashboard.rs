//! Handler for the reporting dashboard.

use axum::extract::{Query, State};
use axum::Json;
use staffeval_core::reporting::{
    build_summary, utc_offset_from_minutes, AssessmentRecord, DashboardSummary,
};
use staffeval_db::repositories::{AssessmentRepo, ScoreRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAuth;
use crate::query::ReportParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/dashboard/summary?tz_offset_minutes=
///
/// Counters, averages, the monthly trend and top performers over every
/// assessment. Months are bucketed in the caller's UTC offset (default 0).
/// An empty database yields zeroed counters and empty series.
pub async fn summary(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(params): Query<ReportParams>,
) -> AppResult<Json<DataResponse<DashboardSummary>>> {
    let offset = utc_offset_from_minutes(params.tz_offset_minutes.unwrap_or(0))?;

    let rows = AssessmentRepo::list_for_report(&state.pool).await?;
    let ids: Vec<_> = rows.iter().map(|r| r.id).collect();
    let mut entries_by_id = ScoreRepo::entries_by_assessment(&state.pool, &ids).await?;

    let records = rows
        .into_iter()
        .map(|row| -> AppResult<AssessmentRecord> {
            let status = row.parsed_status().map_err(|e| {
                AppError::InternalError(format!("Assessment {} has invalid status: {e}", row.id))
            })?;
            Ok(AssessmentRecord {
                scores: entries_by_id.remove(&row.id).unwrap_or_default(),
                assessment_id: row.id,
                subject_id: row.subject_id,
                subject_name: row.subject_name,
                subject_department: row.subject_department,
                status,
                created_at: row.created_at,
            })
        })
        .collect::<AppResult<Vec<_>>>()?;

    let summary = build_summary(state.config.scoring_scale, &records, user.user_id, offset);

    tracing::debug!(
        user_id = user.user_id,
        assessments = summary.total_assessments,
        "Dashboard summary computed"
    );
    Ok(Json(DataResponse { data: summary }))
}
