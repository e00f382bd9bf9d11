//! Handlers for the `/criteria` resource.
//!
//! Reads are open to any authenticated member; mutations require admin.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use staffeval_core::criteria::{weight_balance, CriterionChanges, NewCriterion, WeightBalance};
use staffeval_core::error::CoreError;
use staffeval_core::types::DbId;
use staffeval_db::models::criterion::Criterion;
use staffeval_db::repositories::CriterionRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::query::IncludeInactiveParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// The registry listing together with the active weight total.
#[derive(Debug, Serialize)]
pub struct CriteriaListing {
    pub criteria: Vec<Criterion>,
    #[serde(flatten)]
    pub balance: WeightBalance,
}

/// GET /api/v1/criteria?include_inactive=
pub async fn list_criteria(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Query(params): Query<IncludeInactiveParams>,
) -> AppResult<Json<DataResponse<CriteriaListing>>> {
    let criteria = CriterionRepo::list(&state.pool, params.include_inactive).await?;
    let balance = weight_balance(criteria.iter().filter(|c| c.is_active).map(|c| c.weight));
    Ok(Json(DataResponse {
        data: CriteriaListing { criteria, balance },
    }))
}

/// GET /api/v1/criteria/{id}
pub async fn get_criterion(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Criterion>>> {
    let criterion = CriterionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(not_found(id))?;
    Ok(Json(DataResponse { data: criterion }))
}

/// POST /api/v1/criteria
pub async fn create_criterion(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<NewCriterion>,
) -> AppResult<(StatusCode, Json<DataResponse<Criterion>>)> {
    let input = input.normalized()?;
    let criterion = CriterionRepo::create(&state.pool, &input).await?;

    tracing::info!(
        criterion_id = criterion.id,
        weight = criterion.weight,
        admin_id = admin.user_id,
        "Criterion created",
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: criterion })))
}

/// PUT /api/v1/criteria/{id}
///
/// Partial update; absent fields keep their value.
pub async fn update_criterion(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<CriterionChanges>,
) -> AppResult<Json<DataResponse<Criterion>>> {
    let input = input.normalized()?;
    if input.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "No fields to update".into(),
        )));
    }

    let criterion = CriterionRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(not_found(id))?;

    tracing::info!(criterion_id = id, admin_id = admin.user_id, "Criterion updated");
    Ok(Json(DataResponse { data: criterion }))
}

/// DELETE /api/v1/criteria/{id}
///
/// Deactivates the criterion. Recorded scores keep referencing it, and it
/// stops being required for new submissions. Deleting an already inactive
/// criterion succeeds without change. Returns 204 No Content.
pub async fn delete_criterion(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if CriterionRepo::deactivate(&state.pool, id).await? {
        tracing::info!(criterion_id = id, admin_id = admin.user_id, "Criterion deactivated");
        return Ok(StatusCode::NO_CONTENT);
    }
    match CriterionRepo::find_by_id(&state.pool, id).await? {
        Some(_) => Ok(StatusCode::NO_CONTENT),
        None => Err(not_found(id)),
    }
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Criterion",
        id,
    })
}
