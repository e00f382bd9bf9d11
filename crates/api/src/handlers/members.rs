//! Handlers for the `/admin/members` resource.
//!
//! All handlers require the `admin` role via [`RequireAdmin`]; the check
//! runs before any input is read, so a refused caller mutates nothing.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use staffeval_core::error::CoreError;
use staffeval_core::members::{MemberChanges, NewMember};
use staffeval_core::types::DbId;
use staffeval_db::models::profile::{CreateMember, Member, UpdateMember};
use staffeval_db::repositories::{AssessmentRepo, MemberRepo};

use crate::auth::password::hash_new_password;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Result of `DELETE /admin/members/{id}/assessments`.
#[derive(Debug, Serialize)]
pub struct ResetResult {
    pub subject_id: DbId,
    pub deleted_assessments: u64,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/members
pub async fn list_members(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<Vec<Member>>>> {
    let members = MemberRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: members }))
}

/// GET /api/v1/admin/members/{id}
pub async fn get_member(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Member>>> {
    let member = MemberRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(not_found(id))?;
    Ok(Json(DataResponse { data: member }))
}

/// POST /api/v1/admin/members
///
/// Create the login and the profile together. Returns 201 Created.
pub async fn create_member(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<NewMember>,
) -> AppResult<(StatusCode, Json<DataResponse<Member>>)> {
    let input = input.normalized()?;
    let password_hash = hash_new_password(&input.password)?;

    let member = MemberRepo::create(
        &state.pool,
        &CreateMember {
            email: input.email,
            password_hash,
            full_name: input.full_name,
            role: input.role,
            department: input.department,
        },
    )
    .await?;

    tracing::info!(
        member_id = member.id,
        role = %input.role,
        admin_id = admin.user_id,
        "Member created",
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: member })))
}

/// PUT /api/v1/admin/members/{id}
///
/// A blank or absent password leaves the current one in place. An empty
/// department clears it. `is_active: false` blocks login, revokes refresh
/// sessions and rejects outstanding access tokens; admins cannot deactivate
/// themselves.
pub async fn update_member(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<MemberChanges>,
) -> AppResult<Json<DataResponse<Member>>> {
    let input = input.normalized()?;
    if id == admin.user_id && input.is_active == Some(false) {
        return Err(AppError::Core(CoreError::Validation(
            "Admins cannot deactivate their own account".into(),
        )));
    }
    let password_hash = input
        .password
        .as_deref()
        .map(hash_new_password)
        .transpose()?;

    let changes = UpdateMember {
        full_name: input.full_name.clone(),
        role: input.role,
        department: input.department_update(),
        password_hash,
        is_active: input.is_active,
    };

    let member = MemberRepo::update(&state.pool, id, &changes)
        .await?
        .ok_or(not_found(id))?;

    tracing::info!(
        member_id = id,
        admin_id = admin.user_id,
        password_changed = changes.password_hash.is_some(),
        is_active = ?changes.is_active,
        "Member updated",
    );
    Ok(Json(DataResponse { data: member }))
}

/// DELETE /api/v1/admin/members/{id}
///
/// Removes the login, the profile and every assessment the member took part
/// in. Admins cannot delete their own account. Returns 204 No Content.
pub async fn delete_member(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if id == admin.user_id {
        return Err(AppError::Core(CoreError::Validation(
            "Admins cannot delete their own account".into(),
        )));
    }

    if !MemberRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }

    tracing::info!(member_id = id, admin_id = admin.user_id, "Member deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/admin/members/{id}/assessments
///
/// Clear the member's evaluation record: every assessment in which they are
/// the subject, with its scores.
pub async fn reset_assessments(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ResetResult>>> {
    if MemberRepo::find_by_id(&state.pool, id).await?.is_none() {
        return Err(not_found(id));
    }

    let deleted = AssessmentRepo::delete_for_subject(&state.pool, id).await?;

    tracing::info!(
        subject_id = id,
        deleted,
        admin_id = admin.user_id,
        "Member assessments reset",
    );
    Ok(Json(DataResponse {
        data: ResetResult {
            subject_id: id,
            deleted_assessments: deleted,
        },
    }))
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Member",
        id,
    })
}
