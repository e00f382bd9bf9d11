//! Handlers for the `/profiles` directory.

use axum::extract::{Path, State};
use axum::Json;
use staffeval_core::error::CoreError;
use staffeval_core::types::DbId;
use staffeval_db::models::profile::Profile;
use staffeval_db::repositories::ProfileRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/profiles
///
/// Every profile ordered by full name, used to pick evaluation subjects.
pub async fn list_profiles(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> AppResult<Json<DataResponse<Vec<Profile>>>> {
    let profiles = ProfileRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: profiles }))
}

/// GET /api/v1/profiles/{id}
pub async fn get_profile(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Profile>>> {
    let profile = ProfileRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Profile",
            id,
        }))?;
    Ok(Json(DataResponse { data: profile }))
}
