//! Role-based access control extractors.
//!
//! Each extractor resolves [`CurrentUser`] and checks it against a
//! [`Requirement`] from the shared access policy. A denial is a 403 and
//! happens before the handler body runs, so no data is read or written.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use staffeval_core::access::{authorize, Requirement};

use super::auth::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;

async fn require(
    parts: &mut Parts,
    state: &AppState,
    requirement: Requirement,
) -> Result<CurrentUser, AppError> {
    let user = CurrentUser::from_request_parts(parts, state).await?;
    authorize(user.role, requirement).map_err(|e| {
        tracing::warn!(
            user_id = user.user_id,
            role = %user.role,
            path = %parts.uri.path(),
            ?requirement,
            "Access denied",
        );
        AppError::Core(e)
    })?;
    Ok(user)
}

/// Requires the `admin` role.
///
/// ```ignore
/// async fn create_criterion(RequireAdmin(admin): RequireAdmin, ...) -> AppResult<...>
/// ```
pub struct RequireAdmin(pub CurrentUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require(parts, state, Requirement::Admin).await.map(RequireAdmin)
    }
}

/// Requires `supervisor` or `admin`.
pub struct RequireEvaluator(pub CurrentUser);

impl FromRequestParts<AppState> for RequireEvaluator {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require(parts, state, Requirement::Evaluator)
            .await
            .map(RequireEvaluator)
    }
}

/// Requires any caller with a profile.
pub struct RequireAuth(pub CurrentUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require(parts, state, Requirement::Authenticated)
            .await
            .map(RequireAuth)
    }
}
