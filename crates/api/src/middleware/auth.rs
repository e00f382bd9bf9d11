//! JWT-based authentication extractors for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use staffeval_core::error::CoreError;
use staffeval_core::roles::Role;
use staffeval_core::types::DbId;
use staffeval_db::repositories::MemberRepo;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Identity extracted from a valid Bearer token. Carries no role.
///
/// ```ignore
/// async fn logout(auth: AuthUser) -> AppResult<StatusCode> { ... }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: DbId,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| unauthorized("Missing Authorization header"))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| unauthorized("Invalid Authorization format. Expected: Bearer <token>"))?;

        let claims = validate_token(token, &state.config.jwt)
            .map_err(|_| unauthorized("Invalid or expired token"))?;

        Ok(AuthUser {
            user_id: claims.sub,
        })
    }
}

/// The authenticated caller with the role currently stored in `profiles`.
///
/// Resolved once per request and cached in the request extensions, so
/// stacking several extractors costs a single lookup. A valid token whose
/// identity has no profile, or whose account is deactivated, is denied
/// with 403.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user_id: DbId,
    pub role: Role,
    pub full_name: String,
    pub department: Option<String>,
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(cached) = parts.extensions.get::<CurrentUser>() {
            return Ok(cached.clone());
        }

        let auth = AuthUser::from_request_parts(parts, state).await?;

        let member = MemberRepo::find_by_id(&state.pool, auth.user_id)
            .await?
            .ok_or_else(|| {
                tracing::warn!(user_id = auth.user_id, "Token holder has no profile");
                AppError::Core(CoreError::Forbidden("No profile for this account".into()))
            })?;

        if !member.is_active {
            tracing::warn!(user_id = member.id, "Deactivated account presented a token");
            return Err(AppError::Core(CoreError::Forbidden(
                "Account is deactivated".into(),
            )));
        }

        let role = member.parsed_role().map_err(|e| {
            AppError::InternalError(format!("Profile {} has invalid role: {e}", member.id))
        })?;

        let user = CurrentUser {
            user_id: member.id,
            role,
            full_name: member.full_name,
            department: member.department,
        };
        parts.extensions.insert(user.clone());
        Ok(user)
    }
}

fn unauthorized(msg: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(msg.into()))
}
