//! Handlers for the `/auth` resource (register, login, refresh, logout, me).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use staffeval_core::error::CoreError;
use staffeval_core::members::{normalize_email, Registration};
use staffeval_core::roles::Role;
use staffeval_core::types::DbId;
use staffeval_db::models::profile::{CreateMember, Profile};
use staffeval_db::models::session::CreateSession;
use staffeval_db::models::user::User;
use staffeval_db::repositories::{MemberRepo, ProfileRepo, SessionRepo, UserRepo};

use crate::auth::jwt::{generate_access_token, generate_refresh_token, hash_refresh_token};
use crate::auth::password::{hash_new_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, CurrentUser};
use crate::response::DataResponse;
use crate::state::AppState;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for `POST /auth/refresh`.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Tokens plus the caller's profile, returned by register, login and refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: SessionProfile,
}

/// The session as the client sees it.
#[derive(Debug, Serialize)]
pub struct SessionProfile {
    pub id: DbId,
    pub full_name: String,
    pub role: Role,
    pub department: Option<String>,
}

impl From<CurrentUser> for SessionProfile {
    fn from(user: CurrentUser) -> Self {
        Self {
            id: user.user_id,
            full_name: user.full_name,
            role: user.role,
            department: user.department,
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register
///
/// Public sign-up. The new member is always `staff`, whatever the body
/// says; admins promote afterwards. Returns 201 with a logged-in session.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<Registration>,
) -> AppResult<(StatusCode, Json<DataResponse<AuthResponse>>)> {
    if !state.config.allow_self_registration {
        return Err(AppError::Core(CoreError::Forbidden(
            "Self-registration is disabled".into(),
        )));
    }

    let input = input.normalized()?;
    let password_hash = hash_new_password(&input.password)?;

    let member = MemberRepo::create(
        &state.pool,
        &CreateMember {
            email: input.email,
            password_hash,
            full_name: input.full_name,
            role: Role::Staff,
            department: None,
        },
    )
    .await?;

    tracing::info!(user_id = member.id, "Member self-registered");

    let profile = load_profile(&state, member.id).await?;
    let response = create_auth_response(&state, profile).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: response })))
}

/// POST /api/v1/auth/login
///
/// Authenticate with email + password.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<DataResponse<AuthResponse>>> {
    let email = normalize_email(&input.email);
    let user = UserRepo::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized(INVALID_CREDENTIALS.into())))?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::warn!(user_id = user.id, "Failed login attempt");
        return Err(AppError::Core(CoreError::Unauthorized(
            INVALID_CREDENTIALS.into(),
        )));
    }

    ensure_active(&user)?;
    UserRepo::record_successful_login(&state.pool, user.id).await?;

    let profile = load_profile(&state, user.id).await?;
    let response = create_auth_response(&state, profile).await?;

    tracing::info!(user_id = user.id, "Login succeeded");
    Ok(Json(DataResponse { data: response }))
}

/// POST /api/v1/auth/refresh
///
/// Exchange a live refresh token for a new token pair. The old session is
/// revoked; a token that was already consumed is refused.
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<DataResponse<AuthResponse>>> {
    let token_hash = hash_refresh_token(&input.refresh_token);

    let session = SessionRepo::find_by_refresh_token_hash(&state.pool, &token_hash)
        .await?
        .ok_or_else(invalid_refresh)?;

    if !SessionRepo::revoke(&state.pool, session.id).await? {
        return Err(invalid_refresh());
    }

    let user = UserRepo::find_by_id(&state.pool, session.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;
    ensure_active(&user)?;

    let profile = load_profile(&state, user.id).await?;
    let response = create_auth_response(&state, profile).await?;
    Ok(Json(DataResponse { data: response }))
}

/// POST /api/v1/auth/logout
///
/// Revoke every session of the caller. Returns 204 No Content.
pub async fn logout(State(state): State<AppState>, auth: AuthUser) -> AppResult<StatusCode> {
    let revoked = SessionRepo::revoke_all_for_user(&state.pool, auth.user_id).await?;
    tracing::info!(user_id = auth.user_id, revoked, "Logged out");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/auth/me
///
/// The current session: profile and role as stored right now.
pub async fn me(user: CurrentUser) -> AppResult<Json<DataResponse<SessionProfile>>> {
    Ok(Json(DataResponse { data: user.into() }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn invalid_refresh() -> AppError {
    AppError::Core(CoreError::Unauthorized(
        "Invalid or expired refresh token".into(),
    ))
}

fn ensure_active(user: &User) -> AppResult<()> {
    if user.is_active {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )))
    }
}

/// A login without a profile cannot use the application.
async fn load_profile(state: &AppState, user_id: DbId) -> AppResult<Profile> {
    ProfileRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Forbidden("No profile for this account".into())))
}

/// Issue a token pair, persist the session row and build the response.
async fn create_auth_response(state: &AppState, profile: Profile) -> AppResult<AuthResponse> {
    let role = profile.parsed_role().map_err(|e| {
        AppError::InternalError(format!("Profile {} has invalid role: {e}", profile.id))
    })?;

    let access_token = generate_access_token(profile.id, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let (refresh_plaintext, refresh_hash) = generate_refresh_token();
    let expires_at =
        Utc::now() + chrono::Duration::days(state.config.jwt.refresh_token_expiry_days);

    SessionRepo::create(
        &state.pool,
        &CreateSession {
            user_id: profile.id,
            refresh_token_hash: refresh_hash,
            expires_at,
        },
    )
    .await?;

    Ok(AuthResponse {
        access_token,
        refresh_token: refresh_plaintext,
        expires_in: state.config.jwt.access_token_ttl_secs(),
        user: SessionProfile {
            id: profile.id,
            full_name: profile.full_name,
            role,
            department: profile.department,
        },
    })
}
