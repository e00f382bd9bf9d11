pub mod admin;
pub mod auth;
pub mod criteria;
pub mod dashboard;
pub mod evaluations;
pub mod health;
pub mod profiles;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /auth/register                        self-registration (public, configurable)
/// /auth/login                           login (public)
/// /auth/refresh                         refresh (public)
/// /auth/logout                          logout (requires auth)
/// /auth/me                              current session
///
/// /admin/members                        list, create (admin only)
/// /admin/members/{id}                   get, update, delete
/// /admin/members/{id}/assessments       reset evaluation record (DELETE)
///
/// /criteria                             list (auth), create (admin)
/// /criteria/{id}                        get (auth), update, deactivate (admin)
///
/// /evaluations                          history (auth), submit (supervisor/admin)
/// /evaluations/{id}                     detail (admin, supervisor or party)
///
/// /dashboard/summary                    counters, trend, top performers
///
/// /profiles                             directory
/// /profiles/{id}                        single profile
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/admin", admin::router())
        .nest("/criteria", criteria::router())
        .nest("/evaluations", evaluations::router())
        .nest("/dashboard", dashboard::router())
        .nest("/profiles", profiles::router())
}
