//! Route definitions for the `/profiles` directory.

use axum::routing::get;
use axum::Router;

use crate::handlers::profiles;
use crate::state::AppState;

/// Routes mounted at `/profiles`.
///
/// ```text
/// GET /       -> list_profiles (auth)
/// GET /{id}   -> get_profile (auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(profiles::list_profiles))
        .route("/{id}", get(profiles::get_profile))
}
