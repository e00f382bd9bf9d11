//! Route definitions for the `/admin` resource.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::members;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// All routes require the `admin` role (enforced by handler extractors).
///
/// ```text
/// GET    /members                    -> list_members
/// POST   /members                    -> create_member
/// GET    /members/{id}               -> get_member
/// PUT    /members/{id}               -> update_member
/// DELETE /members/{id}               -> delete_member
/// DELETE /members/{id}/assessments   -> reset_assessments
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/members",
            get(members::list_members).post(members::create_member),
        )
        .route(
            "/members/{id}",
            get(members::get_member)
                .put(members::update_member)
                .delete(members::delete_member),
        )
        .route(
            "/members/{id}/assessments",
            delete(members::reset_assessments),
        )
}
