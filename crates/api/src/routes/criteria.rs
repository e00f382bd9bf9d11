//! Route definitions for the `/criteria` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::criteria;
use crate::state::AppState;

/// Routes mounted at `/criteria`.
///
/// ```text
/// GET    /       -> list_criteria (auth)
/// POST   /       -> create_criterion (admin)
/// GET    /{id}   -> get_criterion (auth)
/// PUT    /{id}   -> update_criterion (admin)
/// DELETE /{id}   -> delete_criterion (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(criteria::list_criteria).post(criteria::create_criterion),
        )
        .route(
            "/{id}",
            get(criteria::get_criterion)
                .put(criteria::update_criterion)
                .delete(criteria::delete_criterion),
        )
}
