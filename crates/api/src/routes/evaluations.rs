//! Route definitions for the `/evaluations` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::evaluations;
use crate::state::AppState;

/// Routes mounted at `/evaluations`.
///
/// ```text
/// GET  /       -> list_evaluations (auth, staff see their own)
/// POST /       -> submit_evaluation (supervisor or admin)
/// GET  /{id}   -> get_evaluation (admin, supervisor or party)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(evaluations::list_evaluations).post(evaluations::submit_evaluation),
        )
        .route("/{id}", get(evaluations::get_evaluation))
}
