//! Route definitions for the public `/events` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::events;
use crate::state::AppState;

/// Routes mounted at `/events`.
///
/// ```text
/// GET /            -> list
/// GET /lookup      -> lookup
/// GET /{id}        -> get_by_id
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(events::list))
        .route("/lookup", get(events::lookup))
        .route("/{id}", get(events::get_by_id))
}
