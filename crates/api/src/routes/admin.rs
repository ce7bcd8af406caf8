//! Route definitions for the `/admin` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::admin_events;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// All routes require the admin token (enforced by handler extractors).
///
/// ```text
/// GET    /events                  -> list
/// POST   /events                  -> create
/// GET    /events/{id}             -> get_by_id
/// PUT    /events/{id}             -> update
/// DELETE /events/{id}             -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/events", get(admin_events::list).post(admin_events::create))
        .route(
            "/events/{id}",
            get(admin_events::get_by_id)
                .put(admin_events::update)
                .delete(admin_events::delete),
        )
}
