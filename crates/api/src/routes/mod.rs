pub mod admin;
pub mod deck;
pub mod events;
pub mod health;

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /events                                          upcoming events
/// /events/lookup?ids=a,b                           events by ids
/// /events/{id}                                     one event
///
/// /deck                                            snapshot (GET)
/// /deck/pointer                                    pointer down, move, up (POST)
/// /deck/swipe                                      save or dismiss the top card (POST)
/// /deck/reset                                      back to the first card (POST)
/// /deck/reload                                     re-fetch events (POST)
///
/// /saved                                           saved events (GET)
/// /saved/{id}                                      un-save (DELETE)
/// /dismissed                                       clear dismissals (DELETE)
///
/// /admin/events                                    list, create (admin only)
/// /admin/events/{id}                               get, update, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/events", events::router())
        .nest("/deck", deck::router())
        .route("/saved", get(handlers::saved::list))
        .route("/saved/{id}", delete(handlers::saved::unsave))
        .route("/dismissed", delete(handlers::saved::clear_dismissed))
        .nest("/admin", admin::router())
}
