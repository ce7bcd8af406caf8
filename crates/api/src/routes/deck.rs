//! Route definitions for the `/deck` session.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::deck;
use crate::state::AppState;

/// Routes mounted at `/deck`.
///
/// ```text
/// GET  /           -> snapshot
/// POST /pointer    -> pointer
/// POST /swipe      -> swipe
/// POST /reset      -> reset
/// POST /reload     -> reload
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(deck::snapshot))
        .route("/pointer", post(deck::pointer))
        .route("/swipe", post(deck::swipe))
        .route("/reset", post(deck::reset))
        .route("/reload", post(deck::reload))
}
