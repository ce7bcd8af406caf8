use std::sync::Arc;

use eventdeck_db::source::EventSource;

use crate::config::ServerConfig;
use crate::deck::DeckManager;
use crate::middleware::rate_limit::RateLimiter;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything inside is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Backend the events are read from and written to.
    pub source: Arc<dyn EventSource>,
    pub config: Arc<ServerConfig>,
    /// The deck session and its decision store.
    pub deck: Arc<DeckManager>,
    pub rate_limiter: Arc<RateLimiter>,
}
