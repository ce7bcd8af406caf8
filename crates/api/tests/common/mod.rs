#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use chrono::{Duration as ChronoDuration, Utc};
use http_body_util::BodyExt;
use tower::ServiceExt;

use eventdeck_api::config::{DeckConfig, ServerConfig, SourceConfig};
use eventdeck_api::deck::DeckManager;
use eventdeck_api::middleware::rate_limit::RateLimiter;
use eventdeck_api::router::build_app_router;
use eventdeck_api::state::AppState;
use eventdeck_core::motion::MotionConfig;
use eventdeck_db::models::event::Event;
use eventdeck_db::source::{EventSource, MemoryEventSource};

pub const ADMIN_TOKEN: &str = "test-admin-token";

/// Build a test `ServerConfig` with safe defaults.
///
/// Short exit animation so swipe requests resolve quickly, and an admin
/// token so admin routes are reachable.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        admin_token: Some(ADMIN_TOKEN.to_string()),
        rate_limit_per_minute: 0,
        source: SourceConfig::Memory {
            demo_events_path: None,
        },
        deck: DeckConfig {
            decisions_dir: None,
            motion: MotionConfig {
                exit_duration: Duration::from_millis(10),
                ..MotionConfig::default()
            },
        },
    }
}

/// An upcoming event starting `hours` from now.
pub fn event(id: &str, hours: i64) -> Event {
    let now = Utc::now();
    Event {
        id: id.to_string(),
        title: format!("Event {id}"),
        description: None,
        image_url: None,
        start_time: now + ChronoDuration::hours(hours),
        end_time: None,
        location: None,
        venue_name: None,
        category: None,
        ticket_url: None,
        is_free: true,
        price: None,
        created_at: now,
        updated_at: now,
    }
}

/// Events `a`, `b`, `c` one, two and three hours out.
pub fn three_events() -> Vec<Event> {
    vec![event("a", 1), event("b", 2), event("c", 3)]
}

/// Build the full application router over an in-memory source holding
/// `events`, with the deck already loaded from it.
pub async fn build_test_app(events: Vec<Event>) -> Router {
    build_test_app_with(events, test_config()).await
}

pub async fn build_test_app_with(events: Vec<Event>, config: ServerConfig) -> Router {
    let source: Arc<dyn EventSource> = Arc::new(MemoryEventSource::with_events(events));
    let deck = Arc::new(DeckManager::in_memory(config.deck.motion));
    deck.load(source.list().await.unwrap()).await;

    let state = AppState {
        source,
        config: Arc::new(config.clone()),
        deck,
        rate_limiter: Arc::new(RateLimiter::per_minute(config.rate_limit_per_minute)),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
    token: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn post_json(app: &Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body), None).await
}

pub async fn post(app: &Router, uri: &str) -> Response<Body> {
    send(app, Method::POST, uri, None, None).await
}

pub async fn delete(app: &Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None, None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Ids of a `{ "data": [event, ...] }` body, in order.
pub fn data_ids(json: &serde_json::Value) -> Vec<String> {
    json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["id"].as_str().unwrap().to_string())
        .collect()
}
