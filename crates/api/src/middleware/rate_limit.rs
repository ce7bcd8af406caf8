//! Per-client fixed-window rate limiting.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::extract::{ConnectInfo, State};
use axum::http::{HeaderMap, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tokio::sync::Mutex;

use crate::error::AppError;
use crate::state::AppState;

/// Length of one counting window.
pub const WINDOW: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

/// Request counters keyed by client address.
pub struct RateLimiter {
    limit: u32,
    window: Duration,
    clients: Mutex<HashMap<String, Window>>,
}

impl RateLimiter {
    /// `limit` requests per client per minute; `0` disables limiting.
    pub fn per_minute(limit: u32) -> Self {
        Self::new(limit, WINDOW)
    }

    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            limit,
            window,
            clients: Mutex::new(HashMap::new()),
        }
    }

    /// Count one request from `client` at `now`.
    ///
    /// Returns the seconds until the window resets when the client is over
    /// its limit.
    pub async fn check(&self, client: &str, now: Instant) -> Result<(), u64> {
        if self.limit == 0 {
            return Ok(());
        }

        let mut clients = self.clients.lock().await;
        let entry = clients.entry(client.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });
        if now.duration_since(entry.started) >= self.window {
            *entry = Window {
                started: now,
                count: 0,
            };
        }

        if entry.count >= self.limit {
            let remaining = self.window.saturating_sub(now.duration_since(entry.started));
            return Err(remaining.as_secs().max(1));
        }
        entry.count += 1;
        Ok(())
    }

    /// Drop windows that have expired. Returns how many were removed.
    pub async fn sweep(&self, now: Instant) -> usize {
        let mut clients = self.clients.lock().await;
        let before = clients.len();
        clients.retain(|_, w| now.duration_since(w.started) < self.window);
        before - clients.len()
    }

    pub async fn tracked_clients(&self) -> usize {
        self.clients.lock().await.len()
    }
}

/// Middleware: reject with 429 once the caller exceeds its budget.
pub async fn enforce(State(state): State<AppState>, req: Request<Body>, next: Next) -> Response {
    let client = client_key(&req);
    if let Err(retry_after_secs) = state.rate_limiter.check(&client, Instant::now()).await {
        tracing::warn!(client = %client, retry_after_secs, "Rate limit exceeded");
        return AppError::RateLimited { retry_after_secs }.into_response();
    }
    next.run(req).await
}

/// The peer address, falling back to the first `x-forwarded-for` hop.
fn client_key(req: &Request<Body>) -> String {
    if let Some(ConnectInfo(addr)) = req.extensions().get::<ConnectInfo<SocketAddr>>() {
        return addr.ip().to_string();
    }
    forwarded_for(req.headers()).unwrap_or_else(|| "unknown".to_string())
}

fn forwarded_for(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get("x-forwarded-for")?.to_str().ok()?;
    let first = raw.split(',').next()?.trim();
    if first.is_empty() || first.len() > 64 {
        return None;
    }
    if first
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'.' || b == b':' || b == b'-')
    {
        Some(first.to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[tokio::test]
    async fn test_limit_then_reset_after_window() {
        let limiter = RateLimiter::new(2, Duration::from_secs(60));
        let t0 = Instant::now();
        assert!(limiter.check("1.2.3.4", t0).await.is_ok());
        assert!(limiter.check("1.2.3.4", t0).await.is_ok());
        assert_eq!(
            limiter.check("1.2.3.4", t0 + Duration::from_secs(15)).await,
            Err(45)
        );
        assert!(limiter.check("5.6.7.8", t0).await.is_ok());
        assert!(limiter
            .check("1.2.3.4", t0 + Duration::from_secs(60))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_zero_limit_disables() {
        let limiter = RateLimiter::per_minute(0);
        let now = Instant::now();
        for _ in 0..500 {
            assert!(limiter.check("a", now).await.is_ok());
        }
        assert_eq!(limiter.tracked_clients().await, 0);
    }

    #[tokio::test]
    async fn test_sweep_drops_expired_windows() {
        let limiter = RateLimiter::new(5, Duration::from_secs(60));
        let t0 = Instant::now();
        limiter.check("old", t0).await.unwrap();
        limiter.check("new", t0 + Duration::from_secs(30)).await.unwrap();

        assert_eq!(limiter.sweep(t0 + Duration::from_secs(61)).await, 1);
        assert_eq!(limiter.tracked_clients().await, 1);
    }

    #[test]
    fn test_forwarded_for_takes_first_hop() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.7, 10.0.0.1"),
        );
        assert_eq!(forwarded_for(&headers).as_deref(), Some("203.0.113.7"));

        headers.insert("x-forwarded-for", HeaderValue::from_static("<script>"));
        assert_eq!(forwarded_for(&headers), None);
    }
}
