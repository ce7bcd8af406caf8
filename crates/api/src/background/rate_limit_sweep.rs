//! Periodic cleanup of expired rate-limit windows.
//!
//! Without it the counter map grows by one entry per distinct client.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use crate::middleware::rate_limit::RateLimiter;

/// How often the sweep runs.
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Run the sweep loop until `cancel` is triggered.
pub async fn run(limiter: Arc<RateLimiter>, interval: Duration, cancel: CancellationToken) {
    tracing::info!(interval_secs = interval.as_secs(), "Rate limit sweep started");

    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Rate limit sweep stopping");
                break;
            }
            _ = ticker.tick() => {
                let removed = limiter.sweep(Instant::now()).await;
                if removed > 0 {
                    tracing::debug!(removed, "Rate limit sweep: dropped expired windows");
                }
            }
        }
    }
}
