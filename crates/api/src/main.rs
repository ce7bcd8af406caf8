use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use eventdeck_api::background::rate_limit_sweep;
use eventdeck_api::config::ServerConfig;
use eventdeck_api::middleware::rate_limit::RateLimiter;
use eventdeck_api::router::build_app_router;
use eventdeck_api::sources;
use eventdeck_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "eventdeck_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");
    if config.admin_token.is_none() {
        tracing::warn!("ADMIN_TOKEN not set, admin routes are disabled");
    }

    // --- Event source ---
    let source = sources::connect_source(&config.source)
        .await
        .expect("Failed to initialise event source");
    tracing::info!(source = source.name(), "Event source ready");

    // --- Deck ---
    let deck = Arc::new(sources::build_deck(&config.deck).expect("Failed to open decision store"));
    match source.list().await {
        Ok(events) => {
            deck.load(events).await;
        }
        // The deck starts empty; clients recover with POST /deck/reload.
        Err(e) => tracing::warn!(error = %e, "Initial event load failed"),
    }

    // --- Rate limiting ---
    let rate_limiter = Arc::new(RateLimiter::per_minute(config.rate_limit_per_minute));
    let sweep_cancel = CancellationToken::new();
    let sweep_handle = tokio::spawn(rate_limit_sweep::run(
        Arc::clone(&rate_limiter),
        rate_limit_sweep::SWEEP_INTERVAL,
        sweep_cancel.clone(),
    ));

    // --- App state ---
    let state = AppState {
        source,
        config: Arc::new(config.clone()),
        deck,
        rate_limiter,
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    sweep_cancel.cancel();
    let _ = tokio::time::timeout(
        Duration::from_secs(config.shutdown_timeout_secs),
        sweep_handle,
    )
    .await;
    tracing::info!("Rate limit sweep stopped");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT or SIGTERM to initiate graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
