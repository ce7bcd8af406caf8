//! Startup wiring for the configured event source and decision store.

use std::sync::Arc;

use eventdeck_core::error::{CoreError, CoreResult};
use eventdeck_core::storage::StorageError;
use eventdeck_db::source::{EventSource, MemoryEventSource, PgEventSource, RestEventSource};

use crate::config::{DeckConfig, SourceConfig};
use crate::deck::DeckManager;

/// Connect to the configured event backend.
///
/// For Postgres this also checks the connection and applies migrations.
pub async fn connect_source(config: &SourceConfig) -> CoreResult<Arc<dyn EventSource>> {
    match config {
        SourceConfig::Memory { demo_events_path } => {
            let source = match demo_events_path {
                Some(path) => MemoryEventSource::from_json_file(path)?,
                None => MemoryEventSource::new(),
            };
            Ok(Arc::new(source))
        }
        SourceConfig::Postgres { database_url } => {
            let pool = eventdeck_db::create_pool(database_url)
                .await
                .map_err(|e| CoreError::backend(format!("Failed to connect to database: {e}")))?;
            tracing::info!("Database connection pool created");

            eventdeck_db::health_check(&pool)
                .await
                .map_err(|e| CoreError::backend(format!("Database health check failed: {e}")))?;

            eventdeck_db::run_migrations(&pool)
                .await
                .map_err(|e| CoreError::backend(format!("Failed to run migrations: {e}")))?;
            tracing::info!("Database migrations applied");

            Ok(Arc::new(PgEventSource::new(pool)))
        }
        SourceConfig::Rest { url, api_key } => {
            tracing::info!(url = %url, "Using hosted event API");
            Ok(Arc::new(RestEventSource::new(url.clone(), api_key.clone())))
        }
    }
}

/// Open the decision store and build an empty deck.
pub fn build_deck(config: &DeckConfig) -> Result<DeckManager, StorageError> {
    match &config.decisions_dir {
        Some(dir) => DeckManager::persistent(dir, config.motion),
        None => Ok(DeckManager::in_memory(config.motion)),
    }
}
