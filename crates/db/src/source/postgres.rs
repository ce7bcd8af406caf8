//! [`EventSource`] over a Postgres pool.

use async_trait::async_trait;
use eventdeck_core::error::{CoreError, CoreResult};
use eventdeck_core::types::{EventId, Timestamp};

use super::{new_event_id, prepare_create, prepare_update, EventSource};
use crate::models::event::{CreateEvent, Event, EventRow, UpdateEvent};
use crate::repositories::EventRepo;
use crate::DbPool;

pub struct PgEventSource {
    pool: DbPool,
}

impl PgEventSource {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

/// Convert a sqlx failure into a backend error carrying the SQLSTATE code.
fn backend_error(err: sqlx::Error) -> CoreError {
    let code = err
        .as_database_error()
        .and_then(|db| db.code())
        .map(|c| c.into_owned());
    tracing::error!(error = %err, code = ?code, "Database error");
    CoreError::Backend {
        code,
        message: err.to_string(),
    }
}

fn to_events(rows: Vec<EventRow>) -> CoreResult<Vec<Event>> {
    rows.into_iter().map(Event::try_from).collect()
}

#[async_trait]
impl EventSource for PgEventSource {
    fn name(&self) -> &'static str {
        "postgres"
    }

    async fn list_from(&self, now: Timestamp) -> CoreResult<Vec<Event>> {
        let rows = EventRepo::list_upcoming(&self.pool, now)
            .await
            .map_err(backend_error)?;
        to_events(rows)
    }

    async fn list_all(&self) -> CoreResult<Vec<Event>> {
        let rows = EventRepo::list_all(&self.pool).await.map_err(backend_error)?;
        to_events(rows)
    }

    async fn get_by_id(&self, id: &str) -> CoreResult<Event> {
        EventRepo::find_by_id(&self.pool, id)
            .await
            .map_err(backend_error)?
            .ok_or_else(|| CoreError::event_not_found(id))
            .and_then(Event::try_from)
    }

    async fn get_by_ids(&self, ids: &[EventId]) -> CoreResult<Vec<Event>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = EventRepo::find_by_ids(&self.pool, ids)
            .await
            .map_err(backend_error)?;
        to_events(rows)
    }

    async fn create(&self, input: &CreateEvent) -> CoreResult<Event> {
        let input = prepare_create(input)?;
        let id = new_event_id();
        let row = EventRepo::create(&self.pool, &id, &input)
            .await
            .map_err(backend_error)?;
        tracing::info!(event_id = %row.id, "Event created");
        Event::try_from(row)
    }

    async fn update(&self, id: &str, input: &UpdateEvent) -> CoreResult<Event> {
        let existing = self.get_by_id(id).await?;
        let merged = prepare_update(&existing, input)?;
        let row = EventRepo::update(&self.pool, id, &merged)
            .await
            .map_err(backend_error)?
            .ok_or_else(|| CoreError::event_not_found(id))?;
        tracing::info!(event_id = %id, "Event updated");
        Event::try_from(row)
    }

    async fn delete(&self, id: &str) -> CoreResult<()> {
        let deleted = EventRepo::delete(&self.pool, id)
            .await
            .map_err(backend_error)?;
        if !deleted {
            return Err(CoreError::event_not_found(id));
        }
        tracing::info!(event_id = %id, "Event deleted");
        Ok(())
    }

    async fn health_check(&self) -> CoreResult<()> {
        crate::health_check(&self.pool).await.map_err(backend_error)
    }
}
