//! The event source boundary.
//!
//! Every operation returns a [`CoreResult`]; nothing panics or throws
//! across this interface and callers must branch on the result.
//!
//! Three implementations:
//! - [`postgres::PgEventSource`] for a directly reachable database
//! - [`rest::RestEventSource`] for a hosted PostgREST-style backend
//! - [`memory::MemoryEventSource`] for demos and tests

use async_trait::async_trait;
use chrono::Utc;
use eventdeck_core::error::CoreResult;
use eventdeck_core::types::{EventId, Timestamp};

use crate::models::event::{CreateEvent, Event, UpdateEvent};

pub mod memory;
pub mod postgres;
pub mod rest;

pub use memory::MemoryEventSource;
pub use postgres::PgEventSource;
pub use rest::RestEventSource;

#[async_trait]
pub trait EventSource: Send + Sync {
    /// Short backend name for logs and health output.
    fn name(&self) -> &'static str;

    /// Events starting at or after `now`, ascending by start time.
    async fn list_from(&self, now: Timestamp) -> CoreResult<Vec<Event>>;

    /// Upcoming events as of the current time.
    async fn list(&self) -> CoreResult<Vec<Event>> {
        self.list_from(Utc::now()).await
    }

    /// Every event, ascending by start time.
    async fn list_all(&self) -> CoreResult<Vec<Event>>;

    /// `NotFound` when no event has this id.
    async fn get_by_id(&self, id: &str) -> CoreResult<Event>;

    /// Events for the given ids in no particular order. Ids without a
    /// matching event are omitted, not reported.
    async fn get_by_ids(&self, ids: &[EventId]) -> CoreResult<Vec<Event>>;

    async fn create(&self, input: &CreateEvent) -> CoreResult<Event>;

    async fn update(&self, id: &str, input: &UpdateEvent) -> CoreResult<Event>;

    async fn delete(&self, id: &str) -> CoreResult<()>;

    async fn health_check(&self) -> CoreResult<()>;
}

/// Normalize and validate a create payload.
pub fn prepare_create(input: &CreateEvent) -> CoreResult<CreateEvent> {
    let input = input.clone().normalized();
    input.validate_input()?;
    Ok(input)
}

/// Merge a patch onto the stored event, then normalize and validate the
/// result as a whole.
pub fn prepare_update(existing: &Event, patch: &UpdateEvent) -> CoreResult<CreateEvent> {
    let merged = patch.merge_onto(existing).normalized();
    merged.validate_input()?;
    Ok(merged)
}

/// Fresh opaque id for a new event.
pub fn new_event_id() -> EventId {
    uuid::Uuid::new_v4().to_string()
}

/// Ascending by start time, ties broken by id for a stable order.
pub(crate) fn sort_by_start(events: &mut [Event]) {
    events.sort_by(|a, b| a.start_time.cmp(&b.start_time).then_with(|| a.id.cmp(&b.id)));
}
