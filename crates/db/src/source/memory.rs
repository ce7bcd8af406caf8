//! In-memory [`EventSource`] used for demos and tests.
//!
//! Optionally seeded from a JSON file holding an array of events.

use std::path::Path;

use async_trait::async_trait;
use chrono::Utc;
use eventdeck_core::error::{CoreError, CoreResult};
use eventdeck_core::types::{EventId, Timestamp};
use tokio::sync::RwLock;

use super::{new_event_id, prepare_create, prepare_update, sort_by_start, EventSource};
use crate::models::event::{CreateEvent, Event, UpdateEvent};

#[derive(Default)]
pub struct MemoryEventSource {
    events: RwLock<Vec<Event>>,
}

impl MemoryEventSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_events(events: Vec<Event>) -> Self {
        Self {
            events: RwLock::new(events),
        }
    }

    /// Seed from a JSON array of events.
    pub fn from_json_file(path: &Path) -> CoreResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            CoreError::Internal(format!("Cannot read demo events {}: {e}", path.display()))
        })?;
        let events: Vec<Event> = serde_json::from_str(&raw).map_err(|e| {
            CoreError::Internal(format!("Invalid demo events {}: {e}", path.display()))
        })?;
        tracing::info!(count = events.len(), path = %path.display(), "Loaded demo events");
        Ok(Self::with_events(events))
    }
}

#[async_trait]
impl EventSource for MemoryEventSource {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn list_from(&self, now: Timestamp) -> CoreResult<Vec<Event>> {
        let mut events: Vec<Event> = self
            .events
            .read()
            .await
            .iter()
            .filter(|e| e.start_time >= now)
            .cloned()
            .collect();
        sort_by_start(&mut events);
        Ok(events)
    }

    async fn list_all(&self) -> CoreResult<Vec<Event>> {
        let mut events = self.events.read().await.clone();
        sort_by_start(&mut events);
        Ok(events)
    }

    async fn get_by_id(&self, id: &str) -> CoreResult<Event> {
        self.events
            .read()
            .await
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or_else(|| CoreError::event_not_found(id))
    }

    async fn get_by_ids(&self, ids: &[EventId]) -> CoreResult<Vec<Event>> {
        Ok(self
            .events
            .read()
            .await
            .iter()
            .filter(|e| ids.contains(&e.id))
            .cloned()
            .collect())
    }

    async fn create(&self, input: &CreateEvent) -> CoreResult<Event> {
        let input = prepare_create(input)?;
        let now = Utc::now();
        let event = Event {
            id: new_event_id(),
            title: input.title,
            description: input.description,
            image_url: input.image_url,
            start_time: input.start_time,
            end_time: input.end_time,
            location: input.location,
            venue_name: input.venue_name,
            category: input.category,
            ticket_url: input.ticket_url,
            is_free: input.is_free,
            price: input.price,
            created_at: now,
            updated_at: now,
        };
        self.events.write().await.push(event.clone());
        tracing::info!(event_id = %event.id, "Event created");
        Ok(event)
    }

    async fn update(&self, id: &str, input: &UpdateEvent) -> CoreResult<Event> {
        let mut events = self.events.write().await;
        let existing = events
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| CoreError::event_not_found(id))?;

        let merged = prepare_update(existing, input)?;
        existing.title = merged.title;
        existing.description = merged.description;
        existing.image_url = merged.image_url;
        existing.start_time = merged.start_time;
        existing.end_time = merged.end_time;
        existing.location = merged.location;
        existing.venue_name = merged.venue_name;
        existing.category = merged.category;
        existing.ticket_url = merged.ticket_url;
        existing.is_free = merged.is_free;
        existing.price = merged.price;
        existing.updated_at = Utc::now();

        tracing::info!(event_id = %id, "Event updated");
        Ok(existing.clone())
    }

    async fn delete(&self, id: &str) -> CoreResult<()> {
        let mut events = self.events.write().await;
        let before = events.len();
        events.retain(|e| e.id != id);
        if events.len() == before {
            return Err(CoreError::event_not_found(id));
        }
        tracing::info!(event_id = %id, "Event deleted");
        Ok(())
    }

    async fn health_check(&self) -> CoreResult<()> {
        Ok(())
    }
}
