//! Event entity model and DTOs.

use eventdeck_core::category::EventCategory;
use eventdeck_core::deck::DeckItem;
use eventdeck_core::error::CoreError;
use eventdeck_core::types::{EventId, Timestamp};
use eventdeck_core::validation::{check_pricing, check_time_range, FieldErrors};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// An event as served to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub start_time: Timestamp,
    pub end_time: Option<Timestamp>,
    pub location: Option<String>,
    pub venue_name: Option<String>,
    pub category: Option<EventCategory>,
    pub ticket_url: Option<String>,
    pub is_free: bool,
    pub price: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl DeckItem for Event {
    fn item_id(&self) -> &str {
        &self.id
    }
}

/// A row from the `events` table. `category` is stored as its name.
#[derive(Debug, Clone, FromRow)]
pub struct EventRow {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub start_time: Timestamp,
    pub end_time: Option<Timestamp>,
    pub location: Option<String>,
    pub venue_name: Option<String>,
    pub category: Option<String>,
    pub ticket_url: Option<String>,
    pub is_free: bool,
    pub price: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<EventRow> for Event {
    type Error = CoreError;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        let category = row
            .category
            .as_deref()
            .map(EventCategory::from_name)
            .transpose()
            .map_err(|e| CoreError::Internal(format!("Event {}: {e}", row.id)))?;

        Ok(Event {
            id: row.id,
            title: row.title,
            description: row.description,
            image_url: row.image_url,
            start_time: row.start_time,
            end_time: row.end_time,
            location: row.location,
            venue_name: row.venue_name,
            category,
            ticket_url: row.ticket_url,
            is_free: row.is_free,
            price: row.price,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// DTO for creating a new event; also the fully merged form of an update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct CreateEvent {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,
    pub description: Option<String>,
    #[validate(url(message = "Image URL must be a valid URL"))]
    pub image_url: Option<String>,
    pub start_time: Timestamp,
    pub end_time: Option<Timestamp>,
    pub location: Option<String>,
    pub venue_name: Option<String>,
    pub category: Option<EventCategory>,
    #[validate(url(message = "Ticket URL must be a valid URL"))]
    pub ticket_url: Option<String>,
    /// Defaults to `true` when omitted.
    #[serde(default = "default_is_free")]
    pub is_free: bool,
    #[validate(length(max = 50, message = "Price must be at most 50 characters"))]
    pub price: Option<String>,
}

fn default_is_free() -> bool {
    true
}

impl CreateEvent {
    /// Trim text fields and turn blank optional fields into `None`, the way
    /// an empty form input should be read.
    pub fn normalized(mut self) -> Self {
        self.title = self.title.trim().to_string();
        for field in [
            &mut self.description,
            &mut self.image_url,
            &mut self.location,
            &mut self.venue_name,
            &mut self.ticket_url,
            &mut self.price,
        ] {
            *field = field
                .take()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty());
        }
        self
    }

    /// Run field rules and cross-field rules, collecting every violation.
    pub fn validate_input(&self) -> Result<(), CoreError> {
        let mut errors = match self.validate() {
            Ok(()) => FieldErrors::new(),
            Err(e) => FieldErrors::from_validator(&e),
        };
        if self.title.trim().is_empty() && errors.get("title").is_none() {
            errors.add("title", "Title is required");
        }
        check_time_range(self.start_time, self.end_time, &mut errors);
        check_pricing(self.is_free, self.price.as_deref(), &mut errors);
        errors.into_result()
    }
}

/// DTO for updating an existing event. All fields are optional; `None`
/// keeps the stored value.
///
/// `end_time` and `category` use `Option<Option<T>>` so an explicit `null`
/// clears them while an omitted field keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateEvent {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub start_time: Option<Timestamp>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_time: Option<Option<Timestamp>>,
    pub location: Option<String>,
    pub venue_name: Option<String>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub category: Option<Option<EventCategory>>,
    pub ticket_url: Option<String>,
    pub is_free: Option<bool>,
    pub price: Option<String>,
}

impl UpdateEvent {
    /// Overlay this patch on `existing`, producing the full input to store.
    pub fn merge_onto(&self, existing: &Event) -> CreateEvent {
        CreateEvent {
            title: self.title.clone().unwrap_or_else(|| existing.title.clone()),
            description: self.description.clone().or_else(|| existing.description.clone()),
            image_url: self.image_url.clone().or_else(|| existing.image_url.clone()),
            start_time: self.start_time.unwrap_or(existing.start_time),
            end_time: self.end_time.unwrap_or(existing.end_time),
            location: self.location.clone().or_else(|| existing.location.clone()),
            venue_name: self.venue_name.clone().or_else(|| existing.venue_name.clone()),
            category: self.category.unwrap_or(existing.category),
            ticket_url: self.ticket_url.clone().or_else(|| existing.ticket_url.clone()),
            is_free: self.is_free.unwrap_or(existing.is_free),
            price: self.price.clone().or_else(|| existing.price.clone()),
        }
    }
}

/// Wrap any field that is present in the body, `null` included, in `Some`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
