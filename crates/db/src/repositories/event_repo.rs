//! Repository for the `events` table.

use eventdeck_core::types::Timestamp;
use sqlx::PgPool;

use crate::models::event::{CreateEvent, EventRow};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, description, image_url, start_time, end_time, location, \
     venue_name, category, ticket_url, is_free, price, created_at, updated_at";

/// Provides CRUD operations for events.
pub struct EventRepo;

impl EventRepo {
    /// Insert a new event under `id`, returning the created row.
    pub async fn create(
        pool: &PgPool,
        id: &str,
        input: &CreateEvent,
    ) -> Result<EventRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO events
                (id, title, description, image_url, start_time, end_time, location,
                 venue_name, category, ticket_url, is_free, price)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, EventRow>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.image_url)
            .bind(input.start_time)
            .bind(input.end_time)
            .bind(&input.location)
            .bind(&input.venue_name)
            .bind(input.category.map(|c| c.as_str()))
            .bind(&input.ticket_url)
            .bind(input.is_free)
            .bind(&input.price)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<EventRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM events WHERE id = $1");
        sqlx::query_as::<_, EventRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Fetch every event whose id is in `ids`. Unknown ids are skipped.
    pub async fn find_by_ids(pool: &PgPool, ids: &[String]) -> Result<Vec<EventRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM events WHERE id = ANY($1)");
        sqlx::query_as::<_, EventRow>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// Events starting at or after `now`, soonest first.
    pub async fn list_upcoming(pool: &PgPool, now: Timestamp) -> Result<Vec<EventRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM events WHERE start_time >= $1 ORDER BY start_time ASC, id ASC"
        );
        sqlx::query_as::<_, EventRow>(&query)
            .bind(now)
            .fetch_all(pool)
            .await
    }

    /// Every event, soonest first.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<EventRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM events ORDER BY start_time ASC, id ASC");
        sqlx::query_as::<_, EventRow>(&query).fetch_all(pool).await
    }

    /// Replace every writable column of an event with `input`.
    ///
    /// Callers merge partial updates before calling this. Returns `None` if
    /// no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: &str,
        input: &CreateEvent,
    ) -> Result<Option<EventRow>, sqlx::Error> {
        let query = format!(
            "UPDATE events SET
                title = $2,
                description = $3,
                image_url = $4,
                start_time = $5,
                end_time = $6,
                location = $7,
                venue_name = $8,
                category = $9,
                ticket_url = $10,
                is_free = $11,
                price = $12,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, EventRow>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.image_url)
            .bind(input.start_time)
            .bind(input.end_time)
            .bind(&input.location)
            .bind(&input.venue_name)
            .bind(input.category.map(|c| c.as_str()))
            .bind(&input.ticket_url)
            .bind(input.is_free)
            .bind(&input.price)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete an event by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
