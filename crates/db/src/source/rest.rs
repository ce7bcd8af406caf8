//! [`EventSource`] over a hosted PostgREST-style HTTP API.
//!
//! Filters use PostgREST operator syntax (`gte.`, `eq.`, `in.(...)`) and
//! writes ask for the affected rows back with `Prefer: return=representation`.

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use eventdeck_core::error::{CoreError, CoreResult};
use eventdeck_core::types::{EventId, Timestamp};
use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::{new_event_id, prepare_create, prepare_update, EventSource};
use crate::models::event::{CreateEvent, Event, UpdateEvent};

/// Table endpoint relative to the base URL.
const EVENTS_PATH: &str = "/rest/v1/events";

type Query = Vec<(&'static str, String)>;

/// HTTP client for the hosted events table.
pub struct RestEventSource {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

/// Error body returned by PostgREST on non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: Option<String>,
    message: Option<String>,
}

/// Insert/update payload: the validated input plus the columns the client
/// owns.
#[derive(Serialize)]
struct WritePayload<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a str>,
    #[serde(flatten)]
    fields: &'a CreateEvent,
    #[serde(skip_serializing_if = "Option::is_none")]
    updated_at: Option<Timestamp>,
}

impl RestEventSource {
    /// * `base_url` - Project URL, e.g. `https://project.example.co`.
    /// * `api_key` - Sent both as `apikey` and as the bearer token.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, api_key)
    }

    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}{EVENTS_PATH}", self.base_url)
    }

    fn request(&self, method: Method, query: &Query) -> reqwest::RequestBuilder {
        self.client
            .request(method, self.endpoint())
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .query(query)
    }

    /// Send a request whose response is an array of rows.
    async fn fetch_rows(&self, request: reqwest::RequestBuilder) -> CoreResult<Vec<Event>> {
        let response = request.send().await.map_err(request_error)?;
        Self::parse_response(response).await
    }

    /// Send a write and return the single affected row, `NotFound` if none.
    async fn write_one(&self, request: reqwest::RequestBuilder, id: &str) -> CoreResult<Event> {
        let rows = self
            .fetch_rows(request.header("Prefer", "return=representation"))
            .await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| CoreError::event_not_found(id))
    }

    // ---- private helpers ----

    /// Return the response unchanged on a 2xx status, otherwise turn the
    /// body into a backend error.
    async fn ensure_success(response: reqwest::Response) -> CoreResult<reqwest::Response> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            let err = error_from_body(status.as_u16(), &body);
            tracing::error!(status = status.as_u16(), error = %err, "Event API error");
            return Err(err);
        }
        Ok(response)
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> CoreResult<T> {
        let response = Self::ensure_success(response).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| CoreError::backend(format!("Malformed event API response: {e}")))
    }
}

fn request_error(err: reqwest::Error) -> CoreError {
    tracing::error!(error = %err, "Event API request failed");
    CoreError::backend(err.to_string())
}

/// Map a non-2xx response body to a backend error, keeping the PostgREST
/// error code when the body carries one.
fn error_from_body(status: u16, body: &str) -> CoreError {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            code,
            message: Some(message),
        }) => CoreError::Backend { code, message },
        Ok(ErrorBody { code, message: None }) => CoreError::Backend {
            code,
            message: format!("HTTP {status}"),
        },
        Err(_) => CoreError::backend(format!("HTTP {status}: {body}")),
    }
}

fn upcoming_query(now: Timestamp) -> Query {
    vec![
        ("select", "*".to_string()),
        (
            "start_time",
            format!("gte.{}", now.to_rfc3339_opts(SecondsFormat::Millis, true)),
        ),
        ("order", "start_time.asc,id.asc".to_string()),
    ]
}

fn all_query() -> Query {
    vec![
        ("select", "*".to_string()),
        ("order", "start_time.asc,id.asc".to_string()),
    ]
}

fn id_query(id: &str) -> Query {
    vec![("select", "*".to_string()), ("id", format!("eq.{id}"))]
}

fn ids_query(ids: &[EventId]) -> Query {
    vec![("select", "*".to_string()), ("id", ids_filter(ids))]
}

/// `in.("a","b")` with each id quoted so commas and parentheses are literal.
fn ids_filter(ids: &[EventId]) -> String {
    let quoted: Vec<String> = ids
        .iter()
        .map(|id| format!("\"{}\"", id.replace('\\', "\\\\").replace('"', "\\\"")))
        .collect();
    format!("in.({})", quoted.join(","))
}

#[async_trait]
impl EventSource for RestEventSource {
    fn name(&self) -> &'static str {
        "rest"
    }

    async fn list_from(&self, now: Timestamp) -> CoreResult<Vec<Event>> {
        self.fetch_rows(self.request(Method::GET, &upcoming_query(now)))
            .await
    }

    async fn list_all(&self) -> CoreResult<Vec<Event>> {
        self.fetch_rows(self.request(Method::GET, &all_query())).await
    }

    async fn get_by_id(&self, id: &str) -> CoreResult<Event> {
        self.fetch_rows(self.request(Method::GET, &id_query(id)))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| CoreError::event_not_found(id))
    }

    async fn get_by_ids(&self, ids: &[EventId]) -> CoreResult<Vec<Event>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.fetch_rows(self.request(Method::GET, &ids_query(ids)))
            .await
    }

    async fn create(&self, input: &CreateEvent) -> CoreResult<Event> {
        let input = prepare_create(input)?;
        let id = new_event_id();
        let payload = WritePayload {
            id: Some(&id),
            fields: &input,
            updated_at: None,
        };
        let request = self
            .request(Method::POST, &vec![("select", "*".to_string())])
            .json(&payload);
        let event = self.write_one(request, &id).await?;
        tracing::info!(event_id = %event.id, "Event created");
        Ok(event)
    }

    async fn update(&self, id: &str, input: &UpdateEvent) -> CoreResult<Event> {
        let existing = self.get_by_id(id).await?;
        let merged = prepare_update(&existing, input)?;
        let payload = WritePayload {
            id: None,
            fields: &merged,
            updated_at: Some(Utc::now()),
        };
        let request = self.request(Method::PATCH, &id_query(id)).json(&payload);
        let event = self.write_one(request, id).await?;
        tracing::info!(event_id = %id, "Event updated");
        Ok(event)
    }

    async fn delete(&self, id: &str) -> CoreResult<()> {
        self.write_one(self.request(Method::DELETE, &id_query(id)), id)
            .await?;
        tracing::info!(event_id = %id, "Event deleted");
        Ok(())
    }

    async fn health_check(&self) -> CoreResult<()> {
        let query = vec![("select", "id".to_string()), ("limit", "1".to_string())];
        let response = self
            .request(Method::GET, &query)
            .send()
            .await
            .map_err(request_error)?;
        Self::ensure_success(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::TimeZone;
    use eventdeck_core::category::EventCategory;

    use super::*;

    #[test]
    fn test_upcoming_query_uses_postgrest_operators() {
        let now = Utc.with_ymd_and_hms(2026, 6, 12, 19, 30, 0).unwrap();
        let query = upcoming_query(now);
        assert_eq!(query[1], ("start_time", "gte.2026-06-12T19:30:00.000Z".to_string()));
        assert_eq!(query[2].1, "start_time.asc,id.asc");
    }

    #[test]
    fn test_ids_filter_quotes_each_id() {
        let ids = vec!["a".to_string(), "b,c".to_string()];
        assert_eq!(ids_filter(&ids), r#"in.("a","b,c")"#);
    }

    #[test]
    fn test_ids_filter_escapes_quotes_and_backslashes() {
        let ids = vec![r#"x"y"#.to_string(), r"p\q".to_string()];
        assert_eq!(ids_filter(&ids), r#"in.("x\"y","p\\q")"#);
    }

    #[test]
    fn test_id_query() {
        assert_eq!(id_query("evt-1")[1], ("id", "eq.evt-1".to_string()));
    }

    #[test]
    fn test_error_body_with_code() {
        let body = r#"{"code":"23514","message":"violates check constraint","details":null}"#;
        assert_matches!(
            error_from_body(400, body),
            CoreError::Backend { code: Some(ref c), ref message }
                if c == "23514" && message == "violates check constraint"
        );
    }

    #[test]
    fn test_error_body_not_json() {
        assert_matches!(
            error_from_body(503, "upstream down"),
            CoreError::Backend { code: None, ref message } if message == "HTTP 503: upstream down"
        );
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let source = RestEventSource::new("https://project.example.co/", "key");
        assert_eq!(source.endpoint(), "https://project.example.co/rest/v1/events");
    }

    #[test]
    fn test_write_payload_flattens_input() {
        let input = CreateEvent {
            title: "Night market".to_string(),
            description: None,
            image_url: None,
            start_time: Utc.with_ymd_and_hms(2026, 6, 12, 18, 0, 0).unwrap(),
            end_time: None,
            location: None,
            venue_name: None,
            category: Some(EventCategory::FoodDrink),
            ticket_url: None,
            is_free: true,
            price: None,
        };
        let payload = WritePayload {
            id: Some("evt-9"),
            fields: &input,
            updated_at: None,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["id"], "evt-9");
        assert_eq!(json["category"], "food_drink");
        assert!(json.get("updated_at").is_none());
        // A cleared column is sent as null so PATCH overwrites it.
        assert!(json.get("end_time").is_some_and(|v| v.is_null()));
    }
}
