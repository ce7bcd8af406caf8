//! Handlers for the public `/events` resource.

use axum::extract::{Path, Query, State};
use axum::Json;
use eventdeck_core::types::EventId;
use eventdeck_db::models::event::Event;
use serde::Deserialize;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `/events/lookup`.
#[derive(Debug, Deserialize)]
pub struct LookupParams {
    /// Comma-separated event ids.
    #[serde(default)]
    pub ids: String,
}

/// Split a comma-separated id list, dropping blanks and repeats.
pub fn parse_ids(raw: &str) -> Vec<EventId> {
    let mut ids: Vec<EventId> = Vec::new();
    for id in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if !ids.iter().any(|existing| existing == id) {
            ids.push(id.to_string());
        }
    }
    ids
}

/// GET /api/v1/events
///
/// Upcoming events, soonest first.
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Event>>>> {
    let events = state.source.list().await?;
    Ok(Json(DataResponse { data: events }))
}

/// GET /api/v1/events/lookup?ids=a,b
///
/// Events for the given ids. Unknown ids are left out.
pub async fn lookup(
    State(state): State<AppState>,
    Query(params): Query<LookupParams>,
) -> AppResult<Json<DataResponse<Vec<Event>>>> {
    let ids = parse_ids(&params.ids);
    let events = state.source.get_by_ids(&ids).await?;
    Ok(Json(DataResponse { data: events }))
}

/// GET /api/v1/events/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<Event>>> {
    let event = state.source.get_by_id(&id).await?;
    Ok(Json(DataResponse { data: event }))
}
