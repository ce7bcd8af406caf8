//! Handlers for the saved and dismissed sets.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use eventdeck_db::models::event::Event;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/saved
///
/// Saved events in the order they were saved. Saved ids whose event no
/// longer exists are skipped.
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Event>>>> {
    let ids = state.deck.saved_ids().await;
    let mut events = state.source.get_by_ids(&ids).await?;
    events.sort_by_key(|e| ids.iter().position(|id| *id == e.id));
    Ok(Json(DataResponse { data: events }))
}

/// DELETE /api/v1/saved/{id}
///
/// Idempotent: un-saving an id that is not saved also succeeds.
pub async fn unsave(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<StatusCode> {
    if state.deck.unsave(&id).await? {
        tracing::info!(event_id = %id, "Event unsaved");
    }
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/dismissed
///
/// Forget every dismissal, so those events can appear in the deck again
/// after a reload.
pub async fn clear_dismissed(State(state): State<AppState>) -> AppResult<StatusCode> {
    state.deck.clear_dismissed().await?;
    tracing::info!("Dismissed events cleared");
    Ok(StatusCode::NO_CONTENT)
}
