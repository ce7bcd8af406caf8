//! Handlers for the `/deck` session.

use axum::extract::State;
use axum::Json;
use eventdeck_core::decisions::Decision;
use eventdeck_core::session::{DeckSnapshot, PointerInput, SessionEvent};
use eventdeck_db::models::event::Event;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response DTOs
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct SwipeRequest {
    pub decision: Decision,
}

/// What a message did, plus the deck as it stands afterwards.
#[derive(Debug, Serialize)]
pub struct DeckReply {
    pub outcome: SessionEvent,
    pub deck: DeckSnapshot<Event>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/deck
pub async fn snapshot(State(state): State<AppState>) -> Json<DataResponse<DeckSnapshot<Event>>> {
    Json(DataResponse {
        data: state.deck.snapshot().await,
    })
}

/// POST /api/v1/deck/pointer
///
/// Body: `{"phase": "down"}`, `{"phase": "move", "offset_x": 42.0}` or
/// `{"phase": "up"}`.
pub async fn pointer(
    State(state): State<AppState>,
    Json(input): Json<PointerInput>,
) -> AppResult<Json<DataResponse<DeckReply>>> {
    let outcome = state.deck.pointer(input).await?;
    reply(&state, outcome).await
}

/// POST /api/v1/deck/swipe
///
/// Replies after the exit animation has run and the decision is stored.
pub async fn swipe(
    State(state): State<AppState>,
    Json(body): Json<SwipeRequest>,
) -> AppResult<Json<DataResponse<DeckReply>>> {
    let outcome = state.deck.swipe(body.decision).await?;
    reply(&state, outcome).await
}

/// POST /api/v1/deck/reset
///
/// Back to the first card. Saved and dismissed sets are kept.
pub async fn reset(State(state): State<AppState>) -> Json<DataResponse<DeckSnapshot<Event>>> {
    Json(DataResponse {
        data: state.deck.reset().await,
    })
}

/// POST /api/v1/deck/reload
///
/// Re-fetch upcoming events and rebuild the deck. On a backend failure the
/// current deck is left as it was.
pub async fn reload(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<DeckSnapshot<Event>>>> {
    let events = state.source.list().await?;
    state.deck.load(events).await;
    Ok(Json(DataResponse {
        data: state.deck.snapshot().await,
    }))
}

async fn reply(state: &AppState, outcome: SessionEvent) -> AppResult<Json<DataResponse<DeckReply>>> {
    let deck = state.deck.snapshot().await;
    Ok(Json(DataResponse {
        data: DeckReply { outcome, deck },
    }))
}
