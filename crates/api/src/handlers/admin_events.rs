//! Handlers for the `/admin/events` resource.
//!
//! Every handler takes [`RequireAdmin`], so a missing or wrong token is
//! rejected before any backend call.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use eventdeck_db::models::event::{CreateEvent, Event, UpdateEvent};

use crate::error::AppResult;
use crate::middleware::admin::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/admin/events
///
/// Every event, past ones included.
pub async fn list(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Event>>>> {
    let events = state.source.list_all().await?;
    Ok(Json(DataResponse { data: events }))
}

/// POST /api/v1/admin/events
pub async fn create(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateEvent>,
) -> AppResult<(StatusCode, Json<DataResponse<Event>>)> {
    let event = state.source.create(&input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: event })))
}

/// GET /api/v1/admin/events/{id}
pub async fn get_by_id(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<Event>>> {
    let event = state.source.get_by_id(&id).await?;
    Ok(Json(DataResponse { data: event }))
}

/// PUT /api/v1/admin/events/{id}
///
/// Omitted fields keep their stored values.
pub async fn update(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateEvent>,
) -> AppResult<Json<DataResponse<Event>>> {
    let event = state.source.update(&id, &input).await?;
    Ok(Json(DataResponse { data: event }))
}

/// DELETE /api/v1/admin/events/{id}
pub async fn delete(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.source.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
