//! JSON endpoints

use axum::{
    Json,
    extract::{Path, State},
    response::Redirect,
};
use eventboard_core::{Event, EventDraft};
use serde::Serialize;

use crate::routes::{ApiError, ApiPayload};
use crate::state::AppState;

/// GET /events - List all events
pub async fn list_events(State(state): State<AppState>) -> Result<Json<Vec<Event>>, ApiError> {
    Ok(Json(state.board().list()?))
}

/// PUT /event/:id - Replace name, date and description
pub async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiPayload(draft): ApiPayload<EventDraft>,
) -> Result<Json<Event>, ApiError> {
    let event = state.board().update(&id, draft)?;
    Ok(Json(event))
}

/// PUT /events/:id - Same update, submitted by the edit form
pub async fn update_event_from_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiPayload(draft): ApiPayload<EventDraft>,
) -> Result<Redirect, ApiError> {
    state.board().update(&id, draft)?;
    Ok(Redirect::to("/"))
}

/// Response for a deleted event
#[derive(Serialize)]
pub struct DeleteResponse {
    pub message: &'static str,
    pub event: Event,
}

/// DELETE /event/:id - Delete an event
pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let event = state.board().remove(&id)?;

    Ok(Json(DeleteResponse {
        message: "Event deleted successfully",
        event,
    }))
}
