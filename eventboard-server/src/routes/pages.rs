//! HTML pages and the form posts behind them

use axum::{
    extract::{Path, State},
    response::{Html, Redirect},
};
use eventboard_core::EventDraft;
use serde::Deserialize;

use crate::routes::{PageError, Payload};
use crate::state::AppState;
use crate::views;

/// GET / - Event list
pub async fn index(State(state): State<AppState>) -> Result<Html<String>, PageError> {
    let events = state.board().list()?;
    Ok(Html(views::index(&events)))
}

/// GET /event/:id - Event details and RSVPs
pub async fn show_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, PageError> {
    let event = state.board().get(&id)?;
    Ok(Html(views::event(&event)))
}

/// GET /create - Form for a new event
pub async fn create_form() -> Html<String> {
    Html(views::create_form())
}

/// GET /event/:id/edit - Form for changing an event
pub async fn edit_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, PageError> {
    let event = state.board().get(&id)?;
    Ok(Html(views::edit_form(&event)))
}

/// POST /events - Create an event
pub async fn create_event(
    State(state): State<AppState>,
    Payload(draft): Payload<EventDraft>,
) -> Result<Redirect, PageError> {
    let event = state.board().create(draft)?;
    tracing::info!(id = %event.id, name = %event.name, "Created event");
    Ok(Redirect::to("/"))
}

/// Request body for an RSVP
#[derive(Deserialize, Default)]
pub struct RsvpRequest {
    #[serde(default)]
    pub name: Option<String>,
}

/// POST /event/:id/rsvp - Add an attendee
pub async fn add_rsvp(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Payload(req): Payload<RsvpRequest>,
) -> Result<Redirect, PageError> {
    let event = state.board().add_rsvp(&id, req.name)?;
    Ok(Redirect::to(&format!("/event/{}", event.id)))
}
