pub mod api;
pub mod method_override;
pub mod pages;

use axum::{
    Form, Json, Router,
    body::Bytes,
    extract::{FromRequest, Request},
    http::{StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use eventboard_core::EventError;
use serde::{Serialize, de::DeserializeOwned};
use tower::Layer;
use tower::util::{MapRequest, MapRequestLayer};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// The full application: method override in front of the router.
pub type App = MapRequest<Router, fn(Request) -> Request>;

pub fn app(state: AppState) -> App {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let router = router()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Must run before routing, so it wraps the router rather than being a
    // router layer.
    MapRequestLayer::new(method_override::apply as fn(Request) -> Request).layer(router)
}

fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::index))
        .route("/create", get(pages::create_form))
        .route("/events", get(api::list_events).post(pages::create_event))
        .route("/events/{id}", put(api::update_event_from_form))
        .route(
            "/event/{id}",
            get(pages::show_event)
                .put(api::update_event)
                .delete(api::delete_event),
        )
        .route("/event/{id}/edit", get(pages::edit_form))
        .route("/event/{id}/rsvp", post(pages::add_rsvp))
}

/// Standard API error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn status_for(err: &EventError) -> StatusCode {
    match err {
        EventError::Validation { .. } => StatusCode::BAD_REQUEST,
        EventError::NotFound { .. } => StatusCode::NOT_FOUND,
        EventError::Persistence(_) | EventError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn log_server_error(status: StatusCode, err: &EventError) {
    if status.is_server_error() {
        tracing::error!(error = %err, "Request failed");
    }
}

/// Event errors as JSON `{ "error": ... }`, for the API routes
pub struct ApiError(EventError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        log_server_error(status, &self.0);

        let error = match self.0 {
            EventError::NotFound { .. } => "Event not found".to_string(),
            other => other.to_string(),
        };
        (status, Json(ErrorResponse { error })).into_response()
    }
}

impl From<EventError> for ApiError {
    fn from(err: EventError) -> Self {
        Self(err)
    }
}

/// Event errors as plain text, for the HTML routes
pub struct PageError(EventError);

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        log_server_error(status, &self.0);

        let message = match self.0 {
            EventError::NotFound { .. } => "Cannot find the event".to_string(),
            other => other.to_string(),
        };
        (status, message).into_response()
    }
}

impl From<EventError> for PageError {
    fn from(err: EventError) -> Self {
        Self(err)
    }
}

/// Decode the body as JSON or url-encoded form data, picked by content type.
///
/// A body with any other content type is ignored, and an empty JSON body
/// decodes as `T::default()`. Either way the handler still sees a value, so
/// lookups by id run before field validation.
async fn read_body<T, S>(req: Request, state: &S) -> Result<T, String>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    let content_type = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    if content_type.starts_with("application/json") {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| rejection.body_text())?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(T::default());
        }
        Json::<T>::from_bytes(&bytes)
            .map(|Json(body)| body)
            .map_err(|rejection| rejection.body_text())
    } else if content_type.starts_with("application/x-www-form-urlencoded") {
        Form::<T>::from_request(req, state)
            .await
            .map(|Form(body)| body)
            .map_err(|rejection| rejection.body_text())
    } else {
        Ok(T::default())
    }
}

/// Request body for the HTML routes; bad bodies are answered as text
pub struct Payload<T>(pub T);

impl<S, T> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = PageError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        read_body(req, state)
            .await
            .map(Payload)
            .map_err(|message| PageError(EventError::validation(message)))
    }
}

/// Request body for the API routes; bad bodies are answered as JSON
pub struct ApiPayload<T>(pub T);

impl<S, T> FromRequest<S> for ApiPayload<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        read_body(req, state)
            .await
            .map(ApiPayload)
            .map_err(|message| ApiError(EventError::validation(message)))
    }
}
