use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::models::Event;

/// The body shape every endpoint answers with.
#[derive(Debug, Serialize)]
pub struct ApiResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Payload>,
}

/// Everything an endpoint can put under `data`.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Event(Event),
    Events(Vec<Event>),
}

impl From<Event> for Payload {
    fn from(event: Event) -> Self {
        Payload::Event(event)
    }
}

impl From<Vec<Event>> for Payload {
    fn from(events: Vec<Event>) -> Self {
        Payload::Events(events)
    }
}

pub fn success(data: impl Into<Payload>) -> Response {
    let body = ApiResponse {
        message: "success".to_string(),
        data: Some(data.into()),
    };
    (StatusCode::OK, Json(body)).into_response()
}

pub fn message(status: StatusCode, message: impl Into<String>) -> Response {
    let body = ApiResponse {
        message: message.into(),
        data: None,
    };
    (status, Json(body)).into_response()
}
