//! API response types.

use axum::Json;
use serde::Serialize;

/// Plain acknowledgement body used by mutation endpoints.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Shorthand for a `{"message": ...}` acknowledgement.
#[must_use]
pub fn message(text: &'static str) -> Json<MessageResponse> {
    Json(MessageResponse { message: text })
}
