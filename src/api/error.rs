//! HTTP mapping for [`ChatError`].
//!
//! Client mistakes (unknown session, empty text) are reported as they are. Everything else is
//! logged in full and answered with a generic message so SQL or provider details never reach
//! the browser.

use crate::core::error::ChatError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::error;
use serde_json::json;

impl ChatError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ChatError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            ChatError::EmptyMessage => StatusCode::BAD_REQUEST,
            ChatError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ChatError::Database(_) | ChatError::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            ChatError::SessionNotFound(_) | ChatError::EmptyMessage => self.to_string(),
            ChatError::Upstream(e) => {
                error!("completion provider error: {e}");
                "completion provider unavailable".to_owned()
            }
            ChatError::Database(e) => {
                error!("database error: {e}");
                "internal server error".to_owned()
            }
            ChatError::Template(e) => {
                error!("transcript error: {e}");
                "internal server error".to_owned()
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
