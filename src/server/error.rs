use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::{error, warn};
use serde_json::json;

use crate::error::QueueStatusError;

/// Error returned from page handlers.
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

impl From<QueueStatusError> for ApiError {
    fn from(err: QueueStatusError) -> Self {
        match err {
            QueueStatusError::QueueNotFound(_) => {
                warn!("{err}");
                ApiError::NotFound(err.to_string())
            }
            _ => {
                error!("Failed to build queue status: {err}");
                ApiError::Internal(err.to_string())
            }
        }
    }
}
