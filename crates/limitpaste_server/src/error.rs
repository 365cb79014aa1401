//! HTTP error mapping for API handlers.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use limitpaste_core::{constants::PASTE_UNAVAILABLE_MESSAGE, AppError};
use serde_json::json;

/// Handler error that renders as `{ "error": ... }`.
///
/// Storage failures are logged here and reach the client only as a generic
/// 500 body.
#[derive(Debug)]
pub struct HttpError(pub AppError);

impl From<AppError> for HttpError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for HttpError {
    fn from(rejection: JsonRejection) -> Self {
        Self(AppError::InvalidInput(format!(
            "Invalid request body: {}",
            rejection.body_text()
        )))
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, message) = match self.0 {
            AppError::NotFound => (StatusCode::NOT_FOUND, PASTE_UNAVAILABLE_MESSAGE.to_string()),
            AppError::InvalidInput(message) => (StatusCode::BAD_REQUEST, message),
            other => {
                tracing::error!("Request failed: {}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
