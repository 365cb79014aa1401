//! Paste HTTP handlers.

use crate::{error::HttpError, AppState};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, HeaderMap},
    Json,
};
use limitpaste_core::{
    clock::parse_test_now_ms,
    constants::{SHARE_PATH_PREFIX, TEST_NOW_HEADER},
    models::paste::{CreatePasteRequest, CreatePasteResponse, PasteView},
};

/// Build the shareable URL for a paste.
///
/// Prefers the configured public URL, then the request `Host`, and falls back
/// to a root-relative path when neither is known.
pub(crate) fn share_url(public_url: Option<&str>, host: Option<&str>, id: &str) -> String {
    let base = match (public_url, host) {
        (Some(public_url), _) => public_url.trim_end_matches('/').to_string(),
        (None, Some(host)) => format!("http://{}", host),
        (None, None) => String::new(),
    };
    format!("{}{}{}", base, SHARE_PATH_PREFIX, id)
}

fn request_host(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|host| !host.is_empty())
}

fn test_now_override(headers: &HeaderMap) -> Option<i64> {
    headers
        .get(TEST_NOW_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_test_now_ms)
}

/// Create a new paste.
///
/// # Returns
/// The new id and its share URL.
///
/// # Errors
/// Returns 400 for malformed bodies or invalid fields, 500 when storage fails.
pub async fn create_paste(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<CreatePasteRequest>, JsonRejection>,
) -> Result<Json<CreatePasteResponse>, HttpError> {
    let Json(req) = payload?;
    let created = state.service.create_paste(req)?;
    let url = share_url(
        state.config.public_url.as_deref(),
        request_host(&headers),
        &created.id,
    );
    Ok(Json(CreatePasteResponse {
        id: created.id,
        url,
    }))
}

/// Consume one view of a paste.
///
/// The `x-test-now-ms` header replaces the expiry instant only when the
/// server runs in test mode.
///
/// # Returns
/// Content, remaining views and expiry as JSON.
///
/// # Errors
/// Returns 404 for any unavailable or malformed id, 500 when storage fails.
pub async fn get_paste(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<PasteView>, HttpError> {
    let now = state.expiry_clock.resolve(test_now_override(&headers));
    let view = state.service.get_paste(&id, now)?;
    Ok(Json(view))
}
