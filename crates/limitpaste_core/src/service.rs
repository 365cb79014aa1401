//! Paste lifecycle: validated creation and consume-on-read.

use crate::clock::Clock;
use crate::error::AppError;
use crate::models::paste::{
    CreatePasteRequest, CreatedPaste, IntegerInput, NewPaste, PasteView,
};
use crate::Database;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

const CONTENT_REQUIRED: &str = "Content is required and must be a non-empty string";
const TTL_INVALID: &str = "ttl_seconds must be an integer >= 1";
const MAX_VIEWS_INVALID: &str = "max_views must be an integer >= 1";

/// Business operations layered over [`Database`].
///
/// Holds the creation clock only. Reads receive their expiry instant from the
/// caller so a test override can never reach `created_at`.
#[derive(Clone)]
pub struct PasteService {
    db: Arc<Database>,
    creation_clock: Arc<dyn Clock>,
}

impl PasteService {
    /// Service stamping creation times from `creation_clock`.
    pub fn with_clock(db: Arc<Database>, creation_clock: Arc<dyn Clock>) -> Self {
        Self { db, creation_clock }
    }

    /// Underlying database handle.
    pub fn db(&self) -> &Arc<Database> {
        &self.db
    }

    /// Validate a create request and persist the paste.
    ///
    /// # Returns
    /// Id and timestamps of the new paste.
    ///
    /// # Errors
    /// Returns [`AppError::InvalidInput`] before touching storage when a field
    /// fails validation, or a storage error when the insert fails.
    pub fn create_paste(&self, req: CreatePasteRequest) -> Result<CreatedPaste, AppError> {
        let content = validate_content(req.content)?;
        let ttl_seconds = req
            .ttl_seconds
            .as_ref()
            .map(|value| positive_integer(value, TTL_INVALID))
            .transpose()?;
        let max_views = req
            .max_views
            .as_ref()
            .map(|value| {
                positive_integer(value, MAX_VIEWS_INVALID).and_then(|views| {
                    u32::try_from(views)
                        .map_err(|_| AppError::InvalidInput(MAX_VIEWS_INVALID.to_string()))
                })
            })
            .transpose()?;

        let created_at = self.creation_clock.now();
        let expires_at = ttl_seconds
            .map(|secs| expiry_after(created_at, secs))
            .transpose()?;

        let paste = self.db.pastes.create(NewPaste {
            content,
            created_at,
            expires_at,
            max_views,
        })?;
        tracing::debug!(
            id = %paste.id,
            ttl_seconds = ?ttl_seconds,
            max_views = ?max_views,
            "Created paste"
        );
        Ok(CreatedPaste::from(&paste))
    }

    /// Consume one view of a paste.
    ///
    /// # Arguments
    /// - `id`: Client-supplied paste id.
    /// - `now`: Instant for the expiry check, normally from an
    ///   [`crate::clock::ExpiryClock`].
    ///
    /// # Errors
    /// Returns [`AppError::NotFound`] for missing, malformed, expired or
    /// exhausted pastes, and storage errors unchanged.
    pub fn get_paste(&self, id: &str, now: DateTime<Utc>) -> Result<PasteView, AppError> {
        self.db
            .pastes
            .consume(id, now)?
            .map(PasteView::from)
            .ok_or(AppError::NotFound)
    }
}

fn validate_content(content: Option<String>) -> Result<String, AppError> {
    match content {
        Some(content) if !content.trim().is_empty() => Ok(content),
        _ => Err(AppError::InvalidInput(CONTENT_REQUIRED.to_string())),
    }
}

fn positive_integer(value: &IntegerInput, message: &str) -> Result<i64, AppError> {
    value
        .as_i64()
        .filter(|parsed| *parsed >= 1)
        .ok_or_else(|| AppError::InvalidInput(message.to_string()))
}

fn expiry_after(created_at: DateTime<Utc>, ttl_seconds: i64) -> Result<DateTime<Utc>, AppError> {
    Duration::try_seconds(ttl_seconds)
        .and_then(|ttl| created_at.checked_add_signed(ttl))
        .ok_or_else(|| AppError::InvalidInput(TTL_INVALID.to_string()))
}
