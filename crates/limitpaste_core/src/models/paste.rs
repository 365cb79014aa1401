//! Paste records and the request/response payloads built around them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Paste row stored in the database.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Paste {
    pub id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub max_views: Option<u32>,
    pub current_views: u32,
}

/// Validated input for inserting a paste.
#[derive(Debug, Clone)]
pub struct NewPaste {
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub max_views: Option<u32>,
}

/// Loosely typed integer field as clients send it.
///
/// Accepts JSON integers, integral floats (`5.0`) and strings holding a
/// base-10 integer (`"5"`). An explicit `null` is kept as [`IntegerInput::Null`]
/// so it can be rejected instead of read as an omitted field.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum IntegerInput {
    Integer(i64),
    Float(f64),
    Text(String),
    Null,
}

/// Request payload for creating a paste.
///
/// Omitted limit fields are `None`; a field sent as `null` is
/// `Some(IntegerInput::Null)`.
#[derive(Debug, Default, Deserialize)]
pub struct CreatePasteRequest {
    pub content: Option<String>,
    #[serde(default, deserialize_with = "deserialize_present")]
    pub ttl_seconds: Option<IntegerInput>,
    #[serde(default, deserialize_with = "deserialize_present")]
    pub max_views: Option<IntegerInput>,
}

fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<IntegerInput>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    IntegerInput::deserialize(deserializer).map(Some)
}

/// Result of a successful create.
#[derive(Debug, Clone, Serialize)]
pub struct CreatedPaste {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Response body for `POST /api/pastes`.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreatePasteResponse {
    pub id: String,
    pub url: String,
}

/// What a reader sees after a successful consuming read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasteView {
    pub content: String,
    pub remaining_views: Option<u32>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Response body for the liveness probe.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
    #[serde(rename = "dbState")]
    pub db_state: DbState,
}

/// Store connectivity as reported by the liveness probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DbState {
    Connected,
    Disconnected,
}

impl IntegerInput {
    /// Interpret the field as a whole number.
    ///
    /// # Returns
    /// `None` for fractional, non-finite, out-of-range or non-numeric values.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            Self::Float(value) => {
                let in_range = value.is_finite()
                    && value.fract() == 0.0
                    && *value >= i64::MIN as f64
                    && *value < i64::MAX as f64;
                in_range.then_some(*value as i64)
            }
            Self::Text(raw) => raw.trim().parse().ok(),
            Self::Null => None,
        }
    }
}

impl Paste {
    /// Build a fresh, never-viewed paste from validated input.
    ///
    /// # Returns
    /// A new [`Paste`] with a random v4 id and zero views.
    pub fn new(draft: NewPaste) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            content: draft.content,
            created_at: draft.created_at,
            expires_at: draft.expires_at,
            max_views: draft.max_views,
            current_views: 0,
        }
    }

    /// Whether the expiry instant has been reached at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| now >= expires_at)
    }

    /// Whether every permitted view has been spent.
    pub fn is_exhausted(&self) -> bool {
        self.max_views
            .is_some_and(|max_views| self.current_views >= max_views)
    }

    /// Availability predicate: not expired and not view-exhausted at `now`.
    pub fn is_available_at(&self, now: DateTime<Utc>) -> bool {
        !self.is_expired_at(now) && !self.is_exhausted()
    }

    /// Views left before exhaustion, or `None` for unlimited pastes.
    pub fn remaining_views(&self) -> Option<u32> {
        self.max_views
            .map(|max_views| max_views.saturating_sub(self.current_views))
    }

    /// Count one successful read.
    ///
    /// Callers must check [`Paste::is_available_at`] first.
    pub(crate) fn record_view(&mut self) {
        self.current_views = self.current_views.saturating_add(1);
    }
}

impl From<Paste> for PasteView {
    fn from(paste: Paste) -> Self {
        let remaining_views = paste.remaining_views();
        Self {
            content: paste.content,
            remaining_views,
            expires_at: paste.expires_at,
        }
    }
}

impl From<&Paste> for CreatedPaste {
    fn from(paste: &Paste) -> Self {
        Self {
            id: paste.id.clone(),
            created_at: paste.created_at,
            expires_at: paste.expires_at,
        }
    }
}

/// Length of the hyphenated UUID form used as the storage key.
const HYPHENATED_ID_LEN: usize = 36;

/// Canonicalize a client-supplied paste id.
///
/// Only the hyphenated form is accepted, in either case. Simple, braced and
/// URN spellings of the same UUID are rejected.
///
/// # Returns
/// The hyphenated lowercase form for a valid UUID, otherwise `None`.
pub fn normalize_paste_id(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.len() != HYPHENATED_ID_LEN {
        return None;
    }
    Uuid::try_parse(raw).ok().map(|id| id.to_string())
}
