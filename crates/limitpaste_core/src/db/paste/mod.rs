//! Paste storage operations backed by redb.

mod helpers;

use crate::constants::MAX_ID_ATTEMPTS;
use crate::{db::tables::PASTES, error::AppError, models::paste::*};
use chrono::{DateTime, Utc};
use redb::{ReadableDatabase, ReadableTable};
use std::sync::Arc;
use uuid::Uuid;

use self::helpers::{deserialize_paste, serialize_paste};

/// Accessor for the paste table.
pub struct PasteDb {
    db: Arc<redb::Database>,
}

impl PasteDb {
    /// Initialize the paste table if it does not exist yet.
    ///
    /// # Returns
    /// A new [`PasteDb`] accessor bound to `db`.
    ///
    /// # Errors
    /// Returns an error when redb transaction/table initialization fails.
    pub fn new(db: Arc<redb::Database>) -> Result<Self, AppError> {
        let write_txn = db.begin_write()?;
        write_txn.open_table(PASTES)?;
        write_txn.commit()?;
        Ok(Self { db })
    }

    /// Insert a new, never-viewed paste.
    ///
    /// The id is generated here; a colliding id is re-rolled inside the same
    /// write transaction.
    ///
    /// # Arguments
    /// - `draft`: Validated paste input, with `created_at` already stamped.
    ///
    /// # Returns
    /// The persisted [`Paste`].
    ///
    /// # Errors
    /// Returns [`AppError::InvalidInput`] for empty content, or a storage
    /// error when the insert cannot commit.
    pub fn create(&self, draft: NewPaste) -> Result<Paste, AppError> {
        if draft.content.is_empty() {
            return Err(AppError::InvalidInput(
                "Paste content must not be empty".to_string(),
            ));
        }

        let mut paste = Paste::new(draft);
        let write_txn = self.db.begin_write()?;
        {
            let mut pastes = write_txn.open_table(PASTES)?;
            let mut attempts = 1;
            while pastes.get(paste.id.as_str())?.is_some() {
                if attempts >= MAX_ID_ATTEMPTS {
                    return Err(AppError::StorageMessage(
                        "Failed to generate a unique paste id".to_string(),
                    ));
                }
                tracing::warn!("Paste id collision on {}; regenerating", paste.id);
                paste.id = Uuid::new_v4().to_string();
                attempts += 1;
            }

            let encoded = serialize_paste(&paste)?;
            pastes.insert(paste.id.as_str(), encoded.as_slice())?;
        }
        write_txn.commit()?;
        Ok(paste)
    }

    /// Fetch a paste by id without counting a view.
    ///
    /// # Returns
    /// `Ok(Some(paste))` when found, `Ok(None)` when missing or malformed.
    ///
    /// # Errors
    /// Returns an error when storage access or deserialization fails.
    pub fn get(&self, id: &str) -> Result<Option<Paste>, AppError> {
        let Some(key) = normalize_paste_id(id) else {
            return Ok(None);
        };
        let read_txn = self.db.begin_read()?;
        let pastes = read_txn.open_table(PASTES)?;
        let paste = match pastes.get(key.as_str())? {
            Some(value) => Some(deserialize_paste(value.value())?),
            None => None,
        };
        Ok(paste)
    }

    /// Consume one view of a paste if it is available at `now`.
    ///
    /// Lookup, availability check and increment run inside one write
    /// transaction. redb admits a single writer at a time, so two callers can
    /// never both observe the last remaining view.
    ///
    /// # Arguments
    /// - `id`: Client-supplied paste id.
    /// - `now`: Instant the expiry check is evaluated against.
    ///
    /// # Returns
    /// `Ok(Some(paste))` with the post-increment record, or `Ok(None)` when the
    /// id is malformed, unknown, expired or out of views.
    ///
    /// # Errors
    /// Returns an error when storage access or serialization fails.
    pub fn consume(&self, id: &str, now: DateTime<Utc>) -> Result<Option<Paste>, AppError> {
        let Some(key) = normalize_paste_id(id) else {
            return Ok(None);
        };

        let write_txn = self.db.begin_write()?;
        let consumed = {
            let mut pastes = write_txn.open_table(PASTES)?;

            let Some(guard) = pastes.get(key.as_str())? else {
                return Ok(None);
            };
            let mut paste = deserialize_paste(guard.value())?;
            drop(guard);

            if !paste.is_available_at(now) {
                return Ok(None);
            }

            paste.record_view();
            let encoded = serialize_paste(&paste)?;
            pastes.insert(key.as_str(), encoded.as_slice())?;
            paste
        };
        write_txn.commit()?;
        Ok(Some(consumed))
    }

    /// Delete every paste that is no longer available at `now`.
    ///
    /// Unavailability is permanent, so removing these rows never changes what a
    /// reader can observe.
    ///
    /// # Returns
    /// Number of rows removed.
    ///
    /// # Errors
    /// Returns an error when storage access fails. Rows that fail to decode
    /// are left in place and logged.
    pub fn purge_unavailable(&self, now: DateTime<Utc>) -> Result<usize, AppError> {
        let write_txn = self.db.begin_write()?;
        let removed = {
            let mut pastes = write_txn.open_table(PASTES)?;
            let mut stale = Vec::new();
            for entry in pastes.iter()? {
                let (key, value) = entry?;
                match deserialize_paste(value.value()) {
                    Ok(paste) if !paste.is_available_at(now) => {
                        stale.push(key.value().to_string());
                    }
                    Ok(_) => {}
                    Err(err) => {
                        tracing::warn!("Skipping undecodable paste row {}: {}", key.value(), err);
                    }
                }
            }
            for id in &stale {
                pastes.remove(id.as_str())?;
            }
            stale.len()
        };
        write_txn.commit()?;
        Ok(removed)
    }

    /// Number of stored paste rows, available or not.
    ///
    /// # Errors
    /// Returns an error when storage access fails.
    pub fn count(&self) -> Result<usize, AppError> {
        let read_txn = self.db.begin_read()?;
        let pastes = read_txn.open_table(PASTES)?;
        let mut count = 0;
        for entry in pastes.iter()? {
            entry?;
            count += 1;
        }
        Ok(count)
    }
}
