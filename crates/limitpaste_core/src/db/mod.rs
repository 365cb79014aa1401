//! Database layer for LimitPaste.

/// Paste storage helpers.
pub mod paste;
/// redb table definitions.
pub mod tables;

use crate::error::AppError;
use redb::ReadableDatabase;
use std::path::Path;
use std::sync::Arc;

/// Database handle with access to the paste table.
pub struct Database {
    pub db: Arc<redb::Database>,
    pub pastes: paste::PasteDb,
}

#[cfg(test)]
mod tests;

fn open_error(path: &Path, err: redb::DatabaseError) -> AppError {
    match err {
        redb::DatabaseError::DatabaseAlreadyOpen => AppError::StorageMessage(format!(
            "Database at {} is already open in another process.\n\
            Stop the other LimitPaste instance, or set DB_PATH to a different location.",
            path.display()
        )),
        other => other.into(),
    }
}

impl Database {
    /// Build a database handle from an existing shared redb instance.
    ///
    /// # Errors
    /// Returns an error if the paste table cannot be initialized.
    pub fn from_shared(db: Arc<redb::Database>) -> Result<Self, AppError> {
        Ok(Self {
            pastes: paste::PasteDb::new(db.clone())?,
            db,
        })
    }

    /// Clone this handle for another subsystem in the same process.
    ///
    /// redb holds an exclusive file lock, so the sweeper and the HTTP state
    /// share one instance instead of reopening the path.
    ///
    /// # Errors
    /// Returns an error if table initialization fails.
    pub fn share(&self) -> Result<Self, AppError> {
        Self::from_shared(self.db.clone())
    }

    /// Open (or create) the database under `path` and initialize tables.
    ///
    /// `path` is a directory; the redb file lives inside it.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created or redb cannot
    /// open the file.
    pub fn new(path: &str) -> Result<Self, AppError> {
        let dir = Path::new(path);
        std::fs::create_dir_all(dir).map_err(|err| {
            AppError::StorageMessage(format!(
                "Failed to create database directory {}: {}",
                dir.display(),
                err
            ))
        })?;

        let file = dir.join(tables::REDB_FILE_NAME);
        let db = redb::Database::create(&file).map_err(|err| open_error(&file, err))?;
        tracing::debug!("Opened database at {}", file.display());
        Self::from_shared(Arc::new(db))
    }

    /// Check that the store can serve a read transaction.
    ///
    /// # Errors
    /// Returns the underlying storage error when the store is unreachable.
    pub fn ping(&self) -> Result<(), AppError> {
        let read_txn = self.db.begin_read()?;
        read_txn.open_table(tables::PASTES)?;
        Ok(())
    }
}
