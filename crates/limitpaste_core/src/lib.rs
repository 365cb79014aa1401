//! Core domain library for LimitPaste (config, clocks, storage, lifecycle).

/// Time sources for creation stamps and expiry checks.
pub mod clock;
/// Configuration loading and defaults.
pub mod config;
/// Shared constants.
pub mod constants;
/// Database access layer.
pub mod db;
/// Application error types (storage/domain).
pub mod error;
/// Data models for API requests and persistence.
pub mod models;
/// Paste lifecycle service.
pub mod service;

#[cfg(test)]
pub(crate) mod test_support;

pub use clock::{Clock, ExpiryClock, FixedClock, SystemClock};
pub use config::Config;
pub use constants::DEFAULT_PORT;
pub use db::Database;
pub use error::AppError;
pub use service::PasteService;
