//! Data models for API requests and persistence.

/// Paste records and payloads.
pub mod paste;
