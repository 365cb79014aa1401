//! HTTP request handlers.

/// Liveness probe.
pub mod health;
/// Paste create/read endpoints.
pub mod paste;
