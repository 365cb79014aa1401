//! Shared constants used across LimitPaste crates.

/// Default API port for LimitPaste.
pub const DEFAULT_PORT: u16 = 3000;

/// Default maximum request body accepted by the API layer.
pub const DEFAULT_MAX_PASTE_SIZE: usize = 10 * 1024 * 1024;

/// Default interval between housekeeping sweeps, in seconds.
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 5 * 60;

/// Request header carrying the simulated "now" in unix milliseconds.
///
/// Only honored when the server runs with `TEST_MODE` enabled.
pub const TEST_NOW_HEADER: &str = "x-test-now-ms";

/// Path segment used when building shareable paste URLs.
pub const SHARE_PATH_PREFIX: &str = "/p/";

/// Uniform client-facing message for missing, expired or exhausted pastes.
pub const PASTE_UNAVAILABLE_MESSAGE: &str = "Paste not found or unavailable";

/// Upper bound on id generation attempts before giving up on a create.
pub const MAX_ID_ATTEMPTS: usize = 8;
