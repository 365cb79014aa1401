//! Time sources for paste creation and expiry evaluation.
//!
//! Creation timestamps and expiry checks read from two separate objects. The
//! [`ExpiryClock`] may be steered by a request-supplied instant in test mode;
//! creation always reads a plain [`Clock`] that has no override hook.

use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::{Arc, Mutex};

/// Source of the current instant.
pub trait Clock: Send + Sync {
    /// Current instant according to this clock.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock backed by [`Utc::now`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock for deterministic tests.
#[derive(Debug)]
pub struct FixedClock {
    instant: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    /// Create a clock frozen at `instant`.
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self {
            instant: Mutex::new(instant),
        }
    }

    /// Move the clock to `instant`.
    pub fn set(&self, instant: DateTime<Utc>) {
        *self.lock() = instant;
    }

    /// Move the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        let mut guard = self.lock();
        *guard = *guard + by;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, DateTime<Utc>> {
        // A poisoned clock still holds a valid instant.
        self.instant
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.lock()
    }
}

/// Clock used for availability checks on read.
///
/// Resolves to the caller-supplied override only when test mode is enabled.
#[derive(Clone)]
pub struct ExpiryClock {
    base: Arc<dyn Clock>,
    test_mode: bool,
}

impl ExpiryClock {
    /// Build an expiry clock over `base`.
    ///
    /// # Arguments
    /// - `base`: Clock used whenever no override applies.
    /// - `test_mode`: Whether request overrides are honored at all.
    pub fn new(base: Arc<dyn Clock>, test_mode: bool) -> Self {
        Self { base, test_mode }
    }

    /// Whether request overrides are honored.
    pub fn test_mode(&self) -> bool {
        self.test_mode
    }

    /// Resolve the instant to evaluate expiry against.
    ///
    /// # Arguments
    /// - `override_ms`: Simulated "now" in unix milliseconds, if the caller sent one.
    ///
    /// # Returns
    /// The override instant in test mode when it is representable, otherwise
    /// the base clock's current instant.
    pub fn resolve(&self, override_ms: Option<i64>) -> DateTime<Utc> {
        if self.test_mode {
            if let Some(instant) = override_ms.and_then(|ms| Utc.timestamp_millis_opt(ms).single())
            {
                return instant;
            }
        }
        self.base.now()
    }
}

impl std::fmt::Debug for ExpiryClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpiryClock")
            .field("test_mode", &self.test_mode)
            .finish_non_exhaustive()
    }
}

/// Parse a simulated-clock header value.
///
/// Leading whitespace is skipped and an optional sign plus the leading run of
/// decimal digits is read; anything after the digits is ignored
/// (`"12.5"` reads as `12`).
///
/// # Returns
/// Unix milliseconds, or `None` when no digits lead the value or the number
/// does not fit in an `i64`.
pub fn parse_test_now_ms(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let sign_len = usize::from(trimmed.starts_with(|c: char| c == '+' || c == '-'));
    let digits = trimmed[sign_len..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits == 0 {
        return None;
    }
    trimmed[..sign_len + digits].parse().ok()
}
