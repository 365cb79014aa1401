//! Configuration loading from environment variables.

use crate::constants::{DEFAULT_MAX_PASTE_SIZE, DEFAULT_PORT, DEFAULT_SWEEP_INTERVAL_SECS};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Runtime configuration for LimitPaste.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub db_path: String,
    pub port: u16,
    pub max_paste_size: usize,
    /// Base URL used for share links; falls back to the request `Host` when unset.
    pub public_url: Option<String>,
    /// Honor the simulated-clock request header for expiry checks.
    pub test_mode: bool,
    /// Seconds between housekeeping sweeps; `0` disables the sweeper.
    pub sweep_interval_secs: u64,
}

/// Expand tilde (~) in paths to the user's home directory
fn expand_tilde(path: String) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = resolve_home_dir() {
            return home.join(rest).to_string_lossy().to_string();
        }
    }
    path
}

fn resolve_home_dir() -> Option<PathBuf> {
    if let Ok(home) = env::var("HOME") {
        if !home.trim().is_empty() {
            return Some(PathBuf::from(home));
        }
    }

    // Windows
    if let Ok(profile) = env::var("USERPROFILE") {
        if !profile.trim().is_empty() {
            return Some(PathBuf::from(profile));
        }
    }

    std::env::current_dir().ok()
}

/// Parse a boolean-like environment flag value.
///
/// # Supported Values
/// - Truthy: `1`, `true`, `yes`, `on`
/// - Falsy: `0`, `false`, `no`, `off`, empty string
///
/// Matching is case-insensitive and ignores surrounding whitespace.
///
/// # Returns
/// `Some(bool)` when the value is recognized, otherwise `None`.
pub fn parse_env_flag(value: &str) -> Option<bool> {
    let normalized = value.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Read a boolean flag from the environment.
///
/// Missing or unrecognized values are treated as `false`.
pub fn env_flag_enabled(name: &str) -> bool {
    env::var(name)
        .ok()
        .and_then(|value| parse_env_flag(&value))
        .unwrap_or(false)
}

fn normalize_public_url(raw: String) -> Option<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Returns
    /// A populated [`Config`] with defaults applied when env vars are missing.
    pub fn from_env() -> Self {
        Self {
            db_path: env::var("DB_PATH").map(expand_tilde).unwrap_or_else(|_| {
                let home = resolve_home_dir().unwrap_or_else(|| PathBuf::from("."));
                let data_dir = home.join(".cache").join("limitpaste");
                data_dir.join("db").to_string_lossy().to_string()
            }),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            max_paste_size: env::var("MAX_PASTE_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_MAX_PASTE_SIZE),
            public_url: env::var("PUBLIC_URL").ok().and_then(normalize_public_url),
            test_mode: env_flag_enabled("TEST_MODE"),
            sweep_interval_secs: env::var("SWEEP_INTERVAL_SECS")
                .ok()
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(DEFAULT_SWEEP_INTERVAL_SECS),
        }
    }

    /// Interval between housekeeping sweeps.
    ///
    /// Sweeps run on the real clock, so they stay off in test mode where
    /// reads may be dated before real expiry.
    ///
    /// # Returns
    /// `None` when the sweeper is disabled.
    pub fn sweep_interval(&self) -> Option<Duration> {
        (!self.test_mode && self.sweep_interval_secs > 0)
            .then(|| Duration::from_secs(self.sweep_interval_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_env_flag, Config};
    use crate::constants::{DEFAULT_PORT, DEFAULT_SWEEP_INTERVAL_SECS};
    use crate::test_support::{env_lock, EnvGuard};

    #[test]
    fn parse_env_flag_accepts_truthy_values() {
        for value in ["1", "true", "TRUE", " yes ", "on"] {
            assert_eq!(parse_env_flag(value), Some(true), "value: {}", value);
        }
    }

    #[test]
    fn parse_env_flag_accepts_falsy_values() {
        for value in ["", "0", "false", "FALSE", " no ", "off"] {
            assert_eq!(parse_env_flag(value), Some(false), "value: {}", value);
        }
    }

    #[test]
    fn parse_env_flag_rejects_unknown_values() {
        assert_eq!(parse_env_flag("maybe"), None);
        assert_eq!(parse_env_flag("enabled"), None);
    }

    #[test]
    fn from_env_applies_defaults() {
        let _lock = env_lock().lock().expect("env lock");
        let _port = EnvGuard::remove("PORT");
        let _public = EnvGuard::remove("PUBLIC_URL");
        let _test_mode = EnvGuard::remove("TEST_MODE");
        let _sweep = EnvGuard::remove("SWEEP_INTERVAL_SECS");

        let config = Config::from_env();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.public_url, None);
        assert!(!config.test_mode);
        assert_eq!(config.sweep_interval_secs, DEFAULT_SWEEP_INTERVAL_SECS);
        assert!(config.sweep_interval().is_some());
    }

    #[test]
    fn from_env_reads_overrides() {
        let _lock = env_lock().lock().expect("env lock");
        let _port = EnvGuard::set("PORT", "4100");
        let _public = EnvGuard::set("PUBLIC_URL", " https://paste.example.com/ ");
        let _test_mode = EnvGuard::set("TEST_MODE", "1");
        let _sweep = EnvGuard::set("SWEEP_INTERVAL_SECS", "0");

        let config = Config::from_env();
        assert_eq!(config.port, 4100);
        assert_eq!(
            config.public_url.as_deref(),
            Some("https://paste.example.com")
        );
        assert!(config.test_mode);
        assert!(config.sweep_interval().is_none());
    }

    #[test]
    fn test_mode_disables_sweeper() {
        let _lock = env_lock().lock().expect("env lock");
        let _test_mode = EnvGuard::set("TEST_MODE", "true");
        let _sweep = EnvGuard::set("SWEEP_INTERVAL_SECS", "30");

        let config = Config::from_env();
        assert_eq!(config.sweep_interval_secs, 30);
        assert!(config.sweep_interval().is_none());

        let live = Config {
            test_mode: false,
            ..config
        };
        assert_eq!(live.sweep_interval(), Some(std::time::Duration::from_secs(30)));
    }

    #[test]
    fn blank_public_url_is_treated_as_unset() {
        let _lock = env_lock().lock().expect("env lock");
        let _public = EnvGuard::set("PUBLIC_URL", "   ");
        assert_eq!(Config::from_env().public_url, None);
    }
}
