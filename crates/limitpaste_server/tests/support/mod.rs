//! Shared integration-test server bootstrap helpers.

use axum_test::TestServer;
use chrono::{DateTime, TimeZone, Utc};
use limitpaste_server::{create_app, AppState, Config, Database, FixedClock};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

pub(crate) fn start_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 14, 15, 9, 26)
        .single()
        .expect("valid instant")
}

pub(crate) fn test_config_for_db_path(db_path: &Path) -> Config {
    Config {
        port: 0,
        db_path: db_path.to_str().expect("db path").to_string(),
        max_paste_size: 64 * 1024,
        public_url: Some("https://paste.test".to_string()),
        test_mode: true,
        sweep_interval_secs: 0,
    }
}

/// Build a server whose creation and fallback expiry clocks share one
/// [`FixedClock`], so tests can move "real" time explicitly.
pub(crate) fn test_server_for_config(config: Config) -> (TestServer, Arc<FixedClock>) {
    let db = Database::new(config.db_path.as_str()).expect("open db");
    let clock = Arc::new(FixedClock::new(start_instant()));
    let state = AppState::with_clocks(config, db, clock.clone(), clock.clone());
    let app = create_app(state, false);
    let server = TestServer::new(app).expect("server");
    (server, clock)
}

pub(crate) fn setup_test_server() -> (TestServer, TempDir, Arc<FixedClock>) {
    let temp_dir = TempDir::new().expect("temp dir");
    let db_path = temp_dir.path().join("test.db");
    let config = test_config_for_db_path(&db_path);
    let (server, clock) = test_server_for_config(config);
    (server, temp_dir, clock)
}
