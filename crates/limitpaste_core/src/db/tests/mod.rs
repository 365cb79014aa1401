//! Database integration tests.

use super::*;
use crate::models::paste::*;
use crate::test_support::{base_instant, setup_temp_db};
use chrono::Duration;
use std::sync::{Arc, Barrier};
use std::thread;

fn setup_test_db() -> (Database, tempfile::TempDir) {
    setup_temp_db()
}

fn limited_draft(content: &str, max_views: Option<u32>) -> NewPaste {
    NewPaste {
        content: content.to_string(),
        created_at: base_instant(),
        expires_at: None,
        max_views,
    }
}

mod basic_ops;
mod concurrency;
