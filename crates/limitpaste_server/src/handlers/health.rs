//! Liveness probe handler.

use crate::AppState;
use axum::{extract::State, Json};
use limitpaste_core::models::paste::{DbState, HealthResponse};

/// Report process liveness and store connectivity.
///
/// Always answers 200; a failing store shows up as `dbState: "disconnected"`.
pub async fn healthz(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_state = match state.db.ping() {
        Ok(()) => DbState::Connected,
        Err(err) => {
            tracing::warn!("Health check could not reach the database: {}", err);
            DbState::Disconnected
        }
    };
    Json(HealthResponse { ok: true, db_state })
}
