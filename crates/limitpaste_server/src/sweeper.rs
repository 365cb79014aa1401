//! Background housekeeping that removes pastes which can no longer be read.

use limitpaste_core::{AppError, Clock, Database};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Run one purge pass against `clock`'s current instant.
///
/// # Returns
/// Number of rows deleted.
///
/// # Errors
/// Propagates storage errors from the purge transaction.
pub fn sweep_once(db: &Database, clock: &dyn Clock) -> Result<usize, AppError> {
    let purged = db.pastes.purge_unavailable(clock.now())?;
    if purged > 0 {
        tracing::debug!("Purged {} unavailable paste(s)", purged);
    }
    Ok(purged)
}

/// Spawn the periodic sweeper on the current tokio runtime.
///
/// The task wakes every `interval` and stops once `shutdown` flips to `true`
/// or its sender is dropped. The first pass runs one full interval after
/// start-up.
///
/// # Returns
/// Join handle for the sweeper task.
pub fn spawn_sweeper(
    db: Arc<Database>,
    clock: Arc<dyn Clock>,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                    continue;
                }
            }

            let db = db.clone();
            let clock = clock.clone();
            match tokio::task::spawn_blocking(move || sweep_once(&db, clock.as_ref())).await {
                Ok(Ok(_)) => {}
                Ok(Err(err)) => tracing::warn!("Failed to purge unavailable pastes: {}", err),
                Err(err) => tracing::error!("Sweeper task panicked: {}", err),
            }
        }
        tracing::debug!("Sweeper stopped");
    })
}
