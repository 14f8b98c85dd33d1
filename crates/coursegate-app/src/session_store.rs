//! Background sweeping of the in-memory session store.
//!
//! `MemoryStore` only drops a session when it is destroyed or when
//! `cleanup` runs, so expired sessions are swept on a fixed interval.

use std::time::Duration;

use salvo::session::MemoryStore;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// ## Summary
/// Spawns a task that removes expired sessions from `store` every `every`.
///
/// `store` shares its map with the clone handed to the `SessionHandler`.
/// A zero interval disables sweeping.
#[must_use]
pub fn spawn_session_cleanup(store: MemoryStore, every: Duration) -> Option<JoinHandle<()>> {
    if every.is_zero() {
        tracing::warn!("Session cleanup interval is zero, expired sessions are kept");
        return None;
    }

    Some(tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if let Err(e) = store.cleanup().await {
                tracing::warn!(error = %e, "Session cleanup failed");
                continue;
            }
            let remaining = store.count().await;
            tracing::trace!(remaining, "Session store swept");
        }
    }))
}
