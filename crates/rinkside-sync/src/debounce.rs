//! Trailing-edge write coalescing for the host.
//!
//! Every engine change produces a [`SharedGameUpdate`]. Writing each one
//! would flood the store while the clock runs, so updates are merged field
//! by field (newest wins) and flushed once no new update has arrived for
//! the debounce window. The flush stamps `updatedAt`.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rinkside_types::{GameCode, SharedGameUpdate};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::store::SharedStore;

/// Default debounce window.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(100);

/// Pending writes awaiting their flush deadline.
#[derive(Debug)]
struct Pending {
    update: SharedGameUpdate,
    deadline: Instant,
}

/// Spawn the debouncer for `code`.
///
/// Runs until the update channel closes or the task is aborted. A closed
/// channel flushes whatever is pending first; an abort discards it.
pub fn spawn_debouncer(
    store: Arc<dyn SharedStore>,
    code: GameCode,
    mut updates: broadcast::Receiver<SharedGameUpdate>,
    window: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut pending: Option<Pending> = None;
        loop {
            let received = match &pending {
                Some(p) => {
                    tokio::select! {
                        r = updates.recv() => Some(r),
                        () = tokio::time::sleep_until(p.deadline) => None,
                    }
                }
                None => Some(updates.recv().await),
            };

            match received {
                Some(Ok(update)) => {
                    let now = Instant::now();
                    let deadline = now.checked_add(window).unwrap_or(now);
                    let mut merged = pending.take().map(|p| p.update).unwrap_or_default();
                    merged.merge(update);
                    pending = Some(Pending {
                        update: merged,
                        deadline,
                    });
                }
                Some(Err(RecvError::Lagged(skipped))) => {
                    warn!(code = %code, skipped, "Debouncer lagged; older updates dropped");
                }
                Some(Err(RecvError::Closed)) => {
                    if let Some(p) = pending.take() {
                        flush(store.as_ref(), &code, p.update).await;
                    }
                    break;
                }
                None => {
                    if let Some(p) = pending.take() {
                        flush(store.as_ref(), &code, p.update).await;
                    }
                }
            }
        }
        debug!(code = %code, "Debouncer stopped");
    })
}

async fn flush(store: &dyn SharedStore, code: &GameCode, mut update: SharedGameUpdate) {
    update.updated_at = Some(Utc::now().timestamp_millis());
    if let Err(e) = store.update(code, &update).await {
        warn!(code = %code, error = %e, "Failed to publish game update");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rinkside_core::GameEngine;

    use super::*;
    use crate::memory::MemoryStore;

    const TTL: Duration = Duration::from_secs(30);

    async fn hosted() -> (Arc<MemoryStore>, GameCode) {
        let store = Arc::new(MemoryStore::new());
        let code = GameCode::parse("HKY234").unwrap();
        let record = GameEngine::default().shared_record("host", 0);
        store.put(&code, &record, TTL).await.unwrap();
        (store, code)
    }

    fn period(p: u32) -> SharedGameUpdate {
        SharedGameUpdate {
            period: Some(p),
            ..SharedGameUpdate::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn burst_collapses_into_one_write() {
        let (store, code) = hosted().await;
        let (tx, rx) = broadcast::channel(16);
        let task = spawn_debouncer(store.clone(), code.clone(), rx, DEFAULT_DEBOUNCE);

        tx.send(period(2)).unwrap();
        tokio::time::sleep(Duration::from_millis(40)).await;
        tx.send(SharedGameUpdate {
            time_remaining: Some(600),
            ..SharedGameUpdate::default()
        })
        .unwrap();
        tokio::time::sleep(Duration::from_millis(40)).await;
        tx.send(period(3)).unwrap();

        tokio::time::sleep(Duration::from_millis(90)).await;
        assert_eq!(store.write_count(), 1);

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(store.write_count(), 2);
        let record = store.get(&code).await.unwrap().unwrap();
        assert_eq!(record.period, 3);
        assert_eq!(record.time_remaining, 600);
        assert!(record.updated_at > 0);

        task.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn closing_the_channel_flushes_pending() {
        let (store, code) = hosted().await;
        let (tx, rx) = broadcast::channel(16);
        let task = spawn_debouncer(store.clone(), code.clone(), rx, DEFAULT_DEBOUNCE);

        tx.send(period(2)).unwrap();
        drop(tx);
        task.await.unwrap();

        assert_eq!(store.write_count(), 2);
        assert_eq!(store.get(&code).await.unwrap().unwrap().period, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn aborting_discards_pending() {
        let (store, code) = hosted().await;
        let (tx, rx) = broadcast::channel(16);
        let task = spawn_debouncer(store.clone(), code, rx, DEFAULT_DEBOUNCE);

        tx.send(period(2)).unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
        task.abort();
        let _ = task.await;
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(store.write_count(), 1);
    }
}
