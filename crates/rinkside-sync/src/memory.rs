//! In-process [`SharedStore`] for tests and single-node setups.
//!
//! Records live in a map behind a tokio mutex; each code gets a broadcast
//! channel that subscriptions forward from. Expiry is checked lazily on
//! every access, so a record whose heartbeat lapsed disappears (and its
//! subscribers see [`RemoteChange::Deleted`]) the next time anyone looks.
//! Deleting or expiring a record also drops its channel, ending every feed
//! on that code.

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use rinkside_types::{GameCode, SharedGameRecord, SharedGameUpdate};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{Mutex, broadcast, mpsc};
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::error::SyncError;
use crate::store::{RemoteChange, SUBSCRIPTION_BUFFER, SharedStore, Subscription};

struct Entry {
    record: SharedGameRecord,
    viewers: BTreeSet<String>,
    expires_at: Instant,
}

impl Entry {
    fn snapshot(&self) -> SharedGameRecord {
        let mut record = self.record.clone();
        record.viewer_count = self.viewer_count();
        record
    }

    fn viewer_count(&self) -> u32 {
        u32::try_from(self.viewers.len()).unwrap_or(u32::MAX)
    }
}

#[derive(Default)]
struct Inner {
    entries: HashMap<GameCode, Entry>,
    channels: HashMap<GameCode, broadcast::Sender<RemoteChange>>,
}

impl Inner {
    fn notify(&self, code: &GameCode, change: RemoteChange) {
        if let Some(tx) = self.channels.get(code) {
            // No receivers is fine.
            let _ = tx.send(change);
        }
    }

    /// Tell subscribers `code` is gone and drop its channel, ending their
    /// feeds.
    fn close(&mut self, code: &GameCode) {
        if let Some(tx) = self.channels.remove(code) {
            let _ = tx.send(RemoteChange::Deleted);
        }
    }

    fn notify_updated(&self, code: &GameCode) {
        if let Some(entry) = self.entries.get(code) {
            self.notify(code, RemoteChange::Updated(Box::new(entry.snapshot())));
        }
    }

    /// Drop `code` if its lifetime has lapsed. Returns the live entry.
    fn live(&mut self, code: &GameCode) -> Option<&mut Entry> {
        let expired = self
            .entries
            .get(code)
            .is_some_and(|entry| entry.expires_at <= Instant::now());
        if expired {
            self.entries.remove(code);
            debug!(code = %code, "Shared game expired");
            self.close(code);
        }
        self.entries.get_mut(code)
    }
}

fn deadline(ttl: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(ttl).unwrap_or(now)
}

/// A [`SharedStore`] held entirely in process memory.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
    writes: AtomicU64,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `put` and `update` calls served so far.
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }

    fn count_write(&self) {
        self.writes.fetch_add(1, Ordering::Relaxed);
    }
}

#[async_trait]
impl SharedStore for MemoryStore {
    async fn put(
        &self,
        code: &GameCode,
        record: &SharedGameRecord,
        ttl: Duration,
    ) -> Result<(), SyncError> {
        self.count_write();
        let mut inner = self.inner.lock().await;
        let viewers = inner
            .live(code)
            .map(|entry| std::mem::take(&mut entry.viewers))
            .unwrap_or_default();
        inner.entries.insert(
            code.clone(),
            Entry {
                record: record.clone(),
                viewers,
                expires_at: deadline(ttl),
            },
        );
        inner.notify_updated(code);
        Ok(())
    }

    async fn update(&self, code: &GameCode, update: &SharedGameUpdate) -> Result<(), SyncError> {
        self.count_write();
        let mut inner = self.inner.lock().await;
        let entry = inner
            .live(code)
            .ok_or_else(|| SyncError::NotFound(code.to_string()))?;
        update.apply_to(&mut entry.record);
        inner.notify_updated(code);
        Ok(())
    }

    async fn get(&self, code: &GameCode) -> Result<Option<SharedGameRecord>, SyncError> {
        let mut inner = self.inner.lock().await;
        Ok(inner.live(code).map(|entry| entry.snapshot()))
    }

    async fn exists(&self, code: &GameCode) -> Result<bool, SyncError> {
        let mut inner = self.inner.lock().await;
        Ok(inner.live(code).is_some())
    }

    async fn delete(&self, code: &GameCode) -> Result<(), SyncError> {
        let mut inner = self.inner.lock().await;
        inner.entries.remove(code);
        inner.close(code);
        Ok(())
    }

    async fn subscribe(&self, code: &GameCode) -> Result<Subscription, SyncError> {
        let mut feed = {
            let mut inner = self.inner.lock().await;
            inner
                .channels
                .entry(code.clone())
                .or_insert_with(|| broadcast::channel(SUBSCRIPTION_BUFFER).0)
                .subscribe()
        };

        let (tx, rx) = mpsc::channel(SUBSCRIPTION_BUFFER);
        let task = tokio::spawn(async move {
            loop {
                match feed.recv().await {
                    Ok(change) => {
                        if tx.send(change).await.is_err() {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Subscription lagged behind shared store");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });
        Ok(Subscription::new(rx, task))
    }

    async fn heartbeat(&self, code: &GameCode, ttl: Duration) -> Result<(), SyncError> {
        let mut inner = self.inner.lock().await;
        let entry = inner
            .live(code)
            .ok_or_else(|| SyncError::NotFound(code.to_string()))?;
        entry.expires_at = deadline(ttl);
        Ok(())
    }

    async fn register_viewer(&self, code: &GameCode, viewer_id: &str) -> Result<u32, SyncError> {
        let mut inner = self.inner.lock().await;
        let entry = inner
            .live(code)
            .ok_or_else(|| SyncError::NotFound(code.to_string()))?;
        entry.viewers.insert(viewer_id.to_owned());
        let count = entry.viewer_count();
        inner.notify_updated(code);
        Ok(count)
    }

    async fn remove_viewer(&self, code: &GameCode, viewer_id: &str) -> Result<u32, SyncError> {
        let mut inner = self.inner.lock().await;
        let Some(entry) = inner.live(code) else {
            return Ok(0);
        };
        let removed = entry.viewers.remove(viewer_id);
        let count = entry.viewer_count();
        if removed {
            inner.notify_updated(code);
        }
        Ok(count)
    }
}
