//! The shared-store capability the bridge replicates through.
//!
//! A [`SharedStore`] holds one [`SharedGameRecord`] per game code, fans
//! writes out to subscribers, and expires records whose host stops sending
//! heartbeats. Writes are last-write-wins; there is a single writer per
//! code (the host).

use std::time::Duration;

use async_trait::async_trait;
use rinkside_types::{GameCode, SharedGameRecord, SharedGameUpdate};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::SyncError;

/// Buffer depth of a subscription's delivery channel.
pub const SUBSCRIPTION_BUFFER: usize = 64;

/// A change observed on a subscribed record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteChange {
    /// The record was written; carries the full record after the write.
    Updated(Box<SharedGameRecord>),
    /// The record was deleted or expired.
    Deleted,
}

/// A live subscription to one game code.
///
/// Changes arrive through [`Subscription::next`]. Dropping the
/// subscription, or calling [`Subscription::unsubscribe`], stops the
/// forwarding task before returning, so no change is delivered afterwards.
#[derive(Debug)]
pub struct Subscription {
    rx: mpsc::Receiver<RemoteChange>,
    task: Option<JoinHandle<()>>,
}

impl Subscription {
    /// Wrap a delivery channel and the task feeding it.
    pub const fn new(rx: mpsc::Receiver<RemoteChange>, task: JoinHandle<()>) -> Self {
        Self {
            rx,
            task: Some(task),
        }
    }

    /// Wait for the next change. `None` once the feed has ended.
    pub async fn next(&mut self) -> Option<RemoteChange> {
        self.rx.recv().await
    }

    /// Stop the feed and discard anything still buffered.
    pub fn unsubscribe(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.rx.close();
        while self.rx.try_recv().is_ok() {}
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Remote key-value store with per-key change notification.
#[async_trait]
pub trait SharedStore: Send + Sync {
    /// Create or overwrite the record under `code`, expiring after `ttl`
    /// unless refreshed by [`SharedStore::heartbeat`].
    async fn put(
        &self,
        code: &GameCode,
        record: &SharedGameRecord,
        ttl: Duration,
    ) -> Result<(), SyncError>;

    /// Apply a partial write to an existing record.
    ///
    /// Returns [`SyncError::NotFound`] if the record is gone.
    async fn update(&self, code: &GameCode, update: &SharedGameUpdate) -> Result<(), SyncError>;

    /// Read the record, with `viewer_count` filled in.
    async fn get(&self, code: &GameCode) -> Result<Option<SharedGameRecord>, SyncError>;

    /// Whether a live record exists under `code`.
    async fn exists(&self, code: &GameCode) -> Result<bool, SyncError>;

    /// Remove the record and notify subscribers.
    async fn delete(&self, code: &GameCode) -> Result<(), SyncError>;

    /// Subscribe to every later write or deletion of `code`.
    async fn subscribe(&self, code: &GameCode) -> Result<Subscription, SyncError>;

    /// Extend the record's lifetime to `ttl` from now.
    async fn heartbeat(&self, code: &GameCode, ttl: Duration) -> Result<(), SyncError>;

    /// Register a viewer under `code`; returns the new viewer count.
    async fn register_viewer(&self, code: &GameCode, viewer_id: &str) -> Result<u32, SyncError>;

    /// Remove a viewer registration; returns the new viewer count.
    async fn remove_viewer(&self, code: &GameCode, viewer_id: &str) -> Result<u32, SyncError>;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unsubscribe_discards_buffered_changes() {
        let (tx, rx) = mpsc::channel(SUBSCRIPTION_BUFFER);
        let task = tokio::spawn(std::future::pending::<()>());
        let mut sub = Subscription::new(rx, task);

        tx.send(RemoteChange::Deleted).await.unwrap();
        assert_eq!(sub.next().await, Some(RemoteChange::Deleted));

        tx.send(RemoteChange::Deleted).await.unwrap();
        sub.stop();
        assert_eq!(sub.next().await, None);
        assert!(tx.send(RemoteChange::Deleted).await.is_err());
    }
}
