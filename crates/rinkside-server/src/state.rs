//! Shared application state for the scoreboard server.
//!
//! [`AppState`] owns the engine handle, the [`Committer`] that saves and
//! broadcasts after every change, and the optional sync bridge. Every
//! path that mutates the engine (REST handlers, the clock driver, the
//! viewer loop) ends in a commit while still holding the engine lock, so
//! pushed views always follow mutation order and the saver only ever
//! writes a newer state over an older one.

use std::sync::Arc;

use rinkside_core::{GameEngine, SharedEngine, StateStore};
use rinkside_sync::SyncBridge;
use rinkside_types::{GameView, PersistedState, SyncMode};
use tokio::sync::{broadcast, watch};
use tracing::{debug, warn};

use crate::error::ApiError;

/// Capacity of the broadcast channel for game views.
///
/// A `WebSocket` client that falls further behind skips to the newest view.
const BROADCAST_CAPACITY: usize = 256;

/// Message returned when an operator command reaches a viewer.
pub const VIEWER_READ_ONLY: &str = "Viewing a shared game is read-only; disconnect to take control";

/// Latest state waiting for the saver task.
#[derive(Default)]
struct PendingSave {
    generation: u64,
    state: Option<Arc<PersistedState>>,
}

/// Saves the engine and pushes its view to connected clients.
///
/// Saving happens on a background task that always writes the newest
/// committed state, so a commit never waits on disk. States committed
/// faster than they can be written are coalesced.
#[derive(Clone)]
pub struct Committer {
    tx: broadcast::Sender<GameView>,
    pending: Arc<watch::Sender<PendingSave>>,
    saved: watch::Receiver<u64>,
}

impl Committer {
    /// Create a committer writing through `store`.
    ///
    /// Spawns the saver task, so this must run inside a tokio runtime.
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        let (pending, pending_rx) = watch::channel(PendingSave::default());
        let (saved_tx, saved) = watch::channel(0);
        tokio::spawn(run_saver(store, pending_rx, saved_tx));
        Self {
            tx,
            pending: Arc::new(pending),
            saved,
        }
    }

    /// Queue the engine for saving and broadcast its view.
    ///
    /// Returns the number of `WebSocket` clients that received the view.
    pub fn commit(&self, engine: &GameEngine) -> usize {
        let state = Arc::new(engine.persisted_state());
        self.pending.send_modify(|pending| {
            pending.generation = pending.generation.wrapping_add(1);
            pending.state = Some(state);
        });
        // send returns Err only when no WebSocket client is connected.
        let receivers = self.tx.send(engine.view()).unwrap_or(0);
        debug!(receivers, "Game view broadcast");
        receivers
    }

    /// Wait until everything committed so far has been written.
    pub async fn flushed(&self) {
        let target = self.pending.borrow().generation;
        let mut saved = self.saved.clone();
        if saved.wait_for(|generation| *generation >= target).await.is_err() {
            warn!("Saver stopped before the last commit was written");
        }
    }

    /// Subscribe to committed views.
    pub fn subscribe(&self) -> broadcast::Receiver<GameView> {
        self.tx.subscribe()
    }
}

/// Write each newest pending state until every committer is dropped.
/// A failed save is logged; the in-memory game carries on.
async fn run_saver(
    store: Arc<dyn StateStore>,
    mut pending: watch::Receiver<PendingSave>,
    saved: watch::Sender<u64>,
) {
    while pending.changed().await.is_ok() {
        let (generation, state) = {
            let latest = pending.borrow_and_update();
            (latest.generation, latest.state.clone())
        };
        let Some(state) = state else {
            continue;
        };
        let store = Arc::clone(&store);
        match tokio::task::spawn_blocking(move || store.save(&state)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!(error = %e, "Failed to save game state"),
            Err(e) => warn!(error = %e, "Save task failed"),
        }
        saved.send_replace(generation);
    }
    debug!("Saver stopped");
}

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// The single authoritative engine.
    pub engine: SharedEngine,
    /// Save-and-broadcast sink.
    pub committer: Committer,
    /// Sync bridge, present when sharing is configured.
    pub bridge: Option<Arc<SyncBridge>>,
}

impl AppState {
    /// Create local-only application state.
    pub const fn new(engine: SharedEngine, committer: Committer) -> Self {
        Self {
            engine,
            committer,
            bridge: None,
        }
    }

    /// Attach a sync bridge.
    #[must_use]
    pub fn with_bridge(mut self, bridge: Arc<SyncBridge>) -> Self {
        self.bridge = Some(bridge);
        self
    }

    /// Save, broadcast, and (when hosting) publish the engine.
    pub fn commit(&self, engine: &GameEngine) {
        self.committer.commit(engine);
        if let Some(bridge) = self.bridge.as_ref().filter(|b| b.is_publishing()) {
            bridge.publish(engine.shared_update());
        }
    }

    /// Subscribe to committed views.
    pub fn subscribe(&self) -> broadcast::Receiver<GameView> {
        self.committer.subscribe()
    }

    /// Current sync role; local when no bridge is attached.
    pub async fn sync_mode(&self) -> SyncMode {
        match &self.bridge {
            Some(bridge) => bridge.mode().await,
            None => SyncMode::Local,
        }
    }

    /// Reject operator mutations while mirroring a host.
    ///
    /// Must be called before taking the engine lock.
    pub async fn ensure_operator(&self) -> Result<(), ApiError> {
        if self.sync_mode().await == SyncMode::Viewer {
            return Err(ApiError::Conflict(VIEWER_READ_ONLY.to_owned()));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use rinkside_core::{MemoryStateStore, PersistError};
    use rinkside_types::TeamSide;

    use super::*;

    /// Counts saves and always fails them.
    #[derive(Default)]
    struct BrokenStore {
        attempts: AtomicUsize,
    }

    impl StateStore for BrokenStore {
        fn load(&self) -> Result<Option<PersistedState>, PersistError> {
            Ok(None)
        }

        fn save(&self, _state: &PersistedState) -> Result<(), PersistError> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            Err(PersistError::Io {
                path: "broken.json".into(),
                source: std::io::Error::other("disk full"),
            })
        }

        fn clear(&self) -> Result<(), PersistError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn flushed_sees_the_newest_commit() {
        let store = Arc::new(MemoryStateStore::new());
        let committer = Committer::new(store.clone());
        let mut engine = GameEngine::default();
        for _ in 0..3 {
            engine.add_goal(TeamSide::Home);
            committer.commit(&engine);
        }

        committer.flushed().await;
        assert_eq!(store.load().unwrap().unwrap().home.score, 3);
    }

    #[tokio::test]
    async fn failed_save_still_broadcasts() {
        let store = Arc::new(BrokenStore::default());
        let committer = Committer::new(store.clone());
        let mut views = committer.subscribe();
        let mut engine = GameEngine::default();
        engine.add_goal(TeamSide::Away);

        assert_eq!(committer.commit(&engine), 1);
        committer.flushed().await;
        assert_eq!(views.recv().await.unwrap().away.score, 1);
        assert!(store.attempts.load(Ordering::SeqCst) >= 1);
    }
}
