//! Host and viewer sessions over a [`SharedStore`].
//!
//! A [`SyncBridge`] is in one of three modes:
//!
//! - **Local**: nothing is shared; [`SyncBridge::publish`] is a no-op.
//! - **Host**: the engine is published under a fresh [`GameCode`]. Engine
//!   changes go through the debouncer, and a heartbeat keeps the record
//!   alive and refreshes the viewer count.
//! - **Viewer**: a hosted record is mirrored into the local engine. Each
//!   incoming record overwrites teams, clock, penalties, and events in one
//!   lock acquisition, bypassing history. When the record disappears the
//!   bridge drops back to local mode with "Game ended by host".
//!
//! Lock order is session, then engine. Nothing holds the engine lock while
//! waiting on the session.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rinkside_core::config::SyncConfig;
use rinkside_core::{GameEngine, SharedEngine};
use rinkside_types::{GameCode, SharedGameUpdate, SyncMode, SyncStatus, SyncStatusView};
use tokio::sync::{Mutex, broadcast};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::debounce::{DEFAULT_DEBOUNCE, spawn_debouncer};
use crate::error::SyncError;
use crate::store::{RemoteChange, SharedStore, Subscription};

/// Message shown to a viewer whose host ended the game.
pub const GAME_ENDED_MESSAGE: &str = "Game ended by host";

/// Attempts at drawing an unused game code before giving up.
const CODE_ATTEMPTS: usize = 5;

/// Capacity of the host's update channel.
const UPDATE_BUFFER: usize = 64;

/// Timing and link settings for a [`SyncBridge`].
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Quiet period before pending updates are written.
    pub debounce: Duration,
    /// Lifetime of a hosted record without a heartbeat.
    pub presence_ttl: Duration,
    /// Interval between host heartbeats and viewer existence checks.
    pub heartbeat_interval: Duration,
    /// Base URL share links are built from.
    pub share_base_url: String,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            presence_ttl: Duration::from_secs(30),
            heartbeat_interval: Duration::from_secs(10),
            share_base_url: "http://localhost:3000/".to_owned(),
        }
    }
}

impl SyncOptions {
    /// Build options from the `sync` configuration section.
    pub fn from_config(config: &SyncConfig) -> Self {
        Self {
            debounce: Duration::from_millis(config.debounce_ms),
            presence_ttl: Duration::from_secs(config.presence_ttl_secs),
            heartbeat_interval: Duration::from_secs(config.heartbeat_interval_secs.max(1)),
            share_base_url: config.share_base_url.clone(),
        }
    }
}

/// Notified when the viewer loop changes the engine.
///
/// Called with the engine lock held, so implementations must not block.
pub trait RemoteApplyCallback: Send + Sync {
    /// A host record was applied to `engine`.
    fn on_remote_applied(&self, engine: &GameEngine);

    /// The hosted game went away and the bridge is local again.
    fn on_game_ended(&self);
}

/// A remote-apply callback that does nothing.
pub struct NoOpRemoteCallback;

impl RemoteApplyCallback for NoOpRemoteCallback {
    fn on_remote_applied(&self, _engine: &GameEngine) {}
    fn on_game_ended(&self) {}
}

#[derive(Debug, Default)]
struct Session {
    mode: SyncMode,
    status: SyncStatus,
    code: Option<GameCode>,
    client_id: Option<String>,
    viewer_count: u32,
    error: Option<String>,
    tasks: Vec<JoinHandle<()>>,
}

impl Session {
    fn fail(&mut self, error: &SyncError) {
        self.status = SyncStatus::Error;
        self.error = Some(error.to_string());
    }

    fn end_game(&mut self) {
        // The viewer loop calling this is itself in `tasks`; dropping the
        // handles detaches rather than aborts.
        *self = Self {
            error: Some(GAME_ENDED_MESSAGE.to_owned()),
            ..Self::default()
        };
    }
}

/// Replicates one engine to or from a shared store.
pub struct SyncBridge {
    store: Arc<dyn SharedStore>,
    engine: SharedEngine,
    options: SyncOptions,
    callback: Arc<dyn RemoteApplyCallback>,
    updates: broadcast::Sender<SharedGameUpdate>,
    session: Arc<Mutex<Session>>,
}

impl SyncBridge {
    /// Create a bridge in local mode.
    pub fn new(store: Arc<dyn SharedStore>, engine: SharedEngine, options: SyncOptions) -> Self {
        let (updates, _) = broadcast::channel(UPDATE_BUFFER);
        Self {
            store,
            engine,
            options,
            callback: Arc::new(NoOpRemoteCallback),
            updates,
            session: Arc::new(Mutex::new(Session::default())),
        }
    }

    /// Set the callback the viewer loop reports to.
    #[must_use]
    pub fn with_callback(mut self, callback: Arc<dyn RemoteApplyCallback>) -> Self {
        self.callback = callback;
        self
    }

    /// Current role.
    pub async fn mode(&self) -> SyncMode {
        self.session.lock().await.mode
    }

    /// Snapshot of the session for display.
    pub async fn status(&self) -> SyncStatusView {
        let session = self.session.lock().await;
        SyncStatusView {
            mode: session.mode,
            status: session.status,
            game_code: session.code.clone(),
            viewer_count: session.viewer_count,
            error: session.error.clone(),
            share_url: session
                .code
                .as_ref()
                .map(|code| code.share_url(&self.options.share_base_url)),
        }
    }

    /// Whether [`SyncBridge::publish`] currently feeds a host session.
    pub fn is_publishing(&self) -> bool {
        self.updates.receiver_count() > 0
    }

    /// Queue an engine change for the shared record.
    ///
    /// Never blocks; dropped silently unless hosting.
    pub fn publish(&self, update: SharedGameUpdate) {
        if self.updates.send(update).is_err() {
            debug!("Update dropped; not hosting");
        }
    }

    /// Start hosting the current engine state under a fresh code.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::AlreadyConnected`] unless local, or the store's
    /// error if the record cannot be created. Failures are also kept in
    /// the session status.
    pub async fn host(&self) -> Result<GameCode, SyncError> {
        let mut session = self.session.lock().await;
        if session.mode != SyncMode::Local {
            return Err(SyncError::AlreadyConnected(session.mode));
        }
        session.status = SyncStatus::Connecting;
        session.error = None;

        match self.start_hosting().await {
            Ok((code, host_id, tasks)) => {
                info!(code = %code, host_id = %host_id, "Hosting shared game");
                *session = Session {
                    mode: SyncMode::Host,
                    status: SyncStatus::Connected,
                    code: Some(code.clone()),
                    client_id: Some(host_id),
                    viewer_count: 0,
                    error: None,
                    tasks,
                };
                Ok(code)
            }
            Err(e) => {
                warn!(error = %e, "Failed to host game");
                session.fail(&e);
                Err(e)
            }
        }
    }

    async fn start_hosting(&self) -> Result<(GameCode, String, Vec<JoinHandle<()>>), SyncError> {
        let code = unused_code(self.store.as_ref(), GameCode::generate).await?;
        let host_id = Uuid::now_v7().to_string();
        let record = {
            let engine = self.engine.lock().await;
            engine.shared_record(&host_id, Utc::now().timestamp_millis())
        };
        self.store
            .put(&code, &record, self.options.presence_ttl)
            .await?;

        let debouncer = spawn_debouncer(
            Arc::clone(&self.store),
            code.clone(),
            self.updates.subscribe(),
            self.options.debounce,
        );
        let heartbeat = self.spawn_heartbeat(code.clone());
        Ok((code, host_id, vec![debouncer, heartbeat]))
    }

    fn spawn_heartbeat(&self, code: GameCode) -> JoinHandle<()> {
        let store = Arc::clone(&self.store);
        let session = Arc::clone(&self.session);
        let ttl = self.options.presence_ttl;
        let mut interval = tokio::time::interval(self.options.heartbeat_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tokio::spawn(async move {
            interval.tick().await;
            loop {
                interval.tick().await;
                if let Err(e) = store.heartbeat(&code, ttl).await {
                    warn!(code = %code, error = %e, "Heartbeat failed");
                    continue;
                }
                match store.get(&code).await {
                    Ok(Some(record)) => {
                        session.lock().await.viewer_count = record.viewer_count;
                    }
                    Ok(None) => {}
                    Err(e) => warn!(code = %code, error = %e, "Viewer count refresh failed"),
                }
            }
        })
    }

    /// Join a hosted game as a read-only viewer.
    ///
    /// The code is case-insensitive. The host's current record is applied
    /// before this returns.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::InvalidCode`] for a malformed code,
    /// [`SyncError::NotFound`] if no such game is live, or the store's
    /// error. Failures are also kept in the session status.
    pub async fn join(&self, code: &str) -> Result<(), SyncError> {
        let mut session = self.session.lock().await;
        if session.mode != SyncMode::Local {
            return Err(SyncError::AlreadyConnected(session.mode));
        }
        session.status = SyncStatus::Connecting;
        session.error = None;

        match self.start_viewing(code).await {
            Ok((code, viewer_id, viewer_count, task)) => {
                info!(code = %code, viewer_id = %viewer_id, "Joined shared game");
                *session = Session {
                    mode: SyncMode::Viewer,
                    status: SyncStatus::Connected,
                    code: Some(code),
                    client_id: Some(viewer_id),
                    viewer_count,
                    error: None,
                    tasks: vec![task],
                };
                Ok(())
            }
            Err(e) => {
                warn!(code, error = %e, "Failed to join game");
                session.fail(&e);
                Err(e)
            }
        }
    }

    async fn start_viewing(
        &self,
        raw: &str,
    ) -> Result<(GameCode, String, u32, JoinHandle<()>), SyncError> {
        let code = GameCode::parse(raw)?;
        if !self.store.exists(&code).await? {
            return Err(SyncError::NotFound(code.to_string()));
        }

        let viewer_id = Uuid::now_v7().to_string();
        let subscription = self.store.subscribe(&code).await?;
        let mut viewer_count = self.store.register_viewer(&code, &viewer_id).await?;

        let Some(record) = self.store.get(&code).await? else {
            let _ = self.store.remove_viewer(&code, &viewer_id).await;
            return Err(SyncError::NotFound(code.to_string()));
        };
        viewer_count = viewer_count.max(record.viewer_count);
        {
            let mut engine = self.engine.lock().await;
            engine.apply_remote(&record);
            self.callback.on_remote_applied(&engine);
        }

        let task = tokio::spawn(viewer_loop(ViewerLoop {
            store: Arc::clone(&self.store),
            engine: Arc::clone(&self.engine),
            session: Arc::clone(&self.session),
            callback: Arc::clone(&self.callback),
            code: code.clone(),
            subscription,
            poll: self.options.heartbeat_interval,
        }));
        Ok((code, viewer_id, viewer_count, task))
    }

    /// Leave the current session and return to local mode.
    ///
    /// Background tasks are stopped and awaited before the session is
    /// cleared, so no remote update is applied after this returns. A host
    /// also deletes its record; a viewer deregisters itself.
    pub async fn disconnect(&self) {
        let mut session = self.session.lock().await;
        let tasks = std::mem::take(&mut session.tasks);
        for task in &tasks {
            task.abort();
        }
        for task in tasks {
            let _ = task.await;
        }

        let mut error = None;
        if let Some(code) = session.code.take() {
            let result = match (session.mode, session.client_id.as_deref()) {
                (SyncMode::Host, _) => self.store.delete(&code).await,
                (SyncMode::Viewer, Some(viewer_id)) => {
                    self.store.remove_viewer(&code, viewer_id).await.map(drop)
                }
                _ => Ok(()),
            };
            if let Err(e) = result {
                warn!(code = %code, error = %e, "Failed to leave shared game cleanly");
                error = Some(e.to_string());
            }
            info!(code = %code, mode = ?session.mode, "Left shared game");
        }

        *session = Session {
            error,
            ..Session::default()
        };
    }
}

/// Draw codes until one is not live in `store`.
async fn unused_code<F>(store: &dyn SharedStore, mut draw: F) -> Result<GameCode, SyncError>
where
    F: FnMut() -> GameCode + Send,
{
    for _ in 0..CODE_ATTEMPTS {
        let code = draw();
        if !store.exists(&code).await? {
            return Ok(code);
        }
        debug!(code = %code, "Game code taken; drawing another");
    }
    Err(SyncError::CodesExhausted(CODE_ATTEMPTS))
}

struct ViewerLoop {
    store: Arc<dyn SharedStore>,
    engine: SharedEngine,
    session: Arc<Mutex<Session>>,
    callback: Arc<dyn RemoteApplyCallback>,
    code: GameCode,
    subscription: Subscription,
    poll: Duration,
}

async fn viewer_loop(mut ctx: ViewerLoop) {
    let mut poll = tokio::time::interval(ctx.poll);
    poll.set_missed_tick_behavior(MissedTickBehavior::Delay);
    poll.tick().await;

    loop {
        let ended = tokio::select! {
            change = ctx.subscription.next() => match change {
                Some(RemoteChange::Updated(record)) => {
                    {
                        let mut engine = ctx.engine.lock().await;
                        engine.apply_remote(&record);
                        ctx.callback.on_remote_applied(&engine);
                    }
                    let mut session = ctx.session.lock().await;
                    session.viewer_count = record.viewer_count;
                    session.status = SyncStatus::Connected;
                    debug!(code = %ctx.code, updated_at = record.updated_at, "Applied host update");
                    false
                }
                Some(RemoteChange::Deleted) | None => true,
            },
            _ = poll.tick() => match ctx.store.exists(&ctx.code).await {
                Ok(exists) => !exists,
                Err(e) => {
                    warn!(code = %ctx.code, error = %e, "Existence check failed");
                    false
                }
            },
        };

        if ended {
            break;
        }
    }

    info!(code = %ctx.code, "Shared game ended by host");
    ctx.subscription.unsubscribe();
    ctx.session.lock().await.end_game();
    ctx.callback.on_game_ended();
}
