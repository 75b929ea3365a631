//! Engine-side callbacks that commit background changes.
//!
//! The clock driver and the viewer loop mutate the engine outside any
//! request; these callbacks route those changes through the same commit
//! path the REST handlers use.

use std::sync::Arc;

use rinkside_core::GameEngine;
use rinkside_core::driver::{ClockCallback, TickOutcome};
use rinkside_sync::RemoteApplyCallback;
use tracing::{debug, info};

use crate::state::{AppState, Committer};

/// Commits after every clock step that changed the game.
pub struct ClockCommitCallback {
    state: Arc<AppState>,
}

impl ClockCommitCallback {
    /// Create a callback committing through `state`.
    pub const fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }
}

impl ClockCallback for ClockCommitCallback {
    fn on_tick(&mut self, outcome: &TickOutcome, engine: &GameEngine) {
        debug!(
            time_remaining = engine.clock().time_remaining(),
            released = outcome.released.len(),
            "Clock tick committed"
        );
        self.state.commit(engine);
    }
}

/// Commits host records applied by the viewer loop.
///
/// Viewers never publish, so this only saves and broadcasts.
pub struct RemoteCommitCallback {
    committer: Committer,
}

impl RemoteCommitCallback {
    /// Create a callback committing through `committer`.
    pub const fn new(committer: Committer) -> Self {
        Self { committer }
    }
}

impl RemoteApplyCallback for RemoteCommitCallback {
    fn on_remote_applied(&self, engine: &GameEngine) {
        self.committer.commit(engine);
    }

    fn on_game_ended(&self) {
        info!("Host ended the shared game; back in local mode");
    }
}
