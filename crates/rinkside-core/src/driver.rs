//! Once-per-second clock driver.
//!
//! [`clock_tick`] is the pure step: decrement the running clock, count the
//! penalties down with it, and stop at zero. [`run_clock`] repeats it on a
//! tokio interval against a shared engine until told to shut down.

use std::sync::Arc;
use std::time::Duration;

use rinkside_types::Penalty;
use tokio::sync::{Mutex, watch};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::clock::ClockTick;
use crate::engine::GameEngine;

/// Engine handle shared by the server, the clock driver, and the sync
/// bridge. All writers serialize through the mutex.
pub type SharedEngine = Arc<Mutex<GameEngine>>;

/// What one driver step did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickOutcome {
    /// Effect on the game clock.
    pub clock: ClockTick,
    /// Penalties whose time ran out during this step.
    pub released: Vec<Penalty>,
}

impl TickOutcome {
    /// Whether the step changed any state.
    pub const fn changed(&self) -> bool {
        !matches!(self.clock, ClockTick::Idle)
    }
}

/// Advance a running game by one second.
///
/// A clock already at zero is stopped instead. Penalties only count down
/// while game time actually elapses.
pub fn clock_tick(engine: &mut GameEngine) -> TickOutcome {
    let clock = engine.tick_clock();
    let released = match clock {
        ClockTick::Elapsed | ClockTick::Expired => engine.tick_penalties(),
        ClockTick::Idle | ClockTick::Halted => Vec::new(),
    };
    TickOutcome { clock, released }
}

/// Callback invoked after each driver step that changed state.
///
/// Called with the engine lock held, so implementations must not block.
pub trait ClockCallback: Send {
    /// Called after a state-changing tick.
    fn on_tick(&mut self, outcome: &TickOutcome, engine: &GameEngine);
}

/// A no-op clock callback for testing.
pub struct NoOpCallback;

impl ClockCallback for NoOpCallback {
    fn on_tick(&mut self, _outcome: &TickOutcome, _engine: &GameEngine) {}
}

/// Tick `engine` every `period` until `shutdown` becomes `true` or its
/// sender is dropped.
pub async fn run_clock(
    engine: SharedEngine,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
    callback: &mut dyn ClockCallback,
) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick of a tokio interval completes immediately.
    interval.tick().await;

    info!(period_ms = period.as_millis(), "Clock driver started");

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let mut guard = engine.lock().await;
                let outcome = clock_tick(&mut guard);
                if !outcome.changed() {
                    continue;
                }
                for penalty in &outcome.released {
                    debug!(id = %penalty.id, team = %penalty.team, "Penalty expired");
                }
                if outcome.clock == ClockTick::Expired {
                    info!(period = guard.clock().period(), "Period clock expired");
                }
                callback.on_tick(&outcome, &guard);
            }
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }

    info!("Clock driver stopped");
}
