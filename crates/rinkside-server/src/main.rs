//! Rinkside scoreboard host binary.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `rinkside-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Restore the saved game, or start a new one
//! 4. Connect the sync bridge when sharing is enabled
//! 5. Start the clock driver
//! 6. Serve the API until `Ctrl-C`
//! 7. Stop the clock, leave any shared game, and finish the last save

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use rinkside_core::config::LoggingConfig;
use rinkside_core::driver::run_clock;
use rinkside_core::{GameEngine, JsonFileStore, ScoreboardConfig, SharedEngine, StateStore};
use rinkside_server::callback::{ClockCommitCallback, RemoteCommitCallback};
use rinkside_server::{AppState, Committer, start_server};
use rinkside_sync::{RemoteStore, SyncBridge, SyncOptions};
use tokio::sync::{Mutex, watch};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Configuration file looked up in the working directory.
const CONFIG_PATH: &str = "rinkside-config.yaml";

/// Clock driver period.
const CLOCK_PERIOD: Duration = Duration::from_secs(1);

/// Application entry point for the scoreboard host.
///
/// # Errors
///
/// Returns an error if configuration cannot be loaded or the server
/// cannot bind.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let config = ScoreboardConfig::load_or_default(Path::new(CONFIG_PATH))?;

    // 2. Initialize structured logging.
    init_tracing(&config.logging);
    info!(
        port = config.server.port,
        state_path = config.storage.state_path,
        sync_enabled = config.sync.enabled,
        "rinkside starting"
    );

    // 3. Restore the saved game.
    let store: Arc<dyn StateStore> = Arc::new(JsonFileStore::new(&config.storage.state_path));
    let engine = match store.load() {
        Ok(Some(saved)) => {
            info!("Restored saved game");
            GameEngine::from_persisted(&config.game, saved)
        }
        Ok(None) => GameEngine::new(&config.game),
        Err(e) => {
            warn!(error = %e, "Saved game unreadable; starting a new one");
            GameEngine::new(&config.game)
        }
    };
    let engine: SharedEngine = Arc::new(Mutex::new(engine));
    let committer = Committer::new(store);

    // 4. Sync bridge.
    let mut app_state = AppState::new(Arc::clone(&engine), committer.clone());
    if config.sync.enabled {
        match RemoteStore::connect(&config.sync.dragonfly_url, &config.sync.nats_url).await {
            Ok(remote) => {
                let bridge = SyncBridge::new(
                    Arc::new(remote),
                    Arc::clone(&engine),
                    SyncOptions::from_config(&config.sync),
                )
                .with_callback(Arc::new(RemoteCommitCallback::new(committer)));
                app_state = app_state.with_bridge(Arc::new(bridge));
                info!("Sync bridge ready");
            }
            Err(e) => {
                warn!(error = %e, "Shared store unreachable; running local only");
            }
        }
    }
    let state = Arc::new(app_state);

    // 5. Clock driver.
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let clock_handle = tokio::spawn({
        let state = Arc::clone(&state);
        async move {
            let mut callback = ClockCommitCallback::new(Arc::clone(&state));
            run_clock(Arc::clone(&state.engine), CLOCK_PERIOD, shutdown_rx, &mut callback).await;
        }
    });

    // 6. Serve until Ctrl-C.
    start_server(&config.server, Arc::clone(&state), async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
        }
    })
    .await?;

    // 7. Shut down.
    let _ = shutdown_tx.send(true);
    let _ = clock_handle.await;
    if let Some(bridge) = &state.bridge {
        bridge.disconnect().await;
    }
    state.committer.flushed().await;

    info!("rinkside shutdown complete");
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    if logging.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }
}
