//! Shared-game endpoints.
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/api/sync` | Current sync status |
//! | `POST` | `/api/sync/host` | Start hosting this game |
//! | `POST` | `/api/sync/join/{code}` | Mirror a hosted game |
//! | `POST` | `/api/sync/disconnect` | Return to local mode |
//!
//! Without a configured bridge, status reports local mode and host/join
//! answer 503.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use rinkside_sync::{SyncBridge, SyncError};
use rinkside_types::{GameCode, SyncStatusView};
use serde::Serialize;

use crate::error::ApiError;
use crate::state::AppState;

/// Response body for `POST /api/sync/host`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostResponse {
    /// Code viewers join with.
    pub code: GameCode,
    /// Link that joins directly.
    pub share_url: Option<String>,
}

fn bridge(state: &AppState) -> Result<&Arc<SyncBridge>, ApiError> {
    state
        .bridge
        .as_ref()
        .ok_or_else(|| ApiError::from(SyncError::NotConfigured))
}

/// Current sync status.
pub async fn get_sync(State(state): State<Arc<AppState>>) -> Json<SyncStatusView> {
    match &state.bridge {
        Some(bridge) => Json(bridge.status().await),
        None => Json(SyncStatusView::default()),
    }
}

/// Start hosting the current game.
pub async fn post_host(
    State(state): State<Arc<AppState>>,
) -> Result<Json<HostResponse>, ApiError> {
    let bridge = bridge(&state)?;
    let code = bridge.host().await?;
    let share_url = bridge.status().await.share_url;
    Ok(Json(HostResponse { code, share_url }))
}

/// Join a hosted game as a viewer.
///
/// The joined game is applied and broadcast before this returns.
pub async fn post_join(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<Json<SyncStatusView>, ApiError> {
    let bridge = bridge(&state)?;
    bridge.join(&code).await?;
    Ok(Json(bridge.status().await))
}

/// Leave the shared game.
pub async fn post_disconnect(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SyncStatusView>, ApiError> {
    let bridge = bridge(&state)?;
    bridge.disconnect().await;
    Ok(Json(bridge.status().await))
}
