//! REST endpoint handlers for the scoreboard.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/api/state` | Current game view |
//! | `POST` | `/api/commands` | Apply one operator command |
//! | `POST` | `/api/voice` | Recognize and apply a spoken command |
//! | `GET` | `/api/export` | Download the game as JSON |
//! | `POST` | `/api/import` | Load a previously exported game |
//! | `GET` | `/api/summary` | Plain-text game summary |
//! | `GET` | `/api/presets` | NHL team presets |
//!
//! Mutating endpoints return 409 while this instance mirrors a host.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use chrono::Utc;
use rinkside_core::export::{export_file_name, parse_import};
use rinkside_core::presets::{self, Conference, Division, NHL_TEAMS, TeamPreset};
use rinkside_core::{GameCommand, VoiceAction, parse_voice_command};
use rinkside_types::{ExportData, GameView};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /api/voice`.
#[derive(Debug, Deserialize)]
pub struct VoiceRequest {
    /// Raw speech-to-text transcript.
    pub transcript: String,
}

/// Response body for `POST /api/voice`.
#[derive(Debug, Serialize)]
pub struct VoiceResponse {
    /// The recognized action, or `null` when nothing matched.
    pub action: Option<VoiceAction>,
    /// The game after applying the action.
    pub state: GameView,
}

/// Query parameters for `GET /api/presets`.
#[derive(Debug, Deserialize)]
pub struct PresetsQuery {
    /// Only teams in this conference.
    pub conference: Option<Conference>,
    /// Only teams in this division.
    pub division: Option<Division>,
}

// ---------------------------------------------------------------------------
// Game state
// ---------------------------------------------------------------------------

/// Current game view.
pub async fn get_state(State(state): State<Arc<AppState>>) -> Json<GameView> {
    let engine = state.engine.lock().await;
    Json(engine.view())
}

/// Apply one operator command.
///
/// The body is a [`GameCommand`] tagged by `action`, e.g.
/// `{"action": "addGoal", "team": "home"}`.
pub async fn post_command(
    State(state): State<Arc<AppState>>,
    Json(command): Json<GameCommand>,
) -> Result<Json<GameView>, ApiError> {
    state.ensure_operator().await?;
    let mut engine = state.engine.lock().await;
    engine.apply(&command)?;
    state.commit(&engine);
    debug!(?command, "Command applied");
    Ok(Json(engine.view()))
}

/// Recognize a transcript and apply it.
///
/// An unrecognized transcript is not an error: the response carries a
/// `null` action and the unchanged game.
pub async fn post_voice(
    State(state): State<Arc<AppState>>,
    Json(request): Json<VoiceRequest>,
) -> Result<Json<VoiceResponse>, ApiError> {
    state.ensure_operator().await?;
    let action = parse_voice_command(&request.transcript);
    let mut engine = state.engine.lock().await;
    if let Some(action) = &action {
        engine.apply(&action.clone().into_command())?;
        state.commit(&engine);
        info!(transcript = %request.transcript, ?action, "Voice command applied");
    } else {
        debug!(transcript = %request.transcript, "Voice transcript not recognized");
    }
    Ok(Json(VoiceResponse {
        action,
        state: engine.view(),
    }))
}

// ---------------------------------------------------------------------------
// Export / import / summary
// ---------------------------------------------------------------------------

/// Download the game as an export document.
pub async fn get_export(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let now = Utc::now();
    let data: ExportData = state.engine.lock().await.export_data(now);
    let disposition = format!("attachment; filename=\"{}\"", export_file_name(now));
    ([(header::CONTENT_DISPOSITION, disposition)], Json(data))
}

/// Load an export document into the engine. Undoable.
///
/// The body is taken as raw text so malformed JSON gets the import's own
/// error message instead of the extractor's.
pub async fn post_import(
    State(state): State<Arc<AppState>>,
    body: String,
) -> Result<Json<GameView>, ApiError> {
    state.ensure_operator().await?;
    let data = parse_import(&body)?;
    let mut engine = state.engine.lock().await;
    engine.apply_import(&data);
    state.commit(&engine);
    info!(period = data.period, "Game imported");
    Ok(Json(engine.view()))
}

/// Plain-text game summary.
pub async fn get_summary(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let text = state.engine.lock().await.summary_text(Utc::now());
    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], text)
}

// ---------------------------------------------------------------------------
// Presets
// ---------------------------------------------------------------------------

/// List team presets, optionally filtered.
#[allow(clippy::unused_async)]
pub async fn get_presets(Query(query): Query<PresetsQuery>) -> Json<Vec<TeamPreset>> {
    let teams = match (query.division, query.conference) {
        (Some(division), _) => presets::by_division(division).copied().collect(),
        (None, Some(conference)) => presets::by_conference(conference).copied().collect(),
        (None, None) => NHL_TEAMS.to_vec(),
    };
    Json(teams)
}
