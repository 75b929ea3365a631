//! Axum router construction for the scoreboard server.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{handlers, overlay, sync, ws};

/// Build the complete Axum router.
///
/// - `GET /ws/state` -- `WebSocket` stream of game views
/// - `GET /api/state`, `POST /api/commands`, `POST /api/voice`
/// - `GET /api/export`, `POST /api/import`, `GET /api/summary`
/// - `GET /api/presets`, `GET /api/overlay`
/// - `GET /api/sync`, `POST /api/sync/host`, `POST /api/sync/join/{code}`,
///   `POST /api/sync/disconnect`
///
/// CORS allows any origin so browser UIs and overlay pages served
/// elsewhere can reach the API.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // WebSocket
        .route("/ws/state", get(ws::ws_state))
        // Game
        .route("/api/state", get(handlers::get_state))
        .route("/api/commands", post(handlers::post_command))
        .route("/api/voice", post(handlers::post_voice))
        .route("/api/export", get(handlers::get_export))
        .route("/api/import", post(handlers::post_import))
        .route("/api/summary", get(handlers::get_summary))
        .route("/api/presets", get(handlers::get_presets))
        .route("/api/overlay", get(overlay::get_overlay))
        // Sync
        .route("/api/sync", get(sync::get_sync))
        .route("/api/sync/host", post(sync::post_host))
        .route("/api/sync/join/{code}", post(sync::post_join))
        .route("/api/sync/disconnect", post(sync::post_disconnect))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
