//! Integration tests for the scoreboard API endpoints.
//!
//! Tests drive the Axum `Router` directly via `tower::ServiceExt` without
//! starting a TCP server. Sync tests share one in-memory store between a
//! hosting and a viewing app.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use rinkside_core::{GameEngine, MemoryStateStore, SharedEngine, StateStore};
use rinkside_server::callback::RemoteCommitCallback;
use rinkside_server::router::build_router;
use rinkside_server::state::{AppState, Committer};
use rinkside_sync::{MemoryStore, SharedStore, SyncBridge, SyncOptions};
use serde_json::{Value, json};
use tokio::sync::Mutex;
use tower::ServiceExt;

struct TestApp {
    state: Arc<AppState>,
    saved: Arc<MemoryStateStore>,
}

impl TestApp {
    fn local() -> Self {
        let saved = Arc::new(MemoryStateStore::new());
        let engine: SharedEngine = Arc::new(Mutex::new(GameEngine::default()));
        let committer = Committer::new(saved.clone());
        let state = Arc::new(AppState::new(engine, committer));
        Self { state, saved }
    }

    fn shared(store: &Arc<MemoryStore>) -> Self {
        let saved = Arc::new(MemoryStateStore::new());
        let engine: SharedEngine = Arc::new(Mutex::new(GameEngine::default()));
        let committer = Committer::new(saved.clone());
        let bridge = SyncBridge::new(store.clone(), Arc::clone(&engine), SyncOptions::default())
            .with_callback(Arc::new(RemoteCommitCallback::new(committer.clone())));
        let state = Arc::new(AppState::new(engine, committer).with_bridge(Arc::new(bridge)));
        Self { state, saved }
    }

    fn router(&self) -> Router {
        build_router(Arc::clone(&self.state))
    }

    async fn get(&self, path: &str) -> (StatusCode, Value) {
        let response = self
            .router()
            .oneshot(Request::get(path).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        (status, body_to_json(response.into_body()).await)
    }

    async fn post_json(&self, path: &str, body: &Value) -> (StatusCode, Value) {
        self.post_raw(path, &body.to_string()).await
    }

    async fn post_raw(&self, path: &str, body: &str) -> (StatusCode, Value) {
        let response = self
            .router()
            .oneshot(
                Request::post(path)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_owned()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        (status, body_to_json(response.into_body()).await)
    }

    async fn command(&self, body: Value) -> (StatusCode, Value) {
        self.post_json("/api/commands", &body).await
    }
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
}

// =========================================================================
// Game state and commands
// =========================================================================

#[tokio::test]
async fn test_get_state_defaults() {
    let app = TestApp::local();
    let (status, json) = app.get("/api/state").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["period"], 1);
    assert_eq!(json["timeRemaining"], 1200);
    assert_eq!(json["home"]["abbreviation"], "HOME");
    assert_eq!(json["away"]["color"], "#3b82f6");
    assert_eq!(json["canUndo"], false);
}

#[tokio::test]
async fn test_command_updates_and_saves() {
    let app = TestApp::local();
    let (status, json) = app.command(json!({"action": "addGoal", "team": "home"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["home"]["score"], 1);
    assert_eq!(json["canUndo"], true);

    app.state.committer.flushed().await;
    let saved = app.saved.load().unwrap().unwrap();
    assert_eq!(saved.home.score, 1);
    assert_eq!(saved.history_index, 0);
}

#[tokio::test]
async fn test_undo_redo_scenario() {
    let app = TestApp::local();
    app.command(json!({"action": "newGame"})).await;
    app.command(json!({"action": "addGoal", "team": "home"})).await;
    app.command(json!({"action": "addGoal", "team": "home"})).await;
    let (_, json) = app.command(json!({"action": "addGoal", "team": "away"})).await;
    assert_eq!(json["home"]["score"], 2);
    assert_eq!(json["away"]["score"], 1);

    let (_, json) = app.command(json!({"action": "undo"})).await;
    assert_eq!(json["home"]["score"], 2);
    assert_eq!(json["away"]["score"], 0);
    let (_, json) = app.command(json!({"action": "undo"})).await;
    assert_eq!(json["home"]["score"], 1);
    let (_, json) = app.command(json!({"action": "redo"})).await;
    assert_eq!(json["home"]["score"], 2);
    assert_eq!(json["canRedo"], true);
}

#[tokio::test]
async fn test_penalty_command_sets_power_play() {
    let app = TestApp::local();
    let (status, json) = app
        .command(json!({
            "action": "addPenalty",
            "team": "home",
            "playerNumber": "17",
            "duration": 120,
            "type": "minor"
        }))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["penalties"][0]["timeRemaining"], 120);
    assert_eq!(json["awayPowerPlay"], true);
    assert_eq!(json["homePowerPlay"], false);
    assert_eq!(json["events"][0]["type"], "penalty");
}

#[tokio::test]
async fn test_zero_length_penalty_is_rejected() {
    let app = TestApp::local();
    let (status, json) = app
        .command(json!({
            "action": "addPenalty",
            "team": "home",
            "playerNumber": "4",
            "duration": 0,
            "type": "minor"
        }))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], 400);

    let (_, json) = app.get("/api/state").await;
    assert_eq!(json["penalties"].as_array().unwrap().len(), 0);
    assert_eq!(json["awayPowerPlay"], false);
    assert_eq!(json["canUndo"], false);
}

#[tokio::test]
async fn test_unknown_preset_is_not_found() {
    let app = TestApp::local();
    let (status, json) = app
        .command(json!({"action": "applyPreset", "team": "home", "abbreviation": "XYZ"}))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["status"], 404);
}

#[tokio::test]
async fn test_voice_recognized_and_unrecognized() {
    let app = TestApp::local();
    let (status, json) = app
        .post_json("/api/voice", &json!({"transcript": "Away team scored"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["action"]["action"], "goal");
    assert_eq!(json["action"]["team"], "away");
    assert_eq!(json["state"]["away"]["score"], 1);

    let (status, json) = app
        .post_json("/api/voice", &json!({"transcript": "order a pizza"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["action"], Value::Null);
    assert_eq!(json["state"]["away"]["score"], 1);
}

// =========================================================================
// Export / import / summary
// =========================================================================

#[tokio::test]
async fn test_export_then_import_round_trip() {
    let source = TestApp::local();
    source.command(json!({"action": "addGoal", "team": "away"})).await;
    source.command(json!({"action": "setPeriod", "period": 2})).await;
    source.command(json!({"action": "setTime", "seconds": 754})).await;

    let response = source
        .router()
        .oneshot(Request::get("/api/export").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let disposition = response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_owned();
    assert!(disposition.contains("hockey-game-"));
    let exported = body_to_json(response.into_body()).await;
    assert!(exported["exportedAt"].is_string());

    let target = TestApp::local();
    let (status, json) = target.post_json("/api/import", &exported).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["away"]["score"], 1);
    assert_eq!(json["period"], 2);
    assert_eq!(json["timeRemaining"], 754);
    assert_eq!(json["events"], exported["events"]);
}

#[tokio::test]
async fn test_import_errors() {
    let app = TestApp::local();

    let (status, json) = app.post_raw("/api/import", "not json at all").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Failed to parse game data");

    let (status, json) = app
        .post_json("/api/import", &json!({"home": {}, "away": {}, "period": "two"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Invalid game data format");
}

#[tokio::test]
async fn test_summary_is_plain_text() {
    let app = TestApp::local();
    app.command(json!({"action": "addGoal", "team": "home"})).await;

    let response = app
        .router()
        .oneshot(Request::get("/api/summary").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_owned();
    assert!(content_type.starts_with("text/plain"));
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("HOME"));
    assert!(text.contains("P1"));
}

// =========================================================================
// Presets and overlay
// =========================================================================

#[tokio::test]
async fn test_presets_all_and_filtered() {
    let app = TestApp::local();
    let (status, json) = app.get("/api/presets").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 32);

    let (_, json) = app.get("/api/presets?division=Pacific").await;
    let teams = json.as_array().unwrap();
    assert_eq!(teams.len(), 8);
    assert!(teams.iter().all(|t| t["conference"] == "Western"));
}

#[tokio::test]
async fn test_overlay_params() {
    let app = TestApp::local();
    let (_, json) = app.get("/api/overlay").await;
    assert_eq!(
        json,
        json!({"theme": "minimal", "position": "top", "showPenalties": true, "transparent": true})
    );

    let (_, json) = app
        .get("/api/overlay?theme=full&position=bottom&showPenalties=false")
        .await;
    assert_eq!(json["theme"], "full");
    assert_eq!(json["position"], "bottom");
    assert_eq!(json["showPenalties"], false);
    assert_eq!(json["transparent"], true);
}

// =========================================================================
// Sync
// =========================================================================

#[tokio::test]
async fn test_sync_without_bridge() {
    let app = TestApp::local();
    let (status, json) = app.get("/api/sync").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["mode"], "local");
    assert_eq!(json["status"], "disconnected");

    let (status, json) = app.post_json("/api/sync/host", &json!({})).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["error"], "Sync is not configured");
}

#[tokio::test]
async fn test_join_unknown_game_is_not_found() {
    let store = Arc::new(MemoryStore::new());
    let viewer = TestApp::shared(&store);

    let (status, json) = viewer.post_json("/api/sync/join/ABCDEF", &json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Game not found");

    let (_, json) = viewer.get("/api/sync").await;
    assert_eq!(json["status"], "error");
    assert_eq!(json["mode"], "local");
}

#[tokio::test]
async fn test_host_join_and_viewer_is_read_only() {
    let store = Arc::new(MemoryStore::new());
    let host = TestApp::shared(&store);
    let viewer = TestApp::shared(&store);

    host.command(json!({"action": "addGoal", "team": "home"})).await;
    let (status, json) = host.post_json("/api/sync/host", &json!({})).await;
    assert_eq!(status, StatusCode::OK);
    let code = json["code"].as_str().unwrap().to_owned();
    assert_eq!(code.len(), 6);
    assert!(json["shareUrl"].as_str().unwrap().ends_with(&format!("?join={code}")));

    let (status, json) = viewer
        .post_json(&format!("/api/sync/join/{}", code.to_lowercase()), &json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["mode"], "viewer");
    assert_eq!(json["viewerCount"], 1);

    let (_, state) = viewer.get("/api/state").await;
    assert_eq!(state["home"]["score"], 1);
    viewer.state.committer.flushed().await;
    assert_eq!(viewer.saved.load().unwrap().unwrap().home.score, 1);

    let (status, json) = viewer.command(json!({"action": "addGoal", "team": "away"})).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["status"], 409);

    // Host changes reach the viewer after the debounce window.
    host.command(json!({"action": "addGoal", "team": "home"})).await;
    tokio::time::sleep(Duration::from_millis(300)).await;
    let (_, state) = viewer.get("/api/state").await;
    assert_eq!(state["home"]["score"], 2);

    // Host leaving ends the viewer's session.
    let (_, json) = host.post_json("/api/sync/disconnect", &json!({})).await;
    assert_eq!(json["mode"], "local");
    let parsed = rinkside_types::GameCode::parse(&code).unwrap();
    assert!(!store.exists(&parsed).await.unwrap());
    tokio::time::sleep(Duration::from_millis(50)).await;
    let (_, json) = viewer.get("/api/sync").await;
    assert_eq!(json["mode"], "local");
    assert_eq!(json["error"], "Game ended by host");

    let (status, _) = viewer.command(json!({"action": "addGoal", "team": "away"})).await;
    assert_eq!(status, StatusCode::OK);
}
