//! Error types for the scoreboard HTTP API.
//!
//! [`ApiError`] unifies every handler failure into one enum that converts
//! into an Axum response with a JSON body `{error, status}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use rinkside_core::{CommandError, ImportError};
use rinkside_sync::SyncError;

/// Errors returned by API handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The requested resource was not found.
    #[error("{0}")]
    NotFound(String),

    /// The request was well-formed HTTP but semantically invalid.
    #[error("{0}")]
    BadRequest(String),

    /// The request conflicts with the current sync role.
    #[error("{0}")]
    Conflict(String),

    /// A required backend is not configured.
    #[error("{0}")]
    Unavailable(String),

    /// A serialization or deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ImportError> for ApiError {
    fn from(e: ImportError) -> Self {
        Self::BadRequest(e.to_string())
    }
}

impl From<CommandError> for ApiError {
    fn from(e: CommandError) -> Self {
        match e {
            CommandError::UnknownPreset(_) => Self::NotFound(e.to_string()),
            CommandError::InvalidPenalty => Self::BadRequest(e.to_string()),
        }
    }
}

impl From<SyncError> for ApiError {
    fn from(e: SyncError) -> Self {
        match &e {
            SyncError::NotFound(_) => Self::NotFound(e.to_string()),
            SyncError::InvalidCode(_) => Self::BadRequest(e.to_string()),
            SyncError::AlreadyConnected(_) => Self::Conflict(e.to_string()),
            SyncError::NotConfigured | SyncError::CodesExhausted(_) => {
                Self::Unavailable(e.to_string())
            }
            SyncError::Dragonfly(_)
            | SyncError::Nats(_)
            | SyncError::Serialization(_)
            | SyncError::Config(_) => Self::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            Self::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg.clone()),
            Self::Serialization(e) => {
                (StatusCode::INTERNAL_SERVER_ERROR, format!("JSON error: {e}"))
            }
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}
