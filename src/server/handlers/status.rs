//! Health/status handler.

use axum::{Json, extract::State};
use serde::Serialize;
use std::sync::Arc;

use super::super::state::AppState;

/// Service name reported by `/status`
pub const SERVICE_NAME: &str = "ticketera";

/// Response for GET /status.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: String,
    /// Bitmap markers are spliced into print jobs
    pub bitmap: bool,
}

/// Handle GET /status - static descriptor, no side effects.
pub async fn status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok",
        service: SERVICE_NAME,
        version: state.config.version.clone(),
        bitmap: true,
    })
}
