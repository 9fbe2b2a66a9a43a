//! Print job submission handler.
//!
//! ## Job Lifecycle
//!
//! ```text
//! received ─► decoding ─► splicing ─► connecting ─► writing ─┬─► succeeded
//!                │                         │           │      │
//!                └─────── 400 ─────────────┴── 500/504 ┴──────┴─► failed
//! ```
//!
//! Each request is a single attempt; the caller re-submits on failure.

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::{error::GatewayError, splice, transport::PrintJob};

use super::super::state::AppState;
use super::{parse_body, require_ip, status_for};

/// Request body for POST /print.
#[derive(Debug, Deserialize)]
pub struct PrintRequest {
    /// Printer IP address or hostname
    pub ip: String,
    /// Printer port (defaults to the configured printer port, 9100)
    #[serde(default)]
    pub port: Option<u16>,
    /// Base64 ESC/POS command buffer, possibly holding bitmap markers
    pub data: String,
}

/// Response body for POST /print.
#[derive(Debug, Serialize)]
pub struct PrintResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn failure(err: &GatewayError) -> Response {
    (
        status_for(err),
        Json(PrintResponse {
            success: false,
            error: Some(err.to_string()),
        }),
    )
        .into_response()
}

/// Turn a request body into a print job (decoding and splicing stages).
async fn build_job(job_id: Uuid, state: &AppState, body: &[u8]) -> Result<PrintJob, GatewayError> {
    let request: PrintRequest = parse_body(body)?;
    let ip = require_ip(&request.ip)?;
    let port = request.port.unwrap_or(state.config.default_printer_port);

    let raw = BASE64_STANDARD
        .decode(request.data.trim())
        .map_err(|e| GatewayError::InvalidRequest(format!("data no es base64 valido ({})", e)))?;

    log::info!(
        "[print] Job {} received: {}:{}, {} bytes",
        job_id,
        ip,
        port,
        raw.len()
    );

    // Decode/inflate/encode is CPU-bound; keep it off the async workers
    let (payload, stats) = tokio::task::spawn_blocking(move || splice::splice_markers_with_stats(&raw))
        .await
        .map_err(|e| GatewayError::Server(format!("Task error: {}", e)))?;

    if stats != splice::SpliceStats::default() {
        log::info!(
            "[print] Job {} spliced: {} bitmap(s) replaced, {} stripped{}",
            job_id,
            stats.replaced,
            stats.stripped,
            if stats.unterminated { ", unterminated marker kept" } else { "" }
        );
    }

    Ok(PrintJob::new(ip, Some(port), payload))
}

/// Handle POST /print - splice bitmaps and send the job to the printer.
pub async fn print(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let job_id = Uuid::new_v4();

    let job = match build_job(job_id, &state, &body).await {
        Ok(job) => job,
        Err(e) => {
            log::warn!("[print] Job {} rejected: {}", job_id, e);
            return failure(&e);
        }
    };

    match job.dispatch(state.config.print_timeout).await {
        Ok(()) => {
            log::info!("[print] Job {} sent to {}", job_id, job);
            (
                StatusCode::OK,
                Json(PrintResponse {
                    success: true,
                    error: None,
                }),
            )
                .into_response()
        }
        Err(e) => {
            log::error!("[print] Job {} failed: {}", job_id, e);
            failure(&e)
        }
    }
}
