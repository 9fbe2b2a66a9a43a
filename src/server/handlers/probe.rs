//! Printer reachability handler.
//!
//! An unreachable printer is an ordinary answer, not a server fault, so this
//! endpoint always responds 200.

use axum::{Json, body::Bytes, extract::State};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::transport::TcpTransport;

use super::super::state::AppState;
use super::{parse_body, require_ip};

/// Request body for POST /test.
#[derive(Debug, Deserialize)]
pub struct ProbeRequest {
    pub ip: String,
    #[serde(default)]
    pub port: Option<u16>,
}

/// Response body for POST /test.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeResponse {
    pub reachable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProbeResponse {
    fn reachable(latency_ms: u64) -> Self {
        Self {
            reachable: true,
            latency_ms: Some(latency_ms),
            error: None,
        }
    }

    fn unreachable(error: String) -> Self {
        Self {
            reachable: false,
            latency_ms: None,
            error: Some(error),
        }
    }
}

/// Handle POST /test - bare TCP connect, nothing written.
pub async fn test(State(state): State<Arc<AppState>>, body: Bytes) -> Json<ProbeResponse> {
    let (ip, port) = match parse_body::<ProbeRequest>(&body)
        .and_then(|req| Ok((require_ip(&req.ip)?, req.port)))
    {
        Ok((ip, port)) => (ip, port.unwrap_or(state.config.default_printer_port)),
        Err(e) => return Json(ProbeResponse::unreachable(e.to_string())),
    };

    let transport = TcpTransport::new(ip, port).with_timeout(state.config.probe_timeout);
    match transport.probe().await {
        Ok(latency) => {
            log::info!("[test] {} reachable in {:?}", transport.addr(), latency);
            Json(ProbeResponse::reachable(latency.as_millis() as u64))
        }
        Err(e) => {
            log::info!("[test] {} unreachable: {}", transport.addr(), e);
            Json(ProbeResponse::unreachable(e.to_string()))
        }
    }
}
