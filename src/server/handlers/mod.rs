//! HTTP handlers for the server.

pub mod print;
pub mod probe;
pub mod status;

use axum::{
    Json,
    http::StatusCode,
    response::IntoResponse,
};
use serde::de::DeserializeOwned;

use crate::error::GatewayError;

/// Parse a JSON request body, mapping every failure to `InvalidRequest`.
///
/// Handlers take the raw body rather than axum's `Json` extractor, so a
/// malformed body answers with the same `{success:false, error}` shape.
pub(crate) fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, GatewayError> {
    serde_json::from_slice(body).map_err(|e| GatewayError::InvalidRequest(e.to_string()))
}

/// Reject an empty or blank printer address.
pub(crate) fn require_ip(ip: &str) -> Result<String, GatewayError> {
    let ip = ip.trim();
    if ip.is_empty() {
        return Err(GatewayError::InvalidRequest("falta la direccion ip".to_string()));
    }
    Ok(ip.to_string())
}

/// HTTP status for a failed job.
pub(crate) fn status_for(err: &GatewayError) -> StatusCode {
    match err {
        GatewayError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        GatewayError::InvalidRequest(_) | GatewayError::Base64(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Unknown path, or a known path with the wrong method.
pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({"success": false, "error": "Ruta no encontrada"})),
    )
}
