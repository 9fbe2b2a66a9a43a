//! # HTTP Print Gateway
//!
//! Accepts print jobs from the browser POS over HTTP and forwards them to
//! network receipt printers.
//!
//! ## Usage
//!
//! ```bash
//! ticketera serve --listen 0.0.0.0:8080
//! ```
//!
//! ## Endpoints
//!
//! | Method | Path | Body | Response |
//! |--------|------|------|----------|
//! | GET | `/status` | | `{status, service, version, bitmap}` |
//! | POST | `/print` | `{ip, port?, data}` | `{success}` / `{success:false, error}` (400, 500, 504) |
//! | POST | `/test` | `{ip, port?}` | always 200: `{reachable, latencyMs}` / `{reachable:false, error}` |
//! | OPTIONS | any of the above | | 200 + CORS headers |
//!
//! Everything else answers 404, OPTIONS on an unknown path included. No authentication: the gateway is meant for
//! a trusted local network segment.

mod handlers;
mod state;

pub use handlers::print::{PrintRequest, PrintResponse};
pub use handlers::probe::{ProbeRequest, ProbeResponse};
pub use handlers::status::{SERVICE_NAME, StatusResponse};
pub use state::{AppState, DEFAULT_LISTEN_ADDR, DEFAULT_MAX_BODY_BYTES, ServerConfig};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::Method,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::error::GatewayError;

/// Build the router for the given state.
///
/// Exposed separately from [`serve`] so tests can drive it in-process.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .allow_private_network(true);

    let body_limit = state.config.max_body_bytes;

    Router::new()
        .route(
            "/status",
            get(handlers::status::status).fallback(handlers::not_found),
        )
        .route(
            "/print",
            post(handlers::print::print).fallback(handlers::not_found),
        )
        .route(
            "/test",
            post(handlers::probe::test).fallback(handlers::not_found),
        )
        // CORS on matched routes only; unknown paths, OPTIONS included, fall through to 404
        .route_layer(cors)
        .fallback(handlers::not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// Start the HTTP server and run until Ctrl-C.
///
/// ## Example
///
/// ```no_run
/// use ticketera::server::{serve, ServerConfig};
///
/// # async fn example() -> Result<(), ticketera::GatewayError> {
/// let config = ServerConfig {
///     listen_addr: "0.0.0.0:8080".to_string(),
///     ..Default::default()
/// };
///
/// serve(config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn serve(config: ServerConfig) -> Result<(), GatewayError> {
    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .map_err(|e| {
            GatewayError::Server(format!("Failed to bind to {}: {}", config.listen_addr, e))
        })?;

    log::info!(
        "[server] ticketera {} listening on {}",
        config.version,
        config.listen_addr
    );
    log::info!(
        "[server] Default printer port {}, print timeout {:?}, probe timeout {:?}",
        config.default_printer_port,
        config.print_timeout,
        config.probe_timeout
    );

    let app = router(Arc::new(AppState::new(config)));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| GatewayError::Server(format!("Server error: {}", e)))?;

    log::info!("[server] Stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("[server] Cannot listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("[server] Shutting down");
}
