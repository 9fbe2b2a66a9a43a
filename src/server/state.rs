//! Server state and configuration.

use std::time::Duration;

use crate::transport::tcp::{DEFAULT_PRINT_TIMEOUT, DEFAULT_PRINTER_PORT, DEFAULT_PROBE_TIMEOUT};

/// Default HTTP listen address
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";

/// Default request body limit (base64 jobs with a few logos fit easily)
pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Server configuration.
///
/// Built once at startup and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "0.0.0.0:8080")
    pub listen_addr: String,
    /// Printer port used when a request omits `port`
    pub default_printer_port: u16,
    /// Connect + write window for `/print`
    pub print_timeout: Duration,
    /// Connect window for `/test`
    pub probe_timeout: Duration,
    /// Maximum accepted request body
    pub max_body_bytes: usize,
    /// Version reported by `/status`
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            default_printer_port: DEFAULT_PRINTER_PORT,
            print_timeout: DEFAULT_PRINT_TIMEOUT,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Application state shared across handlers.
pub struct AppState {
    pub config: ServerConfig,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }
}
