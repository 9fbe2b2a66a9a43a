//! # Raw TCP Transport
//!
//! Network receipt printers listen for raw ESC/POS bytes on TCP port 9100
//! ("JetDirect" / raw socket printing). A job is one connection: connect,
//! write everything, close.
//!
//! ## Timeouts
//!
//! Connect and write share one timeout window. When the window expires the
//! in-flight future is dropped, which closes the socket, and the job fails
//! with [`GatewayError::Timeout`]. There is no retry.
//!
//! | Operation | Default window |
//! |-----------|----------------|
//! | [`TcpTransport::send`] | 5 s |
//! | [`TcpTransport::probe`] | 3 s |

use std::fmt;
use std::time::{Duration, Instant};

use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

use crate::error::GatewayError;

/// Standard raw-socket ESC/POS port
pub const DEFAULT_PRINTER_PORT: u16 = 9100;

/// Connect + write window for print jobs
pub const DEFAULT_PRINT_TIMEOUT: Duration = Duration::from_secs(5);

/// Connect window for reachability probes
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// # Network Printer Transport
///
/// ## Example
///
/// ```no_run
/// use ticketera::transport::TcpTransport;
/// use ticketera::protocol::commands;
///
/// # async fn example() -> Result<(), ticketera::GatewayError> {
/// let transport = TcpTransport::new("192.168.1.50", 9100);
/// transport.send(&commands::init()).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TcpTransport {
    host: String,
    port: u16,
    timeout: Duration,
}

impl TcpTransport {
    /// Target `host:port` with the default print timeout.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            timeout: DEFAULT_PRINT_TIMEOUT,
        }
    }

    /// Replace the timeout window.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// `host:port`, as shown in error messages.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    fn timed_out(&self) -> GatewayError {
        GatewayError::Timeout {
            addr: self.addr(),
            after: self.timeout,
        }
    }

    async fn connect(&self) -> Result<TcpStream, GatewayError> {
        TcpStream::connect((self.host.as_str(), self.port))
            .await
            .map_err(|source| GatewayError::Connect {
                addr: self.addr(),
                source,
            })
    }

    /// Open a connection, write `data`, and close it.
    ///
    /// ## Errors
    ///
    /// - [`GatewayError::Connect`]: refused, unreachable, bad host
    /// - [`GatewayError::Write`]: connection reset mid-write
    /// - [`GatewayError::Timeout`]: the whole exchange exceeded the window
    pub async fn send(&self, data: &[u8]) -> Result<(), GatewayError> {
        let exchange = async {
            let mut stream = self.connect().await?;
            log::debug!("[tcp] Connected to {}, writing {} bytes", self.addr(), data.len());

            let write_err = |source: std::io::Error| GatewayError::Write {
                addr: self.addr(),
                source,
            };
            stream.write_all(data).await.map_err(write_err)?;
            stream.shutdown().await.map_err(write_err)?;
            Ok::<_, GatewayError>(())
        };

        tokio::time::timeout(self.timeout, exchange)
            .await
            .unwrap_or_else(|_| Err(self.timed_out()))
    }

    /// Connect without writing anything and report how long it took.
    pub async fn probe(&self) -> Result<Duration, GatewayError> {
        let started = Instant::now();
        match tokio::time::timeout(self.timeout, self.connect()).await {
            Ok(Ok(_stream)) => Ok(started.elapsed()),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(self.timed_out()),
        }
    }
}

/// One print request: where to send it and the final byte stream.
///
/// Lives for a single TCP round trip; nothing is queued or persisted.
#[derive(Debug, Clone)]
pub struct PrintJob {
    pub target_ip: String,
    pub target_port: u16,
    pub payload: Vec<u8>,
}

impl PrintJob {
    pub fn new(target_ip: impl Into<String>, target_port: Option<u16>, payload: Vec<u8>) -> Self {
        Self {
            target_ip: target_ip.into(),
            target_port: target_port.unwrap_or(DEFAULT_PRINTER_PORT),
            payload,
        }
    }

    /// Deliver the payload within `timeout`.
    pub async fn dispatch(&self, timeout: Duration) -> Result<(), GatewayError> {
        TcpTransport::new(self.target_ip.as_str(), self.target_port)
            .with_timeout(timeout)
            .send(&self.payload)
            .await
    }
}

impl fmt::Display for PrintJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} ({} bytes)",
            self.target_ip,
            self.target_port,
            self.payload.len()
        )
    }
}
