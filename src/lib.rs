//! # Ticketera - ESC/POS Print Gateway
//!
//! Ticketera sits between a browser-based point-of-sale app and network
//! thermal receipt printers. The POS sends a ready-made ESC/POS command
//! buffer over HTTP; ticketera swaps any embedded PNG logos for printer
//! raster commands and writes the result to the printer over raw TCP.
//!
//! - **PNG decoding**: baseline 8-bit PNG, no external image library
//! - **Monochrome conversion**: luminance threshold with alpha cutoff
//! - **Raster encoding**: ESC/POS `GS v 0` bit image command
//! - **Marker splicing**: `__BITMAP_B64:<base64 png>:END__` → raster command
//! - **Transport**: raw TCP (port 9100) with bounded timeouts
//! - **Server**: `/status`, `/print` and `/test` over HTTP
//!
//! ## Quick Start
//!
//! ```no_run
//! use ticketera::{splice, transport::PrintJob};
//! use std::time::Duration;
//!
//! # async fn example(logo_png: &[u8]) -> Result<(), ticketera::GatewayError> {
//! let mut buffer = b"\x1B@".to_vec();
//! buffer.extend(splice::marker(logo_png));
//! buffer.extend(b"Gracias por su compra\n\x1DVB\x00");
//!
//! let payload = splice::splice_markers(&buffer);
//! PrintJob::new("192.168.1.50", None, payload)
//!     .dispatch(Duration::from_secs(5))
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`png`] | PNG decoder |
//! | [`raster`] | Monochrome conversion |
//! | [`protocol`] | ESC/POS command builders |
//! | [`splice`] | Bitmap marker splicing |
//! | [`transport`] | TCP printer transport |
//! | [`server`] | HTTP gateway |
//! | [`error`] | Error types |

pub mod error;
pub mod png;
pub mod protocol;
pub mod raster;
pub mod server;
pub mod splice;
pub mod transport;

// Re-exports for convenience
pub use error::GatewayError;
pub use server::ServerConfig;
pub use transport::{PrintJob, TcpTransport};
