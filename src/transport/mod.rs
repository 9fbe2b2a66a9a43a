//! # Printer Transport Layer
//!
//! Communication backends for sending data to printers.
//!
//! ## Available Transports
//!
//! - [`tcp`]: Raw TCP (port 9100) for network receipt printers

pub mod tcp;

pub use tcp::{DEFAULT_PRINTER_PORT, PrintJob, TcpTransport};
