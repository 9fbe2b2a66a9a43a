//! # Error Types
//!
//! This module defines the single error type used throughout the ticketera
//! library.
//!
//! ## Taxonomy
//!
//! | Kind | Variants | Who handles it |
//! |------|----------|----------------|
//! | Format | `MalformedPng`, `UnsupportedColorType`, `UnsupportedBitDepth`, `Interlaced`, `UnknownFilter`, `Inflate`, `ImageTooLarge`, `DimensionOverflow`, `Base64` | The marker splicer strips the offending marker |
//! | Transport | `Connect`, `Write`, `Timeout` | Reported to the HTTP caller as 500/504 |
//! | Request | `InvalidRequest` | Reported to the HTTP caller as 400 |
//!
//! None of these is fatal to the server process.

use std::time::Duration;

use thiserror::Error;

/// Main error type for ticketera operations
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Signature, chunk structure or IHDR is not a usable PNG
    #[error("Malformed PNG: {0}")]
    MalformedPng(String),

    /// IHDR color type other than 0, 2, 4 or 6
    #[error("Unsupported PNG color type {0}")]
    UnsupportedColorType(u8),

    /// IHDR bit depth other than 8
    #[error("Unsupported PNG bit depth {0}")]
    UnsupportedBitDepth(u8),

    /// Adam7 interlaced images are not decoded
    #[error("Interlaced PNG images are not supported")]
    Interlaced,

    /// Scanline filter type byte outside 0..=4
    #[error("Unknown PNG filter type {0}")]
    UnknownFilter(u8),

    /// zlib stream inside the IDAT chunks could not be inflated
    #[error("Inflate error: {0}")]
    Inflate(String),

    /// Image exceeds the decoder's pixel budget
    #[error("Image too large: {width}x{height}")]
    ImageTooLarge { width: u32, height: u32 },

    /// Raster header fields are 16-bit; the image must be downscaled upstream
    #[error("Raster dimensions overflow 16 bits: {bytes_per_row} bytes per row, {height} rows")]
    DimensionOverflow { bytes_per_row: u32, height: u32 },

    /// Invalid base64 inside a marker or request payload
    #[error("Base64 error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// TCP connect to the printer failed
    #[error("No se pudo conectar a {addr} - {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// Connected, but writing the job failed
    #[error("Error al enviar datos a {addr} - {source}")]
    Write {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// Connect + write did not finish inside the timeout window
    #[error("Timeout: la impresora {addr} no respondio en {} ms", .after.as_millis())]
    Timeout { addr: String, after: Duration },

    /// Malformed HTTP request body
    #[error("Datos invalidos: {0}")]
    InvalidRequest(String),

    /// Listener bind or serve failure
    #[error("Server error: {0}")]
    Server(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GatewayError {
    /// True for errors that only concern one embedded image.
    ///
    /// The splicer absorbs these by dropping the marker; everything else
    /// belongs to the job as a whole.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            GatewayError::MalformedPng(_)
                | GatewayError::UnsupportedColorType(_)
                | GatewayError::UnsupportedBitDepth(_)
                | GatewayError::Interlaced
                | GatewayError::UnknownFilter(_)
                | GatewayError::Inflate(_)
                | GatewayError::ImageTooLarge { .. }
                | GatewayError::DimensionOverflow { .. }
                | GatewayError::Base64(_)
        )
    }

    /// True for printer-side failures (connect, write, timeout).
    pub fn is_transport_error(&self) -> bool {
        matches!(
            self,
            GatewayError::Connect { .. } | GatewayError::Write { .. } | GatewayError::Timeout { .. }
        )
    }
}
