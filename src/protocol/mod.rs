//! # ESC/POS Protocol Implementation
//!
//! Low-level command builders for ESC/POS thermal receipt printers.
//!
//! ## Module Structure
//!
//! - [`commands`]: Byte constants and framing commands (init, feed, cut)
//! - [`graphics`]: `GS v 0` raster bit image encoder
//!
//! ## Usage Example
//!
//! ```
//! use ticketera::protocol::{commands, graphics};
//! use ticketera::raster::MonochromeBitmap;
//!
//! let logo = MonochromeBitmap::new(384, 64);
//!
//! let mut data = Vec::new();
//! data.extend(commands::init());
//! data.extend(graphics::raster(&logo)?);
//! data.extend(commands::feed_lines(3));
//! data.extend(commands::cut_full_feed(0));
//!
//! // Send `data` to the printer via transport...
//! # Ok::<(), ticketera::GatewayError>(())
//! ```

pub mod commands;
pub mod graphics;
