//! # ESC/POS Basic Commands
//!
//! Byte constants and the handful of framing commands the gateway emits on
//! its own (the rest of a job arrives pre-built from the POS client).
//!
//! ## Byte Order
//!
//! Multi-byte integers use **little-endian** encoding:
//! - `u16` value 0x1234 is sent as bytes `[0x34, 0x12]`

/// ESC (Escape) - Command prefix byte
pub const ESC: u8 = 0x1B;

/// GS (Group Separator) - Extended command prefix
///
/// Used for graphics (`GS v 0`), cutting (`GS V`) and status commands.
pub const GS: u8 = 0x1D;

/// LF (Line Feed) - Print and advance one line
pub const LF: u8 = 0x0A;

/// Encode a `u16` as `[low, high]`.
///
/// ```
/// use ticketera::protocol::commands::u16_le;
///
/// assert_eq!(u16_le(500), [0xF4, 0x01]);
/// ```
#[inline]
pub fn u16_le(value: u16) -> [u8; 2] {
    value.to_le_bytes()
}

/// # Initialize Printer (ESC @)
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | ESC @ |
/// | Hex     | 1B 40 |
///
/// Clears the print buffer and resets text modes to power-on defaults.
#[inline]
pub fn init() -> Vec<u8> {
    vec![ESC, b'@']
}

/// # Print and Feed n Lines (ESC d n)
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | ESC d n |
/// | Hex     | 1B 64 n |
#[inline]
pub fn feed_lines(n: u8) -> Vec<u8> {
    vec![ESC, b'd', n]
}

/// # Feed and Full Cut (GS V B n)
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | GS V B n |
/// | Hex     | 1D 56 42 n |
///
/// Feeds `n` motion units past the cutter position, then cuts.
#[inline]
pub fn cut_full_feed(n: u8) -> Vec<u8> {
    vec![GS, b'V', b'B', n]
}
