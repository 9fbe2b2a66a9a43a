//! # ESC/POS Raster Graphics
//!
//! Encodes a [`MonochromeBitmap`] as the `GS v 0` raster bit image command,
//! the one image format the receipt printers behind this gateway accept.
//!
//! ## Bit Packing
//!
//! Graphics data is packed as bytes where each bit represents one dot:
//! - Bit 7 (MSB) = leftmost dot
//! - Bit 0 (LSB) = rightmost dot
//! - 1 = black (print), 0 = white (no print)
//!
//! ```text
//! Byte value 0xF0 = 11110000 = ████░░░░
//! Byte value 0x0F = 00001111 = ░░░░████
//! Byte value 0xAA = 10101010 = █░█░█░█░
//! ```

use super::commands::{GS, u16_le};
use crate::error::GatewayError;
use crate::raster::MonochromeBitmap;

/// Length of the `GS v 0` header
pub const RASTER_HEADER_LEN: usize = 8;

/// Normal density (no horizontal or vertical doubling)
const MODE_NORMAL: u8 = 0;

/// # Print Raster Bit Image (GS v 0 m xL xH yL yH d1...dk)
///
/// ## Protocol Details
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | GS v 0 m xL xH yL yH d1...dk |
/// | Hex     | 1D 76 30 m xL xH yL yH d1...dk |
/// | Decimal | 29 118 48 m xL xH yL yH d1...dk |
///
/// ## Parameters
///
/// - `m`: Mode, always 0 (normal density)
/// - `xL, xH`: Width in **bytes**, little-endian
/// - `yL, yH`: Height in dots, little-endian
/// - `d1...dk`: Image data, k = width_bytes × height
///
/// ```text
/// width_bytes = xL + (xH × 256)
/// height_dots = yL + (yH × 256)
///
/// Example: 48 bytes wide  = [0x30, 0x00]
/// Example: 500 rows high  = [0xF4, 0x01]
/// ```
///
/// The payload is copied verbatim, with no compression or band splitting.
///
/// ## Example
///
/// ```
/// use ticketera::protocol::graphics;
/// use ticketera::raster::MonochromeBitmap;
///
/// let bitmap = MonochromeBitmap::new(9, 2); // 2 bytes per row
/// let cmd = graphics::raster(&bitmap)?;
///
/// assert_eq!(&cmd[..8], &[0x1D, 0x76, 0x30, 0x00, 2, 0, 2, 0]);
/// assert_eq!(cmd.len(), 8 + 4);
/// # Ok::<(), ticketera::GatewayError>(())
/// ```
///
/// ## Errors
///
/// [`GatewayError::DimensionOverflow`] when `bytes_per_row` or `height`
/// exceeds 65535. Images that large have to be downscaled before they are
/// embedded.
pub fn raster(bitmap: &MonochromeBitmap) -> Result<Vec<u8>, GatewayError> {
    let overflow = || GatewayError::DimensionOverflow {
        bytes_per_row: bitmap.bytes_per_row,
        height: bitmap.height,
    };
    let width_bytes = u16::try_from(bitmap.bytes_per_row).map_err(|_| overflow())?;
    let height = u16::try_from(bitmap.height).map_err(|_| overflow())?;

    debug_assert_eq!(
        bitmap.raster.len(),
        width_bytes as usize * height as usize,
        "Raster data length mismatch"
    );

    let [xl, xh] = u16_le(width_bytes);
    let [yl, yh] = u16_le(height);

    let mut cmd = Vec::with_capacity(RASTER_HEADER_LEN + bitmap.raster.len());
    cmd.push(GS);
    cmd.push(b'v');
    cmd.push(b'0');
    cmd.push(MODE_NORMAL);
    cmd.push(xl);
    cmd.push(xh);
    cmd.push(yl);
    cmd.push(yh);
    cmd.extend_from_slice(&bitmap.raster);
    Ok(cmd)
}

/// Read the `(width_bytes, height)` fields back out of a raster command.
///
/// Returns `None` if `cmd` does not start with a `GS v 0` header.
pub fn parse_raster_header(cmd: &[u8]) -> Option<(u16, u16)> {
    if cmd.len() < RASTER_HEADER_LEN || cmd[..3] != [GS, b'v', b'0'] {
        return None;
    }
    let width_bytes = u16::from_le_bytes([cmd[4], cmd[5]]);
    let height = u16::from_le_bytes([cmd[6], cmd[7]]);
    Some((width_bytes, height))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn bitmap(width: u32, height: u32, fill: u8) -> MonochromeBitmap {
        let mut bm = MonochromeBitmap::new(width, height);
        bm.raster.fill(fill);
        bm
    }

    #[test]
    fn test_raster_header() {
        let cmd = raster(&bitmap(576, 100, 0xFF)).unwrap();

        assert_eq!(cmd[0], 0x1D); // GS
        assert_eq!(cmd[1], 0x76); // 'v'
        assert_eq!(cmd[2], 0x30); // '0'
        assert_eq!(cmd[3], 0); // m = normal
        assert_eq!(cmd[4], 72); // xL (576/8 = 72)
        assert_eq!(cmd[5], 0); // xH
        assert_eq!(cmd[6], 100); // yL
        assert_eq!(cmd[7], 0); // yH
    }

    #[test]
    fn test_raster_large_height() {
        // Height > 255 exercises the high byte
        let cmd = raster(&bitmap(8, 500, 0)).unwrap();

        // 500 = 0x01F4 -> [0xF4, 0x01] in little-endian
        assert_eq!(cmd[6], 0xF4); // yL
        assert_eq!(cmd[7], 0x01); // yH
    }

    #[test]
    fn test_raster_width_rounding() {
        // 577 dots round up to 73 bytes
        let cmd = raster(&bitmap(577, 10, 0)).unwrap();

        assert_eq!(cmd[4], 73); // xL
        assert_eq!(cmd[5], 0); // xH
    }

    #[test]
    fn test_raster_preserves_data() {
        let mut bm = MonochromeBitmap::new(16, 3);
        for (i, b) in bm.raster.iter_mut().enumerate() {
            *b = i as u8 * 17;
        }
        let cmd = raster(&bm).unwrap();

        assert_eq!(cmd.len(), RASTER_HEADER_LEN + 6);
        assert_eq!(&cmd[RASTER_HEADER_LEN..], &bm.raster[..]);
    }

    #[test]
    fn test_raster_max_dimensions() {
        let bm = MonochromeBitmap {
            width: 8,
            height: 0xFFFF,
            bytes_per_row: 1,
            raster: vec![0; 0xFFFF],
        };
        let cmd = raster(&bm).unwrap();
        assert_eq!(parse_raster_header(&cmd), Some((1, 0xFFFF)));
    }

    #[test]
    fn test_raster_height_overflow() {
        let bm = MonochromeBitmap {
            width: 8,
            height: 0x1_0000,
            bytes_per_row: 1,
            raster: vec![0; 0x1_0000],
        };
        assert!(matches!(
            raster(&bm),
            Err(GatewayError::DimensionOverflow {
                bytes_per_row: 1,
                height: 0x1_0000
            })
        ));
    }

    #[test]
    fn test_raster_width_overflow() {
        let bm = MonochromeBitmap {
            width: 0x1_0000 * 8,
            height: 1,
            bytes_per_row: 0x1_0000,
            raster: vec![0; 0x1_0000],
        };
        assert!(matches!(
            raster(&bm),
            Err(GatewayError::DimensionOverflow { .. })
        ));
    }

    #[test]
    fn test_parse_raster_header_rejects_other_commands() {
        assert_eq!(parse_raster_header(&[0x1B, 0x40]), None);
        assert_eq!(parse_raster_header(&[0x1D, 0x76, 0x31, 0, 1, 0, 1, 0]), None);
    }
}
