//! # Scanline Unfiltering
//!
//! PNG encoders run each scanline through one of five predictors before
//! compression. The inflated stream is `height` rows of
//! `[filter byte][width × bpp bytes]`; this module reverses the predictors.
//!
//! ## Neighbours
//!
//! ```text
//!   c  b      c = byte bpp to the left in the previous row
//!   a  x      b = same column in the previous row
//!             a = byte bpp to the left in the current row
//! ```
//!
//! Neighbours outside the image are 0. Every neighbour is read from the
//! already reconstructed output, never from the raw filtered bytes.

use crate::error::GatewayError;

pub const FILTER_NONE: u8 = 0;
pub const FILTER_SUB: u8 = 1;
pub const FILTER_UP: u8 = 2;
pub const FILTER_AVERAGE: u8 = 3;
pub const FILTER_PAETH: u8 = 4;

/// Paeth predictor.
///
/// Picks whichever of `a`, `b`, `c` is closest to `a + b - c`, ties going to
/// `a`, then `b`.
///
/// ```
/// use ticketera::png::filter::paeth;
///
/// assert_eq!(paeth(0, 0, 0), 0);
/// assert_eq!(paeth(10, 20, 10), 20);
/// ```
#[inline]
pub fn paeth(a: u8, b: u8, c: u8) -> u8 {
    let p = a as i16 + b as i16 - c as i16;
    let pa = (p - a as i16).abs();
    let pb = (p - b as i16).abs();
    let pc = (p - c as i16).abs();
    if pa <= pb && pa <= pc {
        a
    } else if pb <= pc {
        b
    } else {
        c
    }
}

/// Reverse the filter of one scanline in place.
///
/// `row` holds the filtered bytes on entry and the reconstructed bytes on
/// return. `prev` is the reconstructed previous row, or `None` for row 0.
pub fn unfilter_row(
    filter: u8,
    row: &mut [u8],
    prev: Option<&[u8]>,
    bpp: usize,
) -> Result<(), GatewayError> {
    let up = |i: usize| prev.map_or(0, |p| p[i]);

    match filter {
        FILTER_NONE => {}
        FILTER_SUB => {
            for i in bpp..row.len() {
                row[i] = row[i].wrapping_add(row[i - bpp]);
            }
        }
        FILTER_UP => {
            if let Some(p) = prev {
                for (x, b) in row.iter_mut().zip(p) {
                    *x = x.wrapping_add(*b);
                }
            }
        }
        FILTER_AVERAGE => {
            for i in 0..row.len() {
                let a = if i >= bpp { row[i - bpp] as u16 } else { 0 };
                let b = up(i) as u16;
                row[i] = row[i].wrapping_add(((a + b) / 2) as u8);
            }
        }
        FILTER_PAETH => {
            for i in 0..row.len() {
                let (a, c) = if i >= bpp {
                    (row[i - bpp], up(i - bpp))
                } else {
                    (0, 0)
                };
                row[i] = row[i].wrapping_add(paeth(a, up(i), c));
            }
        }
        other => return Err(GatewayError::UnknownFilter(other)),
    }

    Ok(())
}

/// Reverse the filters of a whole inflated image.
///
/// `raw` must contain at least `height × (1 + stride)` bytes, where
/// `stride = width × bpp`. Returns the flat, row-major pixel buffer of
/// `height × stride` bytes.
pub fn unfilter(
    raw: &[u8],
    stride: usize,
    height: usize,
    bpp: usize,
) -> Result<Vec<u8>, GatewayError> {
    let mut pixels = vec![0u8; stride * height];

    for y in 0..height {
        let src = &raw[y * (stride + 1)..(y + 1) * (stride + 1)];
        let filter = src[0];

        let (done, rest) = pixels.split_at_mut(y * stride);
        let row = &mut rest[..stride];
        row.copy_from_slice(&src[1..]);

        let prev = if y == 0 {
            None
        } else {
            Some(&done[(y - 1) * stride..])
        };
        unfilter_row(filter, row, prev, bpp)?;
    }

    Ok(pixels)
}
