//! # Monochrome Conversion
//!
//! Thresholds a decoded [`PngImage`] into a packed 1-bit bitmap.
//!
//! ## Rules
//!
//! | Color type | Luminance | Alpha |
//! |------------|-----------|-------|
//! | Grayscale | sample | 255 |
//! | Grayscale + alpha | first sample | second sample |
//! | RGB | 0.299 R + 0.587 G + 0.114 B | 255 |
//! | RGBA | 0.299 R + 0.587 G + 0.114 B | fourth sample |
//!
//! A pixel with alpha below [`ALPHA_CUTOFF`] is paper white. Otherwise it is
//! ink when its luminance is below [`INK_THRESHOLD`].
//!
//! Luminance is computed exactly, in thousandths (`299 R + 587 G + 114 B`),
//! so a pixel sitting on the threshold is always white.
//!
//! ## Bit Packing
//!
//! Same layout the printer expects: MSB = leftmost dot, 1 = black.
//!
//! ```text
//! x:     0 1 2 3 4 5 6 7 | 8 ...
//! bit:   7 6 5 4 3 2 1 0 | 7 ...
//!        └──── byte 0 ───┘ └ byte 1
//! ```

use crate::png::{ColorType, PngImage};

/// Luminance below this prints black
pub const INK_THRESHOLD: u32 = 128;

/// Alpha below this is treated as transparent (white)
pub const ALPHA_CUTOFF: u8 = 128;

// Luminance weights in thousandths
const LUMA_R: u32 = 299;
const LUMA_G: u32 = 587;
const LUMA_B: u32 = 114;
const LUMA_SCALE: u32 = 1000;

/// A packed 1-bit image, row-major, MSB-first.
///
/// Invariant: `raster.len() == bytes_per_row * height`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonochromeBitmap {
    pub width: u32,
    pub height: u32,
    /// `ceil(width / 8)`
    pub bytes_per_row: u32,
    pub raster: Vec<u8>,
}

impl MonochromeBitmap {
    /// An all-white bitmap.
    pub fn new(width: u32, height: u32) -> Self {
        let bytes_per_row = width.div_ceil(8);
        Self {
            width,
            height,
            bytes_per_row,
            raster: vec![0; bytes_per_row as usize * height as usize],
        }
    }

    /// Mark the dot at `(x, y)` as ink.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32) {
        let idx = (y * self.bytes_per_row + x / 8) as usize;
        self.raster[idx] |= 0x80 >> (x % 8);
    }

    /// Whether the dot at `(x, y)` is ink.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> bool {
        let idx = (y * self.bytes_per_row + x / 8) as usize;
        self.raster[idx] & (0x80 >> (x % 8)) != 0
    }
}

/// Luminance scaled by 1000.
#[inline]
fn luma_milli(r: u8, g: u8, b: u8) -> u32 {
    LUMA_R * r as u32 + LUMA_G * g as u32 + LUMA_B * b as u32
}

/// Whether one pixel's samples print as ink.
#[inline]
fn is_ink(color_type: ColorType, px: &[u8]) -> bool {
    let (luminance, alpha) = match color_type {
        ColorType::Grayscale => (px[0] as u32 * LUMA_SCALE, 255),
        ColorType::GrayscaleAlpha => (px[0] as u32 * LUMA_SCALE, px[1]),
        ColorType::Rgb => (luma_milli(px[0], px[1], px[2]), 255),
        ColorType::Rgba => (luma_milli(px[0], px[1], px[2]), px[3]),
    };

    if alpha < ALPHA_CUTOFF {
        return false;
    }
    luminance < INK_THRESHOLD * LUMA_SCALE
}

/// Convert a decoded image to a 1-bit bitmap.
///
/// Pure and deterministic. The padding bits at the end of each row stay 0.
pub fn to_monochrome(image: &PngImage) -> MonochromeBitmap {
    let mut bitmap = MonochromeBitmap::new(image.width, image.height);

    for y in 0..image.height {
        for x in 0..image.width {
            if is_ink(image.color_type, image.pixel(x as usize, y as usize)) {
                bitmap.set(x, y);
            }
        }
    }

    bitmap
}
