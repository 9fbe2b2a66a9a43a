//! # Baseline PNG Decoder
//!
//! Decodes the PNG subset that POS logos use: 8-bit samples, no interlace,
//! color types 0 (grayscale), 2 (RGB), 4 (grayscale + alpha) and 6 (RGBA).
//!
//! ## File Layout
//!
//! ```text
//! 89 50 4E 47 0D 0A 1A 0A                  signature
//! [len: u32 BE][type: 4 ASCII][data][crc]  chunk, repeated
//! ```
//!
//! | Chunk | Use |
//! |-------|-----|
//! | IHDR | width, height, bit depth, color type, interlace |
//! | IDAT | zlib stream, possibly split over several chunks |
//! | IEND | stops the walk |
//!
//! Every other chunk (PLTE, tEXt, gAMA, ...) is skipped. CRCs are not
//! checked.
//!
//! ## Pipeline
//!
//! ```text
//! bytes ──► chunk walk ──► concat IDAT ──► zlib inflate ──► unfilter ──► PngImage
//! ```

pub mod filter;

use std::io::Read;

use flate2::read::ZlibDecoder;

use crate::error::GatewayError;

/// PNG file signature
pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

const CHUNK_IHDR: [u8; 4] = *b"IHDR";
const CHUNK_IDAT: [u8; 4] = *b"IDAT";
const CHUNK_IEND: [u8; 4] = *b"IEND";

/// Upper bound on decoded pixels (memory guard)
pub const MAX_PIXELS: u64 = 40_000_000;

/// # PNG Color Type
///
/// | Code | Variant | Samples per pixel |
/// |------|---------|-------------------|
/// | 0 | `Grayscale` | 1 |
/// | 2 | `Rgb` | 3 |
/// | 4 | `GrayscaleAlpha` | 2 |
/// | 6 | `Rgba` | 4 |
///
/// Palette images (3) are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorType {
    Grayscale,
    Rgb,
    GrayscaleAlpha,
    Rgba,
}

impl ColorType {
    /// Map an IHDR color type code.
    pub fn from_code(code: u8) -> Result<Self, GatewayError> {
        match code {
            0 => Ok(ColorType::Grayscale),
            2 => Ok(ColorType::Rgb),
            4 => Ok(ColorType::GrayscaleAlpha),
            6 => Ok(ColorType::Rgba),
            other => Err(GatewayError::UnsupportedColorType(other)),
        }
    }

    /// Bytes per pixel at bit depth 8.
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            ColorType::Grayscale => 1,
            ColorType::GrayscaleAlpha => 2,
            ColorType::Rgb => 3,
            ColorType::Rgba => 4,
        }
    }
}

/// A decoded image: flat, row-major, unfiltered 8-bit samples.
#[derive(Debug, Clone)]
pub struct PngImage {
    pub width: u32,
    pub height: u32,
    /// Bytes per pixel, derived from `color_type`
    pub bytes_per_pixel: u8,
    pub color_type: ColorType,
    /// `width × height × bytes_per_pixel` bytes
    pub pixels: Vec<u8>,
}

impl PngImage {
    /// Samples of the pixel at `(x, y)`.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> &[u8] {
        let bpp = self.bytes_per_pixel as usize;
        let start = (y * self.width as usize + x) * bpp;
        &self.pixels[start..start + bpp]
    }
}

/// IHDR fields the decoder cares about.
#[derive(Debug, Clone, Copy)]
struct Header {
    width: u32,
    height: u32,
    bit_depth: u8,
    color_type: u8,
    interlace: u8,
}

#[inline]
fn be_u32(data: &[u8], offset: usize) -> u32 {
    u32::from_be_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ])
}

/// Decode a PNG file held in memory.
///
/// ## Errors
///
/// - [`GatewayError::MalformedPng`]: bad signature, truncated chunk, no IHDR
///   (zero width or height), no IDAT, or too little image data
/// - [`GatewayError::UnsupportedColorType`], [`GatewayError::UnsupportedBitDepth`],
///   [`GatewayError::Interlaced`]: outside the supported subset
/// - [`GatewayError::Inflate`]: corrupt zlib stream
/// - [`GatewayError::UnknownFilter`]: scanline filter byte above 4
/// - [`GatewayError::ImageTooLarge`]: more than [`MAX_PIXELS`] pixels
pub fn decode(bytes: &[u8]) -> Result<PngImage, GatewayError> {
    if bytes.len() < PNG_SIGNATURE.len() || bytes[..8] != PNG_SIGNATURE {
        return Err(GatewayError::MalformedPng("invalid signature".to_string()));
    }

    let mut header: Option<Header> = None;
    let mut idat = Vec::new();
    let mut offset = PNG_SIGNATURE.len();

    while offset + 8 <= bytes.len() {
        let length = be_u32(bytes, offset) as usize;
        let kind = [
            bytes[offset + 4],
            bytes[offset + 5],
            bytes[offset + 6],
            bytes[offset + 7],
        ];
        let data_start = offset + 8;
        let data_end = data_start
            .checked_add(length)
            .filter(|end| *end <= bytes.len())
            .ok_or_else(|| {
                GatewayError::MalformedPng(format!(
                    "chunk {} truncated",
                    String::from_utf8_lossy(&kind)
                ))
            })?;
        let data = &bytes[data_start..data_end];

        match kind {
            CHUNK_IHDR => {
                if data.len() < 13 {
                    return Err(GatewayError::MalformedPng("IHDR too short".to_string()));
                }
                header = Some(Header {
                    width: be_u32(data, 0),
                    height: be_u32(data, 4),
                    bit_depth: data[8],
                    color_type: data[9],
                    interlace: data[12],
                });
            }
            CHUNK_IDAT => idat.extend_from_slice(data),
            CHUNK_IEND => break,
            _ => {}
        }

        // 4-byte CRC follows the data; a missing trailing CRC is tolerated
        offset = data_end + 4;
    }

    let header = match header {
        Some(h) if h.width > 0 && h.height > 0 => h,
        _ => return Err(GatewayError::MalformedPng("missing IHDR".to_string())),
    };

    let color_type = ColorType::from_code(header.color_type)?;
    if header.bit_depth != 8 {
        return Err(GatewayError::UnsupportedBitDepth(header.bit_depth));
    }
    if header.interlace != 0 {
        return Err(GatewayError::Interlaced);
    }
    if header.width as u64 * header.height as u64 > MAX_PIXELS {
        return Err(GatewayError::ImageTooLarge {
            width: header.width,
            height: header.height,
        });
    }
    if idat.is_empty() {
        return Err(GatewayError::MalformedPng("no IDAT chunks".to_string()));
    }

    let bpp = color_type.bytes_per_pixel();
    let width = header.width as usize;
    let height = header.height as usize;
    let stride = width * bpp;
    let expected = height * (stride + 1);

    let raw = inflate(&idat, expected)?;
    if raw.len() < expected {
        return Err(GatewayError::MalformedPng(format!(
            "image data truncated: expected {} bytes, got {}",
            expected,
            raw.len()
        )));
    }

    let pixels = filter::unfilter(&raw, stride, height, bpp)?;

    Ok(PngImage {
        width: header.width,
        height: header.height,
        bytes_per_pixel: bpp as u8,
        color_type,
        pixels,
    })
}

/// Inflate a zlib stream, producing at most `limit` bytes.
fn inflate(compressed: &[u8], limit: usize) -> Result<Vec<u8>, GatewayError> {
    let mut out = Vec::with_capacity(limit);
    ZlibDecoder::new(compressed)
        .take(limit as u64)
        .read_to_end(&mut out)
        .map_err(|e| GatewayError::Inflate(e.to_string()))?;
    Ok(out)
}
