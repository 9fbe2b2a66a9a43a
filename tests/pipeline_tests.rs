//! # Pipeline Tests
//!
//! Decode → monochrome → raster, checked against PNGs written by an
//! independent encoder (the `image` crate). Every scanline filter the
//! encoder supports is exercised, plus its adaptive per-row choice.

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder};
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use ticketera::png::{self, ColorType};
use ticketera::protocol::graphics::{self, RASTER_HEADER_LEN, parse_raster_header};
use ticketera::raster;
use ticketera::splice;

const FILTERS: [FilterType; 6] = [
    FilterType::NoFilter,
    FilterType::Sub,
    FilterType::Up,
    FilterType::Avg,
    FilterType::Paeth,
    FilterType::Adaptive,
];

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn encode_png(
    pixels: &[u8],
    width: u32,
    height: u32,
    color: ExtendedColorType,
    filter: FilterType,
) -> Vec<u8> {
    let mut out = Vec::new();
    PngEncoder::new_with_quality(&mut out, CompressionType::Default, filter)
        .write_image(pixels, width, height, color)
        .expect("encode png");
    out
}

fn random_pixels(seed: u64, len: usize) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len).map(|_| rng.random::<u8>()).collect()
}

// ============================================================================
// DECODER CROSS-CHECK
// ============================================================================

#[test]
fn decodes_every_filter_and_color_type() {
    let cases = [
        (ExtendedColorType::L8, ColorType::Grayscale, 1),
        (ExtendedColorType::La8, ColorType::GrayscaleAlpha, 2),
        (ExtendedColorType::Rgb8, ColorType::Rgb, 3),
        (ExtendedColorType::Rgba8, ColorType::Rgba, 4),
    ];
    let (width, height) = (37, 23);

    for (i, (color, expected_type, bpp)) in cases.into_iter().enumerate() {
        let pixels = random_pixels(i as u64, width * height * bpp);

        for filter in FILTERS {
            let file = encode_png(&pixels, width as u32, height as u32, color, filter);
            let img = png::decode(&file).expect("decode");

            assert_eq!(img.width, width as u32);
            assert_eq!(img.height, height as u32);
            assert_eq!(img.color_type, expected_type);
            assert_eq!(img.bytes_per_pixel as usize, bpp);
            assert!(
                img.pixels == pixels,
                "pixel mismatch for {:?} with {:?}",
                expected_type,
                filter
            );
        }
    }
}

#[test]
fn decodes_smooth_gradient() {
    // Smooth content makes the adaptive encoder pick Paeth/Avg rows
    let (width, height) = (64u32, 64u32);
    let mut pixels = Vec::new();
    for y in 0..height {
        for x in 0..width {
            pixels.extend_from_slice(&[(x * 4) as u8, (y * 4) as u8, ((x + y) * 2) as u8]);
        }
    }
    let file = encode_png(&pixels, width, height, ExtendedColorType::Rgb8, FilterType::Adaptive);
    assert_eq!(png::decode(&file).unwrap().pixels, pixels);
}

// ============================================================================
// MONOCHROME + RASTER
// ============================================================================

#[test]
fn black_and_white_single_pixel() {
    for filter in FILTERS {
        let black = encode_png(&[0], 1, 1, ExtendedColorType::L8, filter);
        let bitmap = raster::to_monochrome(&png::decode(&black).unwrap());
        assert_eq!(bitmap.raster, vec![0x80]);

        let white = encode_png(&[255], 1, 1, ExtendedColorType::L8, filter);
        let bitmap = raster::to_monochrome(&png::decode(&white).unwrap());
        assert_eq!(bitmap.raster, vec![0x00]);
    }
}

#[test]
fn transparent_rgba_prints_nothing() {
    let (width, height) = (20u32, 11u32);
    let mut pixels = random_pixels(99, (width * height * 4) as usize);
    for alpha in pixels.iter_mut().skip(3).step_by(4) {
        *alpha %= 128;
    }

    let file = encode_png(&pixels, width, height, ExtendedColorType::Rgba8, FilterType::Adaptive);
    let bitmap = raster::to_monochrome(&png::decode(&file).unwrap());
    assert!(bitmap.raster.iter().all(|b| *b == 0));
}

#[test]
fn header_matches_source_dimensions() {
    for (width, height) in [(1u32, 1u32), (8, 3), (9, 2), (384, 120), (577, 5)] {
        let pixels = random_pixels(width as u64, (width * height) as usize);
        let file = encode_png(&pixels, width, height, ExtendedColorType::L8, FilterType::Adaptive);

        let bitmap = raster::to_monochrome(&png::decode(&file).unwrap());
        assert_eq!(bitmap.bytes_per_row, width.div_ceil(8));

        let cmd = graphics::raster(&bitmap).unwrap();
        let (xb, yb) = parse_raster_header(&cmd).unwrap();
        assert_eq!(xb as u32, bitmap.bytes_per_row);
        assert_eq!(yb as u32, height);
        assert_eq!(cmd.len(), RASTER_HEADER_LEN + (bitmap.bytes_per_row * height) as usize);
    }
}

#[test]
fn threshold_matches_exact_luminance() {
    let (width, height) = (16u32, 16u32);
    let pixels = random_pixels(3, (width * height * 3) as usize);
    let file = encode_png(&pixels, width, height, ExtendedColorType::Rgb8, FilterType::Paeth);
    let bitmap = raster::to_monochrome(&png::decode(&file).unwrap());

    for y in 0..height {
        for x in 0..width {
            let i = ((y * width + x) * 3) as usize;
            let lum_milli =
                299 * pixels[i] as u32 + 587 * pixels[i + 1] as u32 + 114 * pixels[i + 2] as u32;
            assert_eq!(bitmap.get(x, y), lum_milli < 128_000, "pixel ({}, {})", x, y);
        }
    }
}

#[test]
fn pixels_on_the_threshold_print_white() {
    // Both sum to exactly 128000 thousandths
    let pixels = [218, 74, 170, 237, 55, 218];
    let file = encode_png(&pixels, 2, 1, ExtendedColorType::Rgb8, FilterType::NoFilter);
    let bitmap = raster::to_monochrome(&png::decode(&file).unwrap());
    assert_eq!(bitmap.raster, vec![0x00]);
}

// ============================================================================
// SPLICING
// ============================================================================

#[test]
fn splices_encoder_output() {
    let logo = encode_png(&[0, 255, 255, 0], 2, 2, ExtendedColorType::L8, FilterType::Adaptive);

    let mut buffer = b"\x1B@".to_vec();
    buffer.extend(splice::marker(&logo));
    buffer.extend(b"TOTAL 12.50\n");

    let out = splice::splice_markers(&buffer);

    let mut expected = b"\x1B@".to_vec();
    expected.extend([0x1D, 0x76, 0x30, 0x00, 1, 0, 2, 0, 0b1000_0000, 0b0100_0000]);
    expected.extend(b"TOTAL 12.50\n");
    assert_eq!(out, expected);
}
