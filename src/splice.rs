//! # Bitmap Marker Splicing
//!
//! The POS client cannot build raster commands itself, so it embeds logos
//! as base64 PNGs inside an otherwise ready-to-print command buffer:
//!
//! ```text
//! ...ESC/POS bytes...__BITMAP_B64:iVBORw0KGgo...:END__...ESC/POS bytes...
//!                    └──────────── marker span ──────────┘
//! ```
//!
//! Each marker span is replaced by the `GS v 0` command for its image. A
//! marker whose image cannot be decoded is removed, so the rest of the
//! receipt still prints. Bytes outside marker spans are never touched.
//!
//! A start literal with no `:END__` after it leaves the remainder of the
//! buffer as is, start literal included.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;

use crate::error::GatewayError;
use crate::png;
use crate::protocol::graphics;
use crate::raster;

/// Opening literal of a bitmap marker
pub const MARKER_START: &[u8] = b"__BITMAP_B64:";

/// Closing literal of a bitmap marker
pub const MARKER_END: &[u8] = b":END__";

/// What happened to the markers of one buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpliceStats {
    /// Markers replaced by a raster command
    pub replaced: usize,
    /// Markers dropped because their image was unusable
    pub stripped: usize,
    /// A start literal without a closing literal was left in place
    pub unterminated: bool,
}

/// Find `needle` in `haystack` at or after `from`.
fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if from >= haystack.len() || haystack.len() - from < needle.len() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|pos| from + pos)
}

/// Decode one marker's payload into a raster command.
///
/// ASCII whitespace inside the payload (line-wrapped base64) is skipped.
pub fn render_marker(payload: &[u8]) -> Result<Vec<u8>, GatewayError> {
    let cleaned: Vec<u8> = payload
        .iter()
        .copied()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    let png_bytes = BASE64_STANDARD.decode(&cleaned)?;
    let image = png::decode(&png_bytes)?;
    let bitmap = raster::to_monochrome(&image);
    graphics::raster(&bitmap)
}

/// Replace every bitmap marker in `buffer` with its raster command.
///
/// Never fails: unusable markers are stripped. Returns `buffer` unchanged
/// when it holds no marker.
pub fn splice_markers(buffer: &[u8]) -> Vec<u8> {
    splice_markers_with_stats(buffer).0
}

/// [`splice_markers`], also reporting what happened to each marker.
pub fn splice_markers_with_stats(buffer: &[u8]) -> (Vec<u8>, SpliceStats) {
    let mut stats = SpliceStats::default();

    let Some(first) = find(buffer, MARKER_START, 0) else {
        return (buffer.to_vec(), stats);
    };

    let mut out = Vec::with_capacity(buffer.len());
    out.extend_from_slice(&buffer[..first]);
    let mut start = first;

    loop {
        let payload_start = start + MARKER_START.len();
        let Some(end) = find(buffer, MARKER_END, payload_start) else {
            log::warn!(
                "[splice] Unterminated bitmap marker at byte {}, leaving remainder as is",
                start
            );
            stats.unterminated = true;
            out.extend_from_slice(&buffer[start..]);
            break;
        };

        match render_marker(&buffer[payload_start..end]) {
            Ok(cmd) => {
                out.extend_from_slice(&cmd);
                stats.replaced += 1;
            }
            Err(e) => {
                debug_assert!(e.is_format_error(), "non-format error from a marker: {}", e);
                log::warn!("[splice] Stripping bitmap marker at byte {}: {}", start, e);
                stats.stripped += 1;
            }
        }

        let resume = end + MARKER_END.len();
        match find(buffer, MARKER_START, resume) {
            Some(next) => {
                out.extend_from_slice(&buffer[resume..next]);
                start = next;
            }
            None => {
                out.extend_from_slice(&buffer[resume..]);
                break;
            }
        }
    }

    (out, stats)
}

/// Wrap PNG bytes in a bitmap marker.
///
/// ```
/// use ticketera::splice::marker;
///
/// assert_eq!(marker(b"\x89PNG"), b"__BITMAP_B64:iVBORw==:END__".to_vec());
/// ```
pub fn marker(png_bytes: &[u8]) -> Vec<u8> {
    let encoded = BASE64_STANDARD.encode(png_bytes);
    let mut out = Vec::with_capacity(MARKER_START.len() + encoded.len() + MARKER_END.len());
    out.extend_from_slice(MARKER_START);
    out.extend_from_slice(encoded.as_bytes());
    out.extend_from_slice(MARKER_END);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::png::tests::build_png;
    use crate::protocol::graphics::{RASTER_HEADER_LEN, parse_raster_header};
    use pretty_assertions::assert_eq;

    fn concat(parts: &[&[u8]]) -> Vec<u8> {
        parts.concat()
    }

    /// 1x1 black grayscale PNG
    fn black_dot() -> Vec<u8> {
        build_png(1, 1, 0, &[0, 0])
    }

    /// 9x2 white grayscale PNG, second row Up-filtered
    fn white_strip() -> Vec<u8> {
        let mut scanlines = vec![0];
        scanlines.extend_from_slice(&[255; 9]);
        scanlines.push(2);
        scanlines.extend_from_slice(&[0; 9]);
        build_png(9, 2, 0, &scanlines)
    }

    #[test]
    fn test_no_marker_unchanged() {
        let buf = b"\x1B@Hello\n\x1DVB\x00".to_vec();
        let (out, stats) = splice_markers_with_stats(&buf);
        assert_eq!(out, buf);
        assert_eq!(stats, SpliceStats::default());
    }

    #[test]
    fn test_empty_buffer() {
        assert_eq!(splice_markers(b""), Vec::<u8>::new());
    }

    #[test]
    fn test_invalid_base64_stripped() {
        let buf = b"A__BITMAP_B64:not-valid-base64!!:END__B";
        let (out, stats) = splice_markers_with_stats(buf);
        assert_eq!(out, b"AB".to_vec());
        assert_eq!(stats.stripped, 1);
        assert_eq!(stats.replaced, 0);
    }

    #[test]
    fn test_valid_base64_but_not_png_stripped() {
        let buf = concat(&[b"A", &marker(b"hello world"), b"B"]);
        assert_eq!(splice_markers(&buf), b"AB".to_vec());
    }

    #[test]
    fn test_single_marker_replaced() {
        let buf = concat(&[b"\x1B@", &marker(&black_dot()), b"\n"]);
        let (out, stats) = splice_markers_with_stats(&buf);

        let expected = concat(&[
            b"\x1B@",
            &[0x1D, 0x76, 0x30, 0x00, 1, 0, 1, 0, 0x80],
            b"\n",
        ]);
        assert_eq!(out, expected);
        assert_eq!(stats.replaced, 1);
    }

    #[test]
    fn test_multiple_markers_in_order() {
        let buf = concat(&[
            b"head",
            &marker(&black_dot()),
            b"mid",
            &marker(&white_strip()),
            b"tail",
        ]);
        let (out, stats) = splice_markers_with_stats(&buf);
        assert_eq!(stats.replaced, 2);

        let first = concat(&[&[0x1D, 0x76, 0x30, 0x00, 1, 0, 1, 0], &[0x80]]);
        let second = concat(&[&[0x1D, 0x76, 0x30, 0x00, 2, 0, 2, 0], &[0, 0, 0, 0]]);
        let expected = concat(&[b"head", &first, b"mid", &second, b"tail"]);
        assert_eq!(out, expected);

        let pos_first = 4;
        let pos_second = 4 + first.len() + 3;
        assert_eq!(parse_raster_header(&out[pos_first..]), Some((1, 1)));
        assert_eq!(parse_raster_header(&out[pos_second..]), Some((2, 2)));
    }

    #[test]
    fn test_bad_marker_between_good_ones() {
        let buf = concat(&[
            &marker(&black_dot()),
            b"x__BITMAP_B64:@@@:END__y",
            &marker(&black_dot()),
        ]);
        let (out, stats) = splice_markers_with_stats(&buf);
        assert_eq!(stats.replaced, 2);
        assert_eq!(stats.stripped, 1);

        let dot = [0x1D, 0x76, 0x30, 0x00, 1, 0, 1, 0, 0x80];
        assert_eq!(out, concat(&[&dot, b"xy", &dot]));
    }

    #[test]
    fn test_adjacent_markers() {
        let buf = concat(&[&marker(&black_dot()), &marker(&black_dot())]);
        let out = splice_markers(&buf);
        assert_eq!(out.len(), 2 * (RASTER_HEADER_LEN + 1));
    }

    #[test]
    fn test_unterminated_marker_left_in_place() {
        let buf = b"A__BITMAP_B64:abcd".to_vec();
        let (out, stats) = splice_markers_with_stats(&buf);
        assert_eq!(out, buf);
        assert!(stats.unterminated);
    }

    #[test]
    fn test_unterminated_after_resolved_marker() {
        let buf = concat(&[b"A", &marker(&black_dot()), b"B__BITMAP_B64:xyz"]);
        let (out, stats) = splice_markers_with_stats(&buf);

        let dot = [0x1D, 0x76, 0x30, 0x00, 1, 0, 1, 0, 0x80];
        assert_eq!(out, concat(&[b"A", &dot, b"B__BITMAP_B64:xyz"]));
        assert_eq!(stats.replaced, 1);
        assert!(stats.unterminated);
    }

    #[test]
    fn test_empty_payload_stripped() {
        assert_eq!(splice_markers(b"A__BITMAP_B64::END__B"), b"AB".to_vec());
    }

    #[test]
    fn test_wrapped_base64_accepted() {
        let encoded = BASE64_STANDARD.encode(black_dot());
        let (head, tail) = encoded.split_at(10);
        let buf = format!("__BITMAP_B64:{}\r\n{}:END__", head, tail);
        let (_, stats) = splice_markers_with_stats(buf.as_bytes());
        assert_eq!(stats.replaced, 1);
    }

    #[test]
    fn test_binary_bytes_preserved() {
        let prefix: Vec<u8> = (0u8..=255).collect();
        let buf = concat(&[&prefix, &marker(b"junk"), &prefix]);
        assert_eq!(splice_markers(&buf), concat(&[&prefix, &prefix]));
    }

    #[test]
    fn test_render_failures_are_format_errors() {
        let palette = BASE64_STANDARD.encode(build_png(1, 1, 3, &[0, 0]));
        let interlaced = {
            let mut png = black_dot();
            png[8 + 8 + 12] = 1; // IHDR interlace byte
            BASE64_STANDARD.encode(png)
        };
        for payload in [&b"@@"[..], b"AAAA", b"", palette.as_bytes(), interlaced.as_bytes()] {
            let err = render_marker(payload).unwrap_err();
            assert!(err.is_format_error(), "{}", err);
        }
    }

    #[test]
    fn test_find() {
        assert_eq!(find(b"abcabc", b"bc", 0), Some(1));
        assert_eq!(find(b"abcabc", b"bc", 2), Some(4));
        assert_eq!(find(b"abc", b"abcd", 0), None);
        assert_eq!(find(b"abc", b"c", 3), None);
    }
}
