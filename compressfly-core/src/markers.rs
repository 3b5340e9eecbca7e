//! Reserved byte sequences shared by the codecs.
//!
//! Every codec escapes its control information with three-byte markers. Raw
//! input that already contains one of a codec's markers cannot be encoded by
//! that codec, so callers scan inputs with [`find_marker`] before compressing.

/// Escape marker announcing an extended (multi-byte) value.
///
/// Used by RLE (run header), Huffman (two-byte table length) and Lempel-Ziv
/// (dictionary indices of 256 and above).
pub const ESCAPE_MARKER: &[u8; 3] = b"*^&";

/// End-of-data marker used by the Lempel-Ziv codec to flush a pending phrase.
pub const END_OF_DATA_MARKER: &[u8; 3] = b"!@#";

/// Width of every reserved marker in bytes.
pub const MARKER_LEN: usize = 3;

/// Numeric radix of the escaped multi-byte values.
pub const BYTE_RADIX: usize = 256;

/// Return the offset of the first occurrence of `marker` in `data`.
pub fn find_marker(data: &[u8], marker: &[u8]) -> Option<usize> {
    if marker.is_empty() || data.len() < marker.len() {
        return None;
    }
    data.windows(marker.len()).position(|window| window == marker)
}

/// Check whether `data` starts with `marker` at `pos`.
#[inline]
pub fn marker_at(data: &[u8], pos: usize, marker: &[u8]) -> bool {
    data.get(pos..pos + marker.len()) == Some(marker)
}
