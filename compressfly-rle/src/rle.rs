//! Window-based run-length encoding.
//!
//! The input is walked in fixed windows of `chunk_width` bytes. A run of `n`
//! identical consecutive windows (`n > 1`) is written as
//! `ESCAPE_MARKER || n || window`; a lone window is copied through unchanged.
//! Runs are capped at [`MAX_RUN`] windows; longer runs continue as a new
//! segment.

use compressfly_core::error::{CompressFlyError, Result};
use compressfly_core::markers::{ESCAPE_MARKER, MARKER_LEN, marker_at};
use compressfly_core::traits::Codec;

/// ASCII tag written to archive metadata.
pub const RLE_TAG: &str = "RleCompression";

/// Maximum number of windows a single run segment can describe.
pub const MAX_RUN: usize = u8::MAX as usize;

/// Default window width used by the CLI.
pub const DEFAULT_CHUNK_WIDTH: u8 = 2;

/// Run-length codec over fixed-width windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RleCodec {
    chunk_width: u8,
}

impl RleCodec {
    /// Create a codec walking the input in windows of `chunk_width` bytes.
    pub fn new(chunk_width: u8) -> Result<Self> {
        if chunk_width == 0 {
            return Err(CompressFlyError::invalid_parameter(
                "RLE chunk width must be at least 1",
            ));
        }
        Ok(Self { chunk_width })
    }

    /// Window width in bytes.
    pub fn chunk_width(&self) -> u8 {
        self.chunk_width
    }

    /// Encode `data`.
    pub fn encode(&self, data: &[u8]) -> Vec<u8> {
        let mut output = Vec::with_capacity(data.len());
        let mut windows = data.chunks(self.chunk_width as usize).peekable();

        while let Some(window) = windows.next() {
            let mut count = 1usize;
            while count < MAX_RUN && windows.peek() == Some(&window) {
                windows.next();
                count += 1;
            }

            if count > 1 {
                output.extend_from_slice(ESCAPE_MARKER);
                output.push(count as u8);
            }
            output.extend_from_slice(window);
        }

        output
    }

    /// Decode a buffer produced by [`RleCodec::encode`].
    pub fn decode(&self, data: &[u8]) -> Result<Vec<u8>> {
        let width = self.chunk_width as usize;
        let mut output = Vec::with_capacity(data.len() * 2);
        let mut pos = 0;

        while pos < data.len() {
            let count = if marker_at(data, pos, ESCAPE_MARKER) {
                let count = *data
                    .get(pos + MARKER_LEN)
                    .ok_or_else(|| CompressFlyError::truncated(pos + MARKER_LEN, 1))?;
                if count == 0 {
                    return Err(CompressFlyError::corrupted(
                        pos + MARKER_LEN,
                        "run length of zero",
                    ));
                }
                pos += MARKER_LEN + 1;
                if pos >= data.len() {
                    return Err(CompressFlyError::truncated(pos, width));
                }
                count as usize
            } else {
                1
            };

            let end = (pos + width).min(data.len());
            let window = &data[pos..end];
            for _ in 0..count {
                output.extend_from_slice(window);
            }
            pos = end;
        }

        Ok(output)
    }
}

impl Default for RleCodec {
    fn default() -> Self {
        Self {
            chunk_width: DEFAULT_CHUNK_WIDTH,
        }
    }
}

impl Codec for RleCodec {
    fn name(&self) -> &'static str {
        RLE_TAG
    }

    fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        Ok(self.encode(data))
    }

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        self.decode(data)
    }

    fn metadata(&self) -> Vec<u8> {
        let mut metadata = RLE_TAG.as_bytes().to_vec();
        metadata.push(self.chunk_width);
        metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec(width: u8) -> RleCodec {
        RleCodec::new(width).unwrap()
    }

    #[test]
    fn test_encode_reference_example() {
        let rle = codec(1);
        let compressed = rle.encode(b"ABCSDDDDDD");

        let mut expected = b"ABCS".to_vec();
        expected.extend_from_slice(ESCAPE_MARKER);
        expected.push(6);
        expected.push(b'D');
        assert_eq!(compressed, expected);

        assert_eq!(rle.decode(&compressed).unwrap(), b"ABCSDDDDDD");
    }

    #[test]
    fn test_non_repeating_has_no_overhead() {
        let rle = codec(2);
        let data = b"abcdefgh";
        assert_eq!(rle.encode(data), data);
    }

    #[test]
    fn test_two_byte_windows() {
        let rle = codec(2);
        let data = b"xyxyxyxyzz";
        let compressed = rle.encode(data);

        let mut expected = ESCAPE_MARKER.to_vec();
        expected.push(4);
        expected.extend_from_slice(b"xyzz");
        assert_eq!(compressed, expected);
        assert_eq!(rle.decode(&compressed).unwrap(), data);
    }

    #[test]
    fn test_trailing_partial_window() {
        let rle = codec(3);
        let data = b"abcabcab";
        let compressed = rle.encode(data);
        assert_eq!(rle.decode(&compressed).unwrap(), data);
    }

    #[test]
    fn test_long_run_is_split() {
        let rle = codec(1);
        let data = vec![b'Q'; 600];
        let compressed = rle.encode(&data);

        // 255 + 255 + 90
        let mut expected = Vec::new();
        for count in [255u8, 255, 90] {
            expected.extend_from_slice(ESCAPE_MARKER);
            expected.push(count);
            expected.push(b'Q');
        }
        assert_eq!(compressed, expected);
        assert_eq!(rle.decode(&compressed).unwrap(), data);
    }

    #[test]
    fn test_run_of_256_leaves_bare_remainder() {
        let rle = codec(1);
        let data = vec![7u8; 256];
        let compressed = rle.encode(&data);
        assert_eq!(compressed.len(), MARKER_LEN + 2 + 1);
        assert_eq!(*compressed.last().unwrap(), 7);
        assert_eq!(rle.decode(&compressed).unwrap(), data);
    }

    #[test]
    fn test_empty_input() {
        let rle = codec(4);
        assert!(rle.encode(b"").is_empty());
        assert!(rle.decode(b"").unwrap().is_empty());
    }

    #[test]
    fn test_zero_width_rejected() {
        assert!(matches!(
            RleCodec::new(0),
            Err(CompressFlyError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_truncated_run_header() {
        let rle = codec(1);
        assert!(rle.decode(ESCAPE_MARKER).is_err());

        let mut data = ESCAPE_MARKER.to_vec();
        data.push(3);
        assert!(rle.decode(&data).is_err());

        let mut data = ESCAPE_MARKER.to_vec();
        data.extend_from_slice(&[0, b'a']);
        assert!(rle.decode(&data).is_err());
    }

    #[test]
    fn test_metadata_carries_width() {
        let rle = codec(5);
        let metadata = rle.metadata();
        assert!(metadata.starts_with(RLE_TAG.as_bytes()));
        assert_eq!(metadata.last(), Some(&5));
        assert_eq!(rle.forbidden_markers(), vec![ESCAPE_MARKER.as_slice()]);
    }
}
