//! Huffman codec.
//!
//! Encoded layout:
//!
//! ```text
//! [table length prefix] [JSON codebook] [padding: u8] [packed MSB-first bits]
//! ```
//!
//! `padding` is the number of zero bits (0..=7) appended to complete the
//! final byte. Trailing ASCII whitespace of the input is stripped before
//! encoding and is not restored on decode.

use compressfly_core::bitstream::{MsbBitReader, MsbBitWriter};
use compressfly_core::error::{CompressFlyError, Result};
use compressfly_core::traits::Codec;

use crate::table::{read_table, write_table};
use crate::tree::{Codebook, FrequencyTable};

/// ASCII tag written to archive metadata.
pub const HUFFMAN_TAG: &str = "HuffmanCompression";

fn is_trailing_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r' | 0x0B | 0x0C)
}

/// Strip trailing ASCII whitespace (including vertical tab).
pub fn strip_trailing_whitespace(data: &[u8]) -> &[u8] {
    let end = data
        .iter()
        .rposition(|&b| !is_trailing_whitespace(b))
        .map_or(0, |pos| pos + 1);
    &data[..end]
}

/// Huffman codec with a per-buffer codebook.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HuffmanCodec;

impl HuffmanCodec {
    /// Create a Huffman codec.
    pub fn new() -> Self {
        Self
    }

    /// Encode `data`.
    pub fn encode(&self, data: &[u8]) -> Result<Vec<u8>> {
        let data = strip_trailing_whitespace(data);
        let codebook = Codebook::build(&FrequencyTable::from_bytes(data));

        let mut writer = MsbBitWriter::with_capacity(data.len() / 2 + 1);
        for &byte in data {
            let code = codebook.code(byte).ok_or_else(|| {
                CompressFlyError::invalid_parameter(format!("no code for byte {byte:#04x}"))
            })?;
            writer.write_code(code)?;
        }
        let padding = writer.pending_padding();
        let packed = writer.into_vec();

        let mut output = Vec::with_capacity(packed.len() + 64);
        write_table(codebook.reverse(), &mut output)?;
        output.push(padding);
        output.extend_from_slice(&packed);
        Ok(output)
    }

    /// Decode a buffer produced by [`HuffmanCodec::encode`].
    pub fn decode(&self, data: &[u8]) -> Result<Vec<u8>> {
        let (reverse, table_end) = read_table(data)?;
        let padding = *data
            .get(table_end)
            .ok_or_else(|| CompressFlyError::truncated(table_end, 1))?;
        let packed_start = table_end + 1;
        let packed = &data[packed_start..];

        if reverse.is_empty() {
            if packed.is_empty() {
                return Ok(Vec::new());
            }
            return Err(CompressFlyError::corrupted(
                packed_start,
                "encoded bits without a codebook",
            ));
        }

        let max_code_len = reverse.keys().map(String::len).max().unwrap_or(0);
        let mut reader = MsbBitReader::with_padding(packed, padding)
            .map_err(|_| CompressFlyError::corrupted(table_end, "invalid padding header"))?;

        let mut output = Vec::with_capacity(packed.len() * 2);
        let mut current = String::with_capacity(max_code_len);
        while let Some(bit) = reader.read_bit() {
            current.push(if bit { '1' } else { '0' });
            if let Some(&byte) = reverse.get(&current) {
                output.push(byte);
                current.clear();
            } else if current.len() >= max_code_len {
                return Err(CompressFlyError::corrupted(
                    packed_start + (reader.bits_read() / 8) as usize,
                    "bit sequence matches no code",
                ));
            }
        }

        if !current.is_empty() {
            return Err(CompressFlyError::corrupted(
                data.len(),
                "trailing bits match no code",
            ));
        }

        Ok(output)
    }
}

impl Codec for HuffmanCodec {
    fn name(&self) -> &'static str {
        HUFFMAN_TAG
    }

    fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        self.encode(data)
    }

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        self.decode(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use compressfly_core::markers::{ESCAPE_MARKER, MARKER_LEN};

    #[test]
    fn test_roundtrip_text() {
        let codec = HuffmanCodec::new();
        let data = b"this is an example of a huffman tree";
        let encoded = codec.encode(data).unwrap();
        assert_eq!(codec.decode(&encoded).unwrap(), data);
    }

    #[test]
    fn test_small_table_uses_one_byte_prefix() {
        let codec = HuffmanCodec::new();
        let encoded = codec.encode(b"aab").unwrap();
        assert_ne!(&encoded[..MARKER_LEN], ESCAPE_MARKER);
        let table_len = encoded[0] as usize;
        // The rarer 'b' pops first and takes the left edge.
        assert_eq!(&encoded[1..1 + table_len], br#"{"0":98,"1":97}"#);
        // "110" is three bits, five bits of padding.
        assert_eq!(encoded[1 + table_len], 5);
        assert_eq!(encoded[2 + table_len], 0b1100_0000);
    }

    #[test]
    fn test_large_table_uses_escaped_prefix() {
        let codec = HuffmanCodec::new();
        let data: Vec<u8> = (0..=255u8).flat_map(|b| vec![b; 1 + b as usize % 5]).collect();
        // Keep the last byte non-whitespace.
        let mut data = data;
        data.push(b'x');

        let encoded = codec.encode(&data).unwrap();
        assert_eq!(&encoded[..MARKER_LEN], ESCAPE_MARKER);
        assert_eq!(codec.decode(&encoded).unwrap(), data);
    }

    #[test]
    fn test_codebook_length_boundary() {
        let codec = HuffmanCodec::new();
        // 23 consecutive symbols with counts 1..=23; the first symbol shifts
        // the JSON codebook across the one-byte prefix limit.
        for (first, table_len) in [(b'R', 254usize), (b'S', 255), (b'T', 256)] {
            let data: Vec<u8> = (0..23u8)
                .flat_map(|i| vec![first + i; usize::from(i) + 1])
                .collect();
            let encoded = codec.encode(&data).unwrap();

            let header = if table_len < 256 {
                assert_eq!(encoded[0] as usize, table_len);
                1
            } else {
                assert_eq!(&encoded[..MARKER_LEN], ESCAPE_MARKER);
                assert_eq!(&encoded[MARKER_LEN..MARKER_LEN + 2], [1, 0]);
                MARKER_LEN + 2
            };
            assert_eq!(encoded[header], b'{');
            assert_eq!(encoded[header + table_len - 1], b'}');
            assert_eq!(codec.decode(&encoded).unwrap(), data);
        }
    }

    #[test]
    fn test_single_symbol() {
        let codec = HuffmanCodec::new();
        let encoded = codec.encode(b"zzzzzzzzz").unwrap();
        assert_eq!(codec.decode(&encoded).unwrap(), b"zzzzzzzzz");
    }

    #[test]
    fn test_trailing_whitespace_is_stripped() {
        let codec = HuffmanCodec::new();
        let encoded = codec.encode(b"hello world \n\t\x0b\x0c\r").unwrap();
        assert_eq!(codec.decode(&encoded).unwrap(), b"hello world");
    }

    #[test]
    fn test_empty_and_whitespace_only() {
        let codec = HuffmanCodec::new();
        for data in [&b""[..], b"   \n\n"] {
            let encoded = codec.encode(data).unwrap();
            assert_eq!(encoded, vec![2, b'{', b'}', 0]);
            assert!(codec.decode(&encoded).unwrap().is_empty());
        }
    }

    #[test]
    fn test_byte_aligned_stream_has_zero_padding() {
        let codec = HuffmanCodec::new();
        // Two symbols, one bit each: eight symbols fill one byte exactly.
        let encoded = codec.encode(b"abababab").unwrap();
        let table_len = encoded[0] as usize;
        assert_eq!(encoded[1 + table_len], 0);
        assert_eq!(encoded.len(), 1 + table_len + 2);
    }

    #[test]
    fn test_missing_padding_header() {
        let codec = HuffmanCodec::new();
        let encoded = codec.encode(b"abc").unwrap();
        let table_len = encoded[0] as usize;
        assert!(codec.decode(&encoded[..1 + table_len]).is_err());
    }

    #[test]
    fn test_corrupt_padding_header() {
        let codec = HuffmanCodec::new();
        let mut encoded = codec.encode(b"abcabc").unwrap();
        let table_len = encoded[0] as usize;
        encoded[1 + table_len] = 9;
        assert!(matches!(
            codec.decode(&encoded),
            Err(CompressFlyError::CorruptStream { .. })
        ));
    }

    #[test]
    fn test_bits_without_codebook() {
        let codec = HuffmanCodec::new();
        assert!(codec.decode(&[2, b'{', b'}', 0, 0xFF]).is_err());
    }

    #[test]
    fn test_codec_trait() {
        let codec = HuffmanCodec::new();
        assert_eq!(codec.name(), HUFFMAN_TAG);
        assert_eq!(codec.metadata(), HUFFMAN_TAG.as_bytes());
        let encoded = codec.compress(b"trait dispatch").unwrap();
        assert_eq!(codec.decompress(&encoded).unwrap(), b"trait dispatch");
    }
}
