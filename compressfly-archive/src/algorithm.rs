//! Codec registry.
//!
//! Archives name their codec in the metadata chunk as an ASCII tag followed
//! by codec parameters. [`CompressionAlgorithm`] is the closed set of codecs
//! an archive may use and the only place tags are matched.

use std::fmt;

use compressfly_core::error::{CompressFlyError, Result};
use compressfly_core::traits::Codec;
use compressfly_huffman::{HUFFMAN_TAG, HuffmanCodec};
use compressfly_lz::{LZ_TAG, LempelZivCodec};
use compressfly_rle::{RLE_TAG, RleCodec};

/// The codec backing an archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionAlgorithm {
    /// Run-length encoding over fixed windows.
    Rle(RleCodec),
    /// Huffman coding with an embedded codebook.
    Huffman(HuffmanCodec),
    /// LZ78-style dictionary coding.
    LempelZiv(LempelZivCodec),
}

impl CompressionAlgorithm {
    /// RLE with windows of `chunk_width` bytes.
    pub fn rle(chunk_width: u8) -> Result<Self> {
        Ok(Self::Rle(RleCodec::new(chunk_width)?))
    }

    /// Huffman coding.
    pub fn huffman() -> Self {
        Self::Huffman(HuffmanCodec::new())
    }

    /// Lempel-Ziv coding.
    pub fn lempel_ziv() -> Self {
        Self::LempelZiv(LempelZivCodec::new())
    }

    /// Instantiate the codec described by an archive metadata chunk.
    pub fn from_metadata(metadata: &[u8]) -> Result<Self> {
        if let Some(params) = metadata.strip_prefix(RLE_TAG.as_bytes()) {
            return match params {
                [width] => Self::rle(*width).map_err(|_| {
                    CompressFlyError::corrupted(RLE_TAG.len(), "RLE chunk width of zero")
                }),
                _ => Err(CompressFlyError::corrupted(
                    RLE_TAG.len(),
                    format!("expected one RLE parameter byte, found {}", params.len()),
                )),
            };
        }
        if metadata.starts_with(HUFFMAN_TAG.as_bytes()) {
            return Ok(Self::huffman());
        }
        if metadata.starts_with(LZ_TAG.as_bytes()) {
            return Ok(Self::lempel_ziv());
        }
        Err(CompressFlyError::unrecognized_tag(metadata))
    }

    fn codec(&self) -> &dyn Codec {
        match self {
            Self::Rle(codec) => codec,
            Self::Huffman(codec) => codec,
            Self::LempelZiv(codec) => codec,
        }
    }
}

impl Default for CompressionAlgorithm {
    fn default() -> Self {
        Self::Rle(RleCodec::default())
    }
}

impl Codec for CompressionAlgorithm {
    fn name(&self) -> &'static str {
        self.codec().name()
    }

    fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        self.codec().compress(data)
    }

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        self.codec().decompress(data)
    }

    fn metadata(&self) -> Vec<u8> {
        self.codec().metadata()
    }

    fn forbidden_markers(&self) -> Vec<&'static [u8]> {
        self.codec().forbidden_markers()
    }
}

impl fmt::Display for CompressionAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rle(codec) => write!(f, "{RLE_TAG} (chunk width {})", codec.chunk_width()),
            other => f.write_str(other.name()),
        }
    }
}
