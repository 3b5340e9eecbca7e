//! [`Codec`] implementation for the Lempel-Ziv format.

use compressfly_core::error::Result;
use compressfly_core::markers::{END_OF_DATA_MARKER, ESCAPE_MARKER};
use compressfly_core::traits::Codec;

use crate::decoder::LzDecoder;
use crate::encoder::LzEncoder;

/// ASCII tag written to archive metadata.
pub const LZ_TAG: &str = "LempelZivCompression";

/// Lempel-Ziv codec with the default dictionary ceiling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LempelZivCodec;

impl LempelZivCodec {
    /// Create a Lempel-Ziv codec.
    pub fn new() -> Self {
        Self
    }
}

impl Codec for LempelZivCodec {
    fn name(&self) -> &'static str {
        LZ_TAG
    }

    fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        LzEncoder::new().encode(data)
    }

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        LzDecoder::new().decode(data)
    }

    fn forbidden_markers(&self) -> Vec<&'static [u8]> {
        vec![ESCAPE_MARKER.as_slice(), END_OF_DATA_MARKER.as_slice()]
    }
}
