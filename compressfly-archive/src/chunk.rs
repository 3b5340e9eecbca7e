//! Length-prefixed chunk framing.
//!
//! ```text
//! [length: 16 bytes, big-endian] [length bytes of payload]
//! ```
//!
//! The framer never looks inside a payload; codec output is opaque to it.

use std::io::Write;
use std::ops::Range;

use compressfly_core::error::{CompressFlyError, Result};
use compressfly_core::traits::Codec;

/// Width of the chunk length prefix.
pub const LENGTH_PREFIX_LEN: usize = 16;

/// Encode a chunk length prefix.
pub fn encode_length(len: usize) -> [u8; LENGTH_PREFIX_LEN] {
    (len as u128).to_be_bytes()
}

/// Decode a chunk length prefix.
pub fn decode_length(prefix: [u8; LENGTH_PREFIX_LEN]) -> u128 {
    u128::from_be_bytes(prefix)
}

/// Write `payload` as one chunk without encoding it. Returns the bytes written.
pub fn write_raw_chunk<W: Write>(writer: &mut W, payload: &[u8]) -> Result<u64> {
    writer.write_all(&encode_length(payload.len()))?;
    writer.write_all(payload)?;
    Ok((LENGTH_PREFIX_LEN + payload.len()) as u64)
}

/// Compress `data` with `codec` and write it as one chunk.
pub fn write_chunk<W: Write, C: Codec + ?Sized>(
    writer: &mut W,
    codec: &C,
    data: &[u8],
) -> Result<u64> {
    let frame = codec.compress(data)?;
    write_raw_chunk(writer, &frame)
}

/// A chunk located inside an archive buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawChunk<'a> {
    /// The undecoded payload.
    pub payload: &'a [u8],
    /// Offset of the length prefix.
    pub start: usize,
    /// Offset of the first byte after the payload.
    pub end: usize,
}

impl RawChunk<'_> {
    /// Byte span of the whole chunk, length prefix included.
    pub fn span(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Locate the chunk whose length prefix starts at `offset`.
pub fn read_raw_chunk(buffer: &[u8], offset: usize) -> Result<RawChunk<'_>> {
    let payload_start = offset
        .checked_add(LENGTH_PREFIX_LEN)
        .filter(|&start| start <= buffer.len())
        .ok_or_else(|| CompressFlyError::truncated(offset, LENGTH_PREFIX_LEN))?;

    let mut prefix = [0u8; LENGTH_PREFIX_LEN];
    prefix.copy_from_slice(&buffer[offset..payload_start]);
    let declared = decode_length(prefix);

    let available = buffer.len() - payload_start;
    if declared > available as u128 {
        return Err(CompressFlyError::corrupted(
            offset,
            format!("chunk declares {declared} bytes but only {available} remain"),
        ));
    }

    let end = payload_start + declared as usize;
    Ok(RawChunk {
        payload: &buffer[payload_start..end],
        start: offset,
        end,
    })
}

/// Read and decompress the chunk at `offset`.
///
/// Returns the decoded bytes and the offset of the next chunk.
pub fn read_chunk<C: Codec + ?Sized>(
    buffer: &[u8],
    offset: usize,
    codec: &C,
) -> Result<(Vec<u8>, usize)> {
    let chunk = read_raw_chunk(buffer, offset)?;
    let data = codec.decompress(chunk.payload)?;
    Ok((data, chunk.end))
}
