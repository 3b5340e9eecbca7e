//! Embedded codebook serialization.
//!
//! The inverse codebook (`code -> byte`) is stored as compact JSON text,
//! preceded by its length:
//!
//! ```text
//! len < 256:   [len: u8] [table]
//! len >= 256:  *^& [len / 256: u8] [len % 256: u8] [table]
//! ```

use std::collections::BTreeMap;

use compressfly_core::error::{CompressFlyError, Result};
use compressfly_core::markers::{BYTE_RADIX, ESCAPE_MARKER, MARKER_LEN, marker_at};

/// Largest table the two-byte escaped length form can describe.
pub const MAX_TABLE_LEN: usize = BYTE_RADIX * BYTE_RADIX - 1;

/// Encode the length prefix for a table of `len` bytes.
pub fn encode_table_length(len: usize) -> Result<Vec<u8>> {
    if len < BYTE_RADIX {
        return Ok(vec![len as u8]);
    }
    if len > MAX_TABLE_LEN {
        return Err(CompressFlyError::invalid_parameter(format!(
            "codebook of {len} bytes exceeds the {MAX_TABLE_LEN} byte limit"
        )));
    }

    let mut prefix = ESCAPE_MARKER.to_vec();
    prefix.push((len / BYTE_RADIX) as u8);
    prefix.push((len % BYTE_RADIX) as u8);
    Ok(prefix)
}

/// Decode a table length prefix at the start of `data`.
///
/// Returns the table length and the number of prefix bytes consumed.
pub fn decode_table_length(data: &[u8]) -> Result<(usize, usize)> {
    if marker_at(data, 0, ESCAPE_MARKER) {
        let high = *data
            .get(MARKER_LEN)
            .ok_or_else(|| CompressFlyError::truncated(MARKER_LEN, 2))?;
        let low = *data
            .get(MARKER_LEN + 1)
            .ok_or_else(|| CompressFlyError::truncated(MARKER_LEN + 1, 1))?;
        return Ok((high as usize * BYTE_RADIX + low as usize, MARKER_LEN + 2));
    }

    let len = *data
        .first()
        .ok_or_else(|| CompressFlyError::truncated(0, 1))?;
    Ok((len as usize, 1))
}

/// Serialize the inverse codebook with its length prefix.
pub fn write_table(reverse: &BTreeMap<String, u8>, output: &mut Vec<u8>) -> Result<()> {
    let table = serde_json::to_vec(reverse)
        .map_err(|e| CompressFlyError::invalid_parameter(format!("codebook: {e}")))?;
    output.extend_from_slice(&encode_table_length(table.len())?);
    output.extend_from_slice(&table);
    Ok(())
}

/// Parse a length-prefixed codebook at the start of `data`.
///
/// Returns the inverse codebook and the offset of the first byte after it.
pub fn read_table(data: &[u8]) -> Result<(BTreeMap<String, u8>, usize)> {
    let (len, header) = decode_table_length(data)?;
    let end = header + len;
    let table = data
        .get(header..end)
        .ok_or_else(|| CompressFlyError::truncated(header, len))?;

    let reverse: BTreeMap<String, u8> = serde_json::from_slice(table)
        .map_err(|e| CompressFlyError::corrupted(header, format!("invalid codebook: {e}")))?;

    if let Some(bad) = reverse
        .keys()
        .find(|code| code.is_empty() || code.bytes().any(|b| b != b'0' && b != b'1'))
    {
        return Err(CompressFlyError::corrupted(
            header,
            format!("invalid code {bad:?} in codebook"),
        ));
    }

    Ok((reverse, end))
}
