//! MSB-first bit stream operations.
//!
//! Huffman codes are packed most significant bit first: the first code bit
//! lands in bit 7 of the first output byte, and the final byte is padded with
//! zero bits.

use crate::error::{CompressFlyError, Result};

/// MSB-first bit writer.
#[derive(Debug, Default)]
pub struct MsbBitWriter {
    /// Output buffer.
    output: Vec<u8>,
    /// Bit buffer (MSB-first).
    buffer: u8,
    /// Number of bits in buffer.
    bits_in_buffer: u8,
}

impl MsbBitWriter {
    /// Create a new MSB bit writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with room for `capacity` output bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            output: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    /// Write a single bit.
    #[inline]
    pub fn write_bit(&mut self, bit: bool) {
        self.buffer = (self.buffer << 1) | u8::from(bit);
        self.bits_in_buffer += 1;

        if self.bits_in_buffer == 8 {
            self.output.push(self.buffer);
            self.buffer = 0;
            self.bits_in_buffer = 0;
        }
    }

    /// Write a textual bit string made of `'0'` and `'1'` characters.
    pub fn write_code(&mut self, code: &str) -> Result<()> {
        for c in code.bytes() {
            match c {
                b'0' => self.write_bit(false),
                b'1' => self.write_bit(true),
                other => {
                    return Err(CompressFlyError::invalid_parameter(format!(
                        "invalid bit character {:?}",
                        other as char
                    )));
                }
            }
        }
        Ok(())
    }

    /// Number of zero bits the final flush will append (0..=7).
    pub fn pending_padding(&self) -> u8 {
        if self.bits_in_buffer == 0 {
            0
        } else {
            8 - self.bits_in_buffer
        }
    }

    /// Flush remaining bits padded with zeros and return the output.
    pub fn into_vec(mut self) -> Vec<u8> {
        if self.bits_in_buffer > 0 {
            let remaining = 8 - self.bits_in_buffer;
            self.output.push(self.buffer << remaining);
        }
        self.output
    }
}

/// MSB-first bit reader over a byte slice.
#[derive(Debug)]
pub struct MsbBitReader<'a> {
    /// Input data.
    data: &'a [u8],
    /// Index of the next bit to read.
    position: u64,
    /// Number of readable bits (excludes trailing padding).
    limit: u64,
}

impl<'a> MsbBitReader<'a> {
    /// Create a reader that ignores the last `padding` bits of `data`.
    pub fn with_padding(data: &'a [u8], padding: u8) -> Result<Self> {
        let total = data.len() as u64 * 8;
        if u64::from(padding) > total || padding > 7 {
            return Err(CompressFlyError::corrupted(
                0,
                format!("invalid padding of {padding} bits for {} bytes", data.len()),
            ));
        }
        Ok(Self {
            data,
            position: 0,
            limit: total - u64::from(padding),
        })
    }

    /// Read one bit, or `None` once the readable bits are exhausted.
    #[inline]
    pub fn read_bit(&mut self) -> Option<bool> {
        if self.position >= self.limit {
            return None;
        }
        let byte = self.data[(self.position / 8) as usize];
        let bit = (byte >> (7 - (self.position % 8))) & 1 == 1;
        self.position += 1;
        Some(bit)
    }

    /// Get total bits read.
    pub fn bits_read(&self) -> u64 {
        self.position
    }
}
