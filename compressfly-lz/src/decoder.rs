//! Lempel-Ziv decoder (decompression).

use compressfly_core::error::{CompressFlyError, Result};

use crate::dictionary::{MAX_DICTIONARY_INDEX, PhraseTable};
use crate::token::{Token, parse_token};

/// LZ78-style decoder.
#[derive(Debug, Clone, Copy)]
pub struct LzDecoder {
    max_index: u32,
}

impl LzDecoder {
    /// Create a decoder with the default dictionary ceiling.
    pub fn new() -> Self {
        Self {
            max_index: MAX_DICTIONARY_INDEX,
        }
    }

    /// Create a decoder whose dictionary freezes at `max_index`.
    pub fn with_max_index(max_index: u32) -> Result<Self> {
        Ok(Self {
            max_index: crate::dictionary::validate_max_index(max_index)?,
        })
    }

    /// Decode `input`.
    pub fn decode(&self, input: &[u8]) -> Result<Vec<u8>> {
        let mut table = PhraseTable::new(self.max_index)?;
        let mut output = Vec::with_capacity(input.len() * 2);
        let mut pos = 0;

        while pos < input.len() {
            let (token, len) = parse_token(input, pos)?;
            let start = output.len();

            match token {
                Token::Literal(byte) => {
                    output.push(byte);
                    table.push(start..output.len());
                }
                Token::Phrase { index, byte } => {
                    let span = table.span(index).ok_or_else(|| unknown_index(pos, index))?;
                    output.extend_from_within(span);
                    output.push(byte);
                    table.push(start..output.len());
                }
                Token::Final { index } => {
                    let span = table.span(index).ok_or_else(|| unknown_index(pos, index))?;
                    output.extend_from_within(span);
                    if pos + len != input.len() {
                        return Err(CompressFlyError::corrupted(
                            pos + len,
                            "data after end-of-data marker",
                        ));
                    }
                }
            }

            pos += len;
        }

        Ok(output)
    }
}

impl Default for LzDecoder {
    fn default() -> Self {
        Self::new()
    }
}

fn unknown_index(pos: usize, index: u32) -> CompressFlyError {
    CompressFlyError::corrupted(pos, format!("dictionary index {index} is not defined"))
}
