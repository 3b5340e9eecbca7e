//! Lempel-Ziv encoder (compression).
//!
//! Markers in the token stream are recognized by position only. A phrase
//! token such as `[42, b'^']` followed by a token starting with `b'&'` reads
//! back as an escape marker, so after encoding the stream is parsed again
//! with the decoder's own token parser and rejected if any token would be
//! read differently.

use compressfly_core::error::{CompressFlyError, Result};

use crate::dictionary::{MAX_DICTIONARY_INDEX, PhraseDictionary};
use crate::token::{Token, parse_token};

/// LZ78-style encoder.
#[derive(Debug, Clone, Copy)]
pub struct LzEncoder {
    max_index: u32,
}

impl LzEncoder {
    /// Create an encoder with the default dictionary ceiling.
    pub fn new() -> Self {
        Self {
            max_index: MAX_DICTIONARY_INDEX,
        }
    }

    /// Create an encoder whose dictionary freezes at `max_index`.
    ///
    /// The matching [`crate::LzDecoder`] must use the same ceiling.
    pub fn with_max_index(max_index: u32) -> Result<Self> {
        Ok(Self {
            max_index: crate::dictionary::validate_max_index(max_index)?,
        })
    }

    /// Split `input` into tokens.
    pub fn tokenize(&self, input: &[u8]) -> Result<Vec<Token>> {
        let mut dict = PhraseDictionary::new(self.max_index)?;
        let mut tokens = Vec::new();
        let mut current = 0u32;

        for &byte in input {
            if let Some(index) = dict.find(current, byte) {
                current = index;
                continue;
            }

            dict.insert(current, byte);
            tokens.push(if current == 0 {
                Token::Literal(byte)
            } else {
                Token::Phrase {
                    index: current,
                    byte,
                }
            });
            current = 0;
        }

        if current != 0 {
            tokens.push(Token::Final { index: current });
        }

        Ok(tokens)
    }

    /// Encode `input`.
    ///
    /// Fails with [`CompressFlyError::AmbiguousEncoding`] when the token
    /// stream would not parse back unambiguously.
    pub fn encode(&self, input: &[u8]) -> Result<Vec<u8>> {
        let tokens = self.tokenize(input)?;

        let mut output = Vec::with_capacity(input.len());
        let mut offsets = Vec::with_capacity(tokens.len() + 1);
        for token in &tokens {
            offsets.push(output.len());
            token.write(&mut output)?;
        }
        offsets.push(output.len());

        for (i, token) in tokens.iter().enumerate() {
            let start = offsets[i];
            let (parsed, len) = parse_token(&output, start)
                .map_err(|_| CompressFlyError::ambiguous(start))?;
            if parsed != *token || start + len != offsets[i + 1] {
                return Err(CompressFlyError::ambiguous(start));
            }
        }

        Ok(output)
    }
}

impl Default for LzEncoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_simple() {
        let tokens = LzEncoder::new().tokenize(b"ABAAB").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Literal(b'A'),
                Token::Literal(b'B'),
                Token::Phrase {
                    index: 1,
                    byte: b'A'
                },
                Token::Final { index: 2 },
            ]
        );
    }

    #[test]
    fn test_encode_bytes() {
        let encoded = LzEncoder::new().encode(b"AAB").unwrap();
        assert_eq!(encoded, vec![0, b'A', 1, b'B']);
    }

    #[test]
    fn test_pending_phrase_gets_end_marker() {
        let encoded = LzEncoder::new().encode(b"AA").unwrap();
        assert_eq!(encoded, vec![0, b'A', b'!', b'@', b'#', 1]);
    }

    #[test]
    fn test_empty_input() {
        assert!(LzEncoder::new().encode(b"").unwrap().is_empty());
    }

    #[test]
    fn test_frozen_dictionary_keeps_matching() {
        let encoder = LzEncoder::with_max_index(1).unwrap();
        let tokens = encoder.tokenize(b"AAAA").unwrap();
        // Only "A" is ever registered.
        assert_eq!(
            tokens,
            vec![
                Token::Literal(b'A'),
                Token::Phrase {
                    index: 1,
                    byte: b'A'
                },
                Token::Final { index: 1 },
            ]
        );
    }

    #[test]
    fn test_ambiguous_stream_rejected() {
        // 42 distinct literals register phrases 1..=42. Phrase 42 followed
        // by '^' and then phrase 38 ('&') spells the escape marker.
        let mut input: Vec<u8> = (0xA0..0xA0 + 42).collect();
        input.push(0xA0 + 41);
        input.push(b'^');
        input.push(0xA0 + 37);
        input.push(b'x');

        let result = LzEncoder::new().encode(&input);
        assert!(matches!(
            result,
            Err(CompressFlyError::AmbiguousEncoding { offset: 84 })
        ));
    }
}
