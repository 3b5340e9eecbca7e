//! Token wire format.
//!
//! ```text
//! literal:  0x00 byte
//! phrase:   index byte
//! final:    !@# index
//!
//! index < 256:          [index]
//! index < 65536:        *^& [index / 256] [index % 256]
//! index < 2^24:         *^& *^& [a / 256] [a % 256] [index % 256]    (a = index / 256)
//! ```
//!
//! Escaped and end markers are recognized positionally, so an encoder must
//! make sure that its token bytes never spell a marker by accident. See
//! [`crate::encoder`].

use compressfly_core::error::{CompressFlyError, Result};
use compressfly_core::markers::{BYTE_RADIX, END_OF_DATA_MARKER, ESCAPE_MARKER, MARKER_LEN, marker_at};

const RADIX: u32 = BYTE_RADIX as u32;

/// Largest index representable with two levels of escaping.
pub const MAX_ENCODABLE_INDEX: u32 = RADIX * RADIX * RADIX - 1;

/// One unit of the encoded stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// A new single-byte phrase.
    Literal(u8),
    /// An existing phrase extended by one byte.
    Phrase {
        /// Dictionary index of the existing phrase.
        index: u32,
        /// Byte appended to it.
        byte: u8,
    },
    /// A trailing phrase with no extension; always the last token.
    Final {
        /// Dictionary index of the phrase.
        index: u32,
    },
}

impl Token {
    /// Append the encoded token to `output`.
    pub fn write(&self, output: &mut Vec<u8>) -> Result<()> {
        match *self {
            Token::Literal(byte) => {
                output.push(0);
                output.push(byte);
            }
            Token::Phrase { index, byte } => {
                if index == 0 {
                    return Err(CompressFlyError::invalid_parameter(
                        "phrase index 0 is reserved for literals",
                    ));
                }
                encode_index(index, output)?;
                output.push(byte);
            }
            Token::Final { index } => {
                output.extend_from_slice(END_OF_DATA_MARKER);
                encode_index(index, output)?;
            }
        }
        Ok(())
    }
}

/// Append the escaped encoding of `index` to `output`.
pub fn encode_index(index: u32, output: &mut Vec<u8>) -> Result<()> {
    if index < RADIX {
        output.push(index as u8);
        return Ok(());
    }
    if index > MAX_ENCODABLE_INDEX {
        return Err(CompressFlyError::invalid_parameter(format!(
            "dictionary index {index} needs more than two escape levels"
        )));
    }

    output.extend_from_slice(ESCAPE_MARKER);
    let high = index / RADIX;
    if high >= RADIX {
        output.extend_from_slice(ESCAPE_MARKER);
        output.push((high / RADIX) as u8);
        output.push((high % RADIX) as u8);
    } else {
        output.push(high as u8);
    }
    output.push((index % RADIX) as u8);
    Ok(())
}

fn byte_at(data: &[u8], pos: usize) -> Result<u8> {
    data.get(pos)
        .copied()
        .ok_or_else(|| CompressFlyError::truncated(pos, 1))
}

/// Decode an index at `pos`, returning it with the number of bytes consumed.
pub fn decode_index(data: &[u8], pos: usize) -> Result<(u32, usize)> {
    if !marker_at(data, pos, ESCAPE_MARKER) {
        return Ok((u32::from(byte_at(data, pos)?), 1));
    }

    let inner = pos + MARKER_LEN;
    if marker_at(data, inner, ESCAPE_MARKER) {
        let start = inner + MARKER_LEN;
        let high = u32::from(byte_at(data, start)?) * RADIX + u32::from(byte_at(data, start + 1)?);
        let low = u32::from(byte_at(data, start + 2)?);
        return Ok((high * RADIX + low, 2 * MARKER_LEN + 3));
    }

    let high = u32::from(byte_at(data, inner)?);
    let low = u32::from(byte_at(data, inner + 1)?);
    Ok((high * RADIX + low, MARKER_LEN + 2))
}

/// Parse the token starting at `pos`.
///
/// Returns the token and its encoded length. Recognition order matters: a
/// zero byte is a literal, then the escape marker, then the end marker (only
/// when at least one index byte follows it), and anything else is a single
/// byte phrase index.
pub fn parse_token(data: &[u8], pos: usize) -> Result<(Token, usize)> {
    let first = byte_at(data, pos)?;

    if first == 0 {
        let byte = byte_at(data, pos + 1)?;
        return Ok((Token::Literal(byte), 2));
    }

    if marker_at(data, pos, ESCAPE_MARKER) {
        let (index, len) = decode_index(data, pos)?;
        let byte = byte_at(data, pos + len)?;
        return Ok((Token::Phrase { index, byte }, len + 1));
    }

    if pos + MARKER_LEN < data.len() && marker_at(data, pos, END_OF_DATA_MARKER) {
        let (index, len) = decode_index(data, pos + MARKER_LEN)?;
        return Ok((Token::Final { index }, MARKER_LEN + len));
    }

    let byte = byte_at(data, pos + 1)?;
    Ok((
        Token::Phrase {
            index: u32::from(first),
            byte,
        },
        2,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(index: u32) -> Vec<u8> {
        let mut output = Vec::new();
        encode_index(index, &mut output).unwrap();
        output
    }

    #[test]
    fn test_index_255_is_one_byte() {
        assert_eq!(encoded(255), vec![255]);
        assert_eq!(decode_index(&[255], 0).unwrap(), (255, 1));
    }

    #[test]
    fn test_index_256_is_escaped_once() {
        let bytes = encoded(256);
        assert_eq!(&bytes[..MARKER_LEN], ESCAPE_MARKER);
        assert_eq!(&bytes[MARKER_LEN..], &[1, 0]);
        assert_eq!(decode_index(&bytes, 0).unwrap(), (256, 5));
    }

    #[test]
    fn test_index_65535_is_escaped_once() {
        let bytes = encoded(65535);
        assert_eq!(bytes.len(), MARKER_LEN + 2);
        assert_eq!(&bytes[MARKER_LEN..], &[255, 255]);
        assert_eq!(decode_index(&bytes, 0).unwrap(), (65535, 5));
    }

    #[test]
    fn test_index_65536_is_escaped_twice() {
        let bytes = encoded(65536);
        assert_eq!(&bytes[..MARKER_LEN], ESCAPE_MARKER);
        assert_eq!(&bytes[MARKER_LEN..2 * MARKER_LEN], ESCAPE_MARKER);
        assert_eq!(&bytes[2 * MARKER_LEN..], &[1, 0, 0]);
        assert_eq!(decode_index(&bytes, 0).unwrap(), (65536, 9));
    }

    #[test]
    fn test_index_ceiling() {
        let bytes = encoded(MAX_ENCODABLE_INDEX);
        assert_eq!(decode_index(&bytes, 0).unwrap().0, MAX_ENCODABLE_INDEX);

        let mut output = Vec::new();
        assert!(encode_index(MAX_ENCODABLE_INDEX + 1, &mut output).is_err());
    }

    #[test]
    fn test_parse_each_token_kind() {
        let mut data = Vec::new();
        let tokens = [
            Token::Literal(b'a'),
            Token::Phrase { index: 1, byte: b'b' },
            Token::Phrase { index: 300, byte: b'c' },
            Token::Phrase { index: 70_000, byte: b'd' },
            Token::Final { index: 2 },
        ];
        for token in &tokens {
            token.write(&mut data).unwrap();
        }

        let mut pos = 0;
        for expected in tokens {
            let (token, len) = parse_token(&data, pos).unwrap();
            assert_eq!(token, expected);
            pos += len;
        }
        assert_eq!(pos, data.len());
    }

    #[test]
    fn test_bare_end_marker_is_a_phrase() {
        // Without a following index byte the end marker is not recognized.
        let (token, len) = parse_token(b"!@#", 0).unwrap();
        assert_eq!(
            token,
            Token::Phrase {
                index: u32::from(b'!'),
                byte: b'@'
            }
        );
        assert_eq!(len, 2);
    }

    #[test]
    fn test_truncated_tokens() {
        assert!(parse_token(&[0], 0).is_err());
        assert!(parse_token(&[5], 0).is_err());
        assert!(parse_token(b"*^&\x01", 0).is_err());
        assert!(parse_token(b"*^&\x01\x02", 0).is_err());
        assert!(parse_token(b"*^&*^&\x01\x02", 0).is_err());
    }

    #[test]
    fn test_phrase_zero_rejected() {
        let mut output = Vec::new();
        assert!(Token::Phrase { index: 0, byte: 1 }.write(&mut output).is_err());
    }
}
