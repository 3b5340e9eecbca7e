//! # compressFly LZ
//!
//! LZ78-style dictionary coding over raw bytes.
//!
//! ## Format
//!
//! The encoder keeps a dictionary of phrases numbered from 1. Each step
//! extends the current phrase while it is known; the first unknown extension
//! is registered and emitted as the index of the known prefix plus the new
//! byte (index 0 when there is no prefix). A phrase still pending at the end
//! of the input is emitted as `!@#` followed by its index.
//!
//! Indices of 256 and above are written with the `*^&` escape marker, once
//! for two-byte indices and twice for three-byte indices. The dictionary
//! stops growing at [`MAX_DICTIONARY_INDEX`].
//!
//! ## Example
//!
//! ```rust
//! use compressfly_lz::{compress, decompress};
//!
//! let original = b"TOBEORNOTTOBEORTOBEORNOT";
//! let compressed = compress(original).unwrap();
//! let decompressed = decompress(&compressed).unwrap();
//! assert_eq!(decompressed, original);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

mod codec;
mod decoder;
mod dictionary;
mod encoder;
pub mod token;

pub use codec::{LZ_TAG, LempelZivCodec};
pub use decoder::LzDecoder;
pub use dictionary::{MAX_DICTIONARY_INDEX, PhraseDictionary, PhraseTable};
pub use encoder::LzEncoder;
pub use token::Token;

use compressfly_core::Result;

/// Compress `data`.
pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    LzEncoder::new().encode(data)
}

/// Decompress Lempel-Ziv data.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    LzDecoder::new().decode(data)
}
