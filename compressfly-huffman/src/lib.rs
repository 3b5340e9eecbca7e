//! # compressFly Huffman
//!
//! Huffman coding with a codebook embedded in every encoded buffer.
//!
//! Codes are derived from the byte frequencies of the input; ties are broken
//! by insertion order so the same input always yields the same output. The
//! inverse codebook travels with the data as JSON text, so decoding needs no
//! outside state.
//!
//! Trailing ASCII whitespace is dropped before encoding.
//!
//! ## Example
//!
//! ```rust
//! use compressfly_huffman::{compress, decompress};
//!
//! let original = b"abracadabra";
//! let compressed = compress(original).unwrap();
//! assert_eq!(decompress(&compressed).unwrap(), original);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

mod codec;
pub mod table;
pub mod tree;

pub use codec::{HUFFMAN_TAG, HuffmanCodec, strip_trailing_whitespace};
pub use tree::{Codebook, FrequencyTable};

use compressfly_core::Result;

/// Compress `data` with a freshly built codebook.
pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    HuffmanCodec::new().encode(data)
}

/// Decompress Huffman-encoded data.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    HuffmanCodec::new().decode(data)
}
