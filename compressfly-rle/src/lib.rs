//! # compressFly RLE
//!
//! Run-length encoding over fixed-width windows.
//!
//! ## Format
//!
//! - Non-repeating windows are copied through with no overhead
//! - A run of `n` (2..=255) identical windows becomes `*^&`, one count byte,
//!   then the window bytes
//! - Runs longer than 255 windows are split into several run segments
//!
//! Metadata is the tag `RleCompression` followed by one byte holding the
//! window width.
//!
//! ## Example
//!
//! ```rust
//! use compressfly_rle::{compress, decompress};
//!
//! let original = b"ABCSDDDDDD";
//! let compressed = compress(original, 1).unwrap();
//! assert_eq!(&compressed[..4], b"ABCS");
//!
//! let decompressed = decompress(&compressed, 1).unwrap();
//! assert_eq!(decompressed, original);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

mod rle;

pub use rle::{DEFAULT_CHUNK_WIDTH, MAX_RUN, RLE_TAG, RleCodec};

use compressfly_core::Result;

/// Compress `data` with windows of `chunk_width` bytes.
pub fn compress(data: &[u8], chunk_width: u8) -> Result<Vec<u8>> {
    Ok(RleCodec::new(chunk_width)?.encode(data))
}

/// Decompress RLE data produced with windows of `chunk_width` bytes.
pub fn decompress(data: &[u8], chunk_width: u8) -> Result<Vec<u8>> {
    RleCodec::new(chunk_width)?.decode(data)
}
