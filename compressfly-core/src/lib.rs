//! # compressFly Core
//!
//! Core components for the compressFly archiver.
//!
//! This crate provides the building blocks shared by the codecs and the
//! archive container:
//!
//! - [`traits`]: the [`Codec`] capability every compression algorithm implements
//! - [`markers`]: reserved escape sequences and marker scanning
//! - [`bitstream`]: MSB-first bit I/O for variable-length codes (Huffman)
//! - [`entry`]: archive entry metadata
//! - [`error`]: error types
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ L3: Front-ends                                          │
//! │     compressfly CLI                                     │
//! ├─────────────────────────────────────────────────────────┤
//! │ L2: Container                                           │
//! │     chunk framer, archive builder/reader/mutator        │
//! ├─────────────────────────────────────────────────────────┤
//! │ L1: Codec                                               │
//! │     RLE, Huffman, Lempel-Ziv                            │
//! ├─────────────────────────────────────────────────────────┤
//! │ L0: Core (this crate)                                   │
//! │     Codec trait, markers, bit streams, errors           │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use compressfly_core::bitstream::{MsbBitReader, MsbBitWriter};
//! use compressfly_core::markers::{ESCAPE_MARKER, find_marker};
//!
//! let mut writer = MsbBitWriter::new();
//! writer.write_code("101").unwrap();
//! let bytes = writer.into_vec();
//!
//! let mut reader = MsbBitReader::with_padding(&bytes, 5).unwrap();
//! let bits: Vec<_> = std::iter::from_fn(|| reader.read_bit()).collect();
//! assert_eq!(bits, [true, false, true]);
//!
//! assert_eq!(find_marker(b"ab*^&", ESCAPE_MARKER), Some(2));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod bitstream;
pub mod entry;
pub mod error;
pub mod markers;
pub mod traits;

// Re-exports for convenience
pub use bitstream::{MsbBitReader, MsbBitWriter};
pub use entry::{ArchiveEntry, EntryType, FOLDER_SUFFIX};
pub use error::{CompressFlyError, Result};
pub use markers::{BYTE_RADIX, END_OF_DATA_MARKER, ESCAPE_MARKER, MARKER_LEN};
pub use traits::Codec;
