//! # compressFly Archive
//!
//! The compressFly archive container.
//!
//! An archive is a flat sequence of length-prefixed chunks. The first chunk
//! names the codec; every following chunk is encoded with it:
//!
//! ```text
//! [16-byte BE length][codec metadata]
//! [16-byte BE length][encoded path]   [16-byte BE length][encoded payload]
//! [16-byte BE length][encoded "dir/"]
//! ...
//! ```
//!
//! - [`algorithm`]: the codec named by an archive
//! - [`chunk`]: length-prefixed chunk framing
//! - [`builder`]: build new archives and append to existing ones
//! - [`reader`]: walk the entries of an archive buffer
//! - [`extract`]: extract, view and validate, singly or in batches
//! - [`mutate`]: remove and update entries in place
//!
//! ## Example
//!
//! ```rust,no_run
//! use compressfly_archive::{
//!     BuildOptions, CompressionAlgorithm, ExtractMode, build_archive, decompress_archive,
//! };
//!
//! build_archive(
//!     "docs.cfly",
//!     CompressionAlgorithm::lempel_ziv(),
//!     &["docs"],
//!     &BuildOptions::default(),
//! )
//! .unwrap();
//!
//! let listing = decompress_archive("docs.cfly", "out", ExtractMode::Extract).unwrap();
//! println!("{} entries", listing.entries.len());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod algorithm;
pub mod builder;
pub mod chunk;
pub mod cleanup;
pub mod extract;
pub mod mutate;
pub mod reader;

// Re-exports
pub use algorithm::CompressionAlgorithm;
pub use builder::{BuildOptions, BuildSummary, EntryWriter, IgnoreRules, append_to_archive, build_archive};
pub use chunk::{LENGTH_PREFIX_LEN, read_chunk, write_chunk};
pub use cleanup::CleanupList;
pub use extract::{
    ArchiveListing, BatchReport, ExtractMode, decompress_archive, decompress_archives,
    decompress_archives_with, describe_failure, validate_archives,
};
pub use mutate::{FilteredArchive, filter_entries, remove_entries, update_entries};
pub use reader::{ArchiveReader, EntryRecord};
