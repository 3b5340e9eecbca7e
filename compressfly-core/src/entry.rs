//! Archive entry metadata.
//!
//! This module defines the `ArchiveEntry` struct that describes one file or
//! empty-directory record inside an archive, as produced by the reader.

use std::ops::Range;
use std::path::{Component, Path, PathBuf};

/// Suffix marking a directory path inside an archive.
pub const FOLDER_SUFFIX: char = '/';

/// Entry type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryType {
    /// Regular file: a path chunk followed by one payload chunk.
    #[default]
    File,
    /// Empty directory: a single path chunk ending in `/`.
    Directory,
}

impl EntryType {
    /// Classify a decoded path chunk.
    pub fn from_path(path: &str) -> Self {
        if path.ends_with(FOLDER_SUFFIX) {
            Self::Directory
        } else {
            Self::File
        }
    }

    /// Check if this is a file.
    pub fn is_file(&self) -> bool {
        matches!(self, Self::File)
    }

    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        matches!(self, Self::Directory)
    }
}

/// An entry in an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// The path as stored in the archive (directories keep the trailing `/`).
    pub name: String,
    /// The type of entry.
    pub entry_type: EntryType,
    /// Uncompressed payload size in bytes.
    pub size: u64,
    /// Size of the path and payload chunks, length prefixes included.
    pub compressed_size: u64,
    /// Byte span of the entry's chunks within the archive buffer.
    pub span: Range<usize>,
}

impl ArchiveEntry {
    /// Create a new file entry.
    pub fn file(name: impl Into<String>, size: u64, span: Range<usize>) -> Self {
        Self {
            name: name.into(),
            entry_type: EntryType::File,
            size,
            compressed_size: span.len() as u64,
            span,
        }
    }

    /// Create a new directory entry.
    pub fn directory(name: impl Into<String>, span: Range<usize>) -> Self {
        Self {
            name: name.into(),
            entry_type: EntryType::Directory,
            size: 0,
            compressed_size: span.len() as u64,
            span,
        }
    }

    /// Check if this is a file.
    pub fn is_file(&self) -> bool {
        self.entry_type.is_file()
    }

    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        self.entry_type.is_dir()
    }

    /// Check whether the stored path starts with any of `prefixes`.
    pub fn matches_prefix<S: AsRef<str>>(&self, prefixes: &[S]) -> bool {
        prefixes
            .iter()
            .any(|prefix| self.name.starts_with(prefix.as_ref()))
    }

    /// Get the compression ratio (compressed/uncompressed).
    pub fn compression_ratio(&self) -> f64 {
        if self.size == 0 {
            1.0
        } else {
            self.compressed_size as f64 / self.size as f64
        }
    }

    /// Get the space savings as a percentage.
    pub fn space_savings(&self) -> f64 {
        if self.size == 0 {
            0.0
        } else {
            (1.0 - self.compression_ratio()) * 100.0
        }
    }

    /// Get a sanitized path that's safe for extraction.
    ///
    /// Removes `..`, `.` and root components so that absolute paths stored in
    /// an archive are extracted relative to the output directory.
    pub fn sanitized_name(&self) -> PathBuf {
        sanitize_path(&self.name)
    }
}

/// Strip parent, current-dir and root components from an archive path.
pub fn sanitize_path(name: &str) -> PathBuf {
    Path::new(name)
        .components()
        .filter_map(|component| match component {
            Component::Normal(s) => Some(s),
            _ => None,
        })
        .collect()
}

impl std::fmt::Display for ArchiveEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - size [{}]", self.name, self.size)
    }
}
