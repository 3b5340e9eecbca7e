//! In-place archive maintenance: remove and update.
//!
//! Removal copies the metadata chunk and every kept entry byte for byte, so
//! nothing is re-encoded. The archive file is only rewritten once the whole
//! buffer has parsed cleanly.

use std::fs;
use std::path::Path;

use compressfly_core::error::{CompressFlyError, Result};
use tracing::{debug, info};

use crate::algorithm::CompressionAlgorithm;
use crate::builder::{BuildOptions, BuildSummary, EntryWriter};
use crate::extract::describe_failure;
use crate::reader::ArchiveReader;

/// An archive buffer with some entries filtered out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredArchive {
    /// Codec named by the archive.
    pub algorithm: CompressionAlgorithm,
    /// Metadata chunk plus the kept entries.
    pub bytes: Vec<u8>,
    /// Number of entries dropped.
    pub removed: usize,
}

/// Drop every entry whose path starts with one of `prefixes`.
pub fn filter_entries<S: AsRef<str>>(buffer: &[u8], prefixes: &[S]) -> Result<FilteredArchive> {
    let mut reader = ArchiveReader::new(buffer)?;
    let algorithm = reader.algorithm();
    let mut bytes = buffer[reader.metadata_span()].to_vec();
    let mut removed = 0;

    while let Some(record) = reader.next_entry()? {
        if record.entry.matches_prefix(prefixes) {
            debug!(name = %record.entry.name, "dropping entry");
            removed += 1;
        } else {
            bytes.extend_from_slice(&buffer[record.entry.span.clone()]);
        }
    }

    Ok(FilteredArchive {
        algorithm,
        bytes,
        removed,
    })
}

fn read_filtered<S: AsRef<str>>(archive: &Path, prefixes: &[S]) -> Result<FilteredArchive> {
    let buffer = fs::read(archive)?;
    filter_entries(&buffer, prefixes).map_err(|e| {
        if e.is_format_error() {
            CompressFlyError::not_an_archive(archive, describe_failure(&e))
        } else {
            e
        }
    })
}

/// Remove every entry whose path starts with one of `prefixes`.
///
/// Returns the number of entries removed. An archive that does not parse is
/// reported as [`CompressFlyError::NotAValidArchive`] and left untouched;
/// when nothing matches the file is not rewritten.
pub fn remove_entries<S: AsRef<str>>(archive: impl AsRef<Path>, prefixes: &[S]) -> Result<usize> {
    let archive = archive.as_ref();
    let filtered = read_filtered(archive, prefixes)?;

    if filtered.removed > 0 {
        fs::write(archive, &filtered.bytes)?;
    }
    info!(
        archive = %archive.display(),
        removed = filtered.removed,
        "removed entries"
    );
    Ok(filtered.removed)
}

/// Replace the entries for `paths` with freshly encoded ones.
///
/// Existing entries under each path are dropped, then the paths are encoded
/// with the archive's own codec and appended. The new archive is assembled
/// in memory and written once, so a failed update leaves the file as it was.
pub fn update_entries<S: AsRef<str>>(
    archive: impl AsRef<Path>,
    paths: &[S],
    options: &BuildOptions,
) -> Result<BuildSummary> {
    let archive = archive.as_ref();
    let filtered = read_filtered(archive, paths)?;
    let mut bytes = filtered.bytes;

    let mut writer = EntryWriter::new(&mut bytes, filtered.algorithm, &options.ignore);
    writer.add_roots(paths)?;
    let summary = writer.finish()?;

    fs::write(archive, &bytes)?;
    info!(
        archive = %archive.display(),
        replaced = filtered.removed,
        files = summary.files,
        directories = summary.directories,
        "updated archive"
    );
    Ok(summary)
}
