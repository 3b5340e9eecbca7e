//! Extraction, listing and validation.
//!
//! All three walk the archive with [`ArchiveReader`] and decode every chunk;
//! only [`ExtractMode::Extract`] touches the filesystem. When an archive
//! turns out to be invalid partway, the files already extracted from it are
//! removed again.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use compressfly_core::entry::ArchiveEntry;
use compressfly_core::error::{CompressFlyError, Result};
use tracing::{debug, info, warn};

use crate::algorithm::CompressionAlgorithm;
use crate::cleanup::CleanupList;
use crate::reader::ArchiveReader;

/// What to do with each decoded entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractMode {
    /// Write files and empty directories below the output directory.
    #[default]
    Extract,
    /// Decode and list entries without writing anything.
    View,
    /// Decode entries only to check that the archive is well formed.
    Validate,
}

impl ExtractMode {
    /// Whether this mode writes to disk.
    pub fn writes(&self) -> bool {
        matches!(self, Self::Extract)
    }
}

/// Result of decoding one archive.
#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveListing {
    /// The archive that was read.
    pub archive: PathBuf,
    /// Codec named by the archive.
    pub algorithm: CompressionAlgorithm,
    /// Entries in archive order.
    pub entries: Vec<ArchiveEntry>,
    /// Files and directories written, in extraction order.
    pub extracted: Vec<PathBuf>,
}

impl ArchiveListing {
    /// Total uncompressed size of all file entries.
    pub fn total_size(&self) -> u64 {
        self.entries.iter().map(|entry| entry.size).sum()
    }

    /// Total size of all entry chunks.
    pub fn total_compressed_size(&self) -> u64 {
        self.entries.iter().map(|entry| entry.compressed_size).sum()
    }
}

/// Outcome of a batch operation over several archives.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    /// Archives decoded successfully, in input order.
    pub listings: Vec<ArchiveListing>,
    /// Archives that failed, with a description of the failure.
    pub invalid: BTreeMap<PathBuf, String>,
}

impl BatchReport {
    /// Whether every archive was valid.
    pub fn is_clean(&self) -> bool {
        self.invalid.is_empty()
    }
}

/// Describe a failure the way batch reports record it, e.g.
/// `CorruptStream(Corrupted data at offset 16: ...)`.
pub fn describe_failure(error: &CompressFlyError) -> String {
    format!("{}({error})", error.kind())
}

fn check_deadline(deadline: Option<(Instant, Duration)>) -> Result<()> {
    match deadline {
        Some((at, timeout)) if Instant::now() >= at => Err(CompressFlyError::Timeout {
            seconds: timeout.as_secs(),
        }),
        _ => Ok(()),
    }
}

fn decode_archive(
    archive: &Path,
    output_dir: &Path,
    mode: ExtractMode,
    deadline: Option<(Instant, Duration)>,
    cleanup: &mut CleanupList,
) -> Result<ArchiveListing> {
    let buffer = fs::read(archive)?;
    let mut reader = ArchiveReader::new(&buffer)?;
    let mut listing = ArchiveListing {
        archive: archive.to_path_buf(),
        algorithm: reader.algorithm(),
        entries: Vec::new(),
        extracted: Vec::new(),
    };

    loop {
        check_deadline(deadline)?;
        let Some(record) = reader.next_entry()? else {
            break;
        };

        if mode.writes() {
            let target = output_dir.join(record.entry.sanitized_name());
            if record.entry.is_dir() {
                fs::create_dir_all(&target)?;
            } else {
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(&target, &record.data)?;
                cleanup.remove_file(&target);
            }
            debug!(path = %target.display(), "extracted entry");
            listing.extracted.push(target);
        }

        listing.entries.push(record.entry);
    }

    Ok(listing)
}

fn decode_with_cleanup(
    archive: &Path,
    output_dir: &Path,
    mode: ExtractMode,
    deadline: Option<(Instant, Duration)>,
) -> Result<ArchiveListing> {
    let mut cleanup = CleanupList::new();
    match decode_archive(archive, output_dir, mode, deadline, &mut cleanup) {
        Ok(listing) => {
            cleanup.commit();
            Ok(listing)
        }
        // Files written before a timeout are kept.
        Err(e @ CompressFlyError::Timeout { .. }) => {
            cleanup.commit();
            Err(e)
        }
        Err(e) => {
            cleanup.run();
            Err(e)
        }
    }
}

/// Decode a single archive.
///
/// Format errors are reported as [`CompressFlyError::NotAValidArchive`].
/// Files extracted before the failure are removed.
pub fn decompress_archive(
    archive: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    mode: ExtractMode,
) -> Result<ArchiveListing> {
    let archive = archive.as_ref();
    decode_with_cleanup(archive, output_dir.as_ref(), mode, None).map_err(|e| {
        if e.is_format_error() {
            CompressFlyError::not_an_archive(archive, describe_failure(&e))
        } else {
            e
        }
    })
}

/// Decode several archives, isolating failures per archive.
///
/// See [`decompress_archives_with`].
pub fn decompress_archives<P: AsRef<Path>>(
    archives: &[P],
    output_dir: impl AsRef<Path>,
    mode: ExtractMode,
    timeout: Option<Duration>,
) -> Result<BatchReport> {
    decompress_archives_with(archives, output_dir, mode, timeout, |_, _| {})
}

/// Decode several archives, calling `on_archive` after each one.
///
/// A failing archive is recorded in [`BatchReport::invalid`] and does not
/// stop the batch. The only error returned is
/// [`CompressFlyError::Timeout`], checked between entries, in which case
/// files already written stay on disk.
pub fn decompress_archives_with<P, F>(
    archives: &[P],
    output_dir: impl AsRef<Path>,
    mode: ExtractMode,
    timeout: Option<Duration>,
    mut on_archive: F,
) -> Result<BatchReport>
where
    P: AsRef<Path>,
    F: FnMut(&Path, bool),
{
    let output_dir = output_dir.as_ref();
    // A timeout too large to represent as an instant means no deadline.
    let deadline =
        timeout.and_then(|timeout| Some((Instant::now().checked_add(timeout)?, timeout)));
    let mut report = BatchReport::default();

    for archive in archives {
        let archive = archive.as_ref();
        match decode_with_cleanup(archive, output_dir, mode, deadline) {
            Ok(listing) => {
                on_archive(archive, true);
                report.listings.push(listing);
            }
            Err(e @ CompressFlyError::Timeout { .. }) => return Err(e),
            Err(e) => {
                warn!(archive = %archive.display(), error = %e, "invalid archive");
                on_archive(archive, false);
                report.invalid.insert(archive.to_path_buf(), describe_failure(&e));
            }
        }
    }

    info!(
        valid = report.listings.len(),
        invalid = report.invalid.len(),
        ?mode,
        "processed archives"
    );
    Ok(report)
}

/// Check several archives without writing anything.
///
/// Returns the invalid archives with a description of each failure.
pub fn validate_archives<P: AsRef<Path>>(archives: &[P]) -> BTreeMap<PathBuf, String> {
    let mut invalid = BTreeMap::new();
    for archive in archives {
        let archive = archive.as_ref();
        if let Err(e) = decode_with_cleanup(archive, Path::new(""), ExtractMode::Validate, None) {
            warn!(archive = %archive.display(), error = %e, "invalid archive");
            invalid.insert(archive.to_path_buf(), describe_failure(&e));
        }
    }
    invalid
}
