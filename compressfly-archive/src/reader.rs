//! Archive reader.
//!
//! Walks an in-memory archive one entry at a time:
//!
//! ```text
//! [metadata chunk] ([path chunk] [payload chunk] | [directory path chunk])*
//! ```
//!
//! The metadata chunk is stored raw; every other chunk is decoded with the
//! codec it names.

use std::ops::Range;

use compressfly_core::entry::{ArchiveEntry, EntryType};
use compressfly_core::error::{CompressFlyError, Result};
use tracing::debug;

use crate::algorithm::CompressionAlgorithm;
use crate::chunk::{read_chunk, read_raw_chunk};

/// One decoded entry together with its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRecord {
    /// Entry metadata.
    pub entry: ArchiveEntry,
    /// Decoded payload; empty for directories.
    pub data: Vec<u8>,
}

/// Iterator over the entries of an archive buffer.
///
/// Iteration stops after the first error.
#[derive(Debug)]
pub struct ArchiveReader<'a> {
    buffer: &'a [u8],
    algorithm: CompressionAlgorithm,
    metadata_end: usize,
    position: usize,
    failed: bool,
}

impl<'a> ArchiveReader<'a> {
    /// Parse the metadata chunk and position the reader at the first entry.
    pub fn new(buffer: &'a [u8]) -> Result<Self> {
        let metadata = read_raw_chunk(buffer, 0)?;
        let algorithm = CompressionAlgorithm::from_metadata(metadata.payload)?;
        debug!(codec = %algorithm, "read archive metadata");

        Ok(Self {
            buffer,
            algorithm,
            metadata_end: metadata.end,
            position: metadata.end,
            failed: false,
        })
    }

    /// The codec named by the archive.
    pub fn algorithm(&self) -> CompressionAlgorithm {
        self.algorithm
    }

    /// Byte span of the metadata chunk.
    pub fn metadata_span(&self) -> Range<usize> {
        0..self.metadata_end
    }

    /// Offset of the next entry.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Read the next entry, or `None` at the end of the buffer.
    pub fn next_entry(&mut self) -> Result<Option<EntryRecord>> {
        if self.position >= self.buffer.len() {
            return Ok(None);
        }

        let start = self.position;
        let (path, next) = read_chunk(self.buffer, start, &self.algorithm)?;
        let name = String::from_utf8(path)
            .map_err(|_| CompressFlyError::corrupted(start, "entry path is not valid UTF-8"))?;
        if name.is_empty() {
            return Err(CompressFlyError::corrupted(start, "empty entry path"));
        }

        let record = match EntryType::from_path(&name) {
            EntryType::Directory => EntryRecord {
                entry: ArchiveEntry::directory(name, start..next),
                data: Vec::new(),
            },
            EntryType::File => {
                let (data, end) = read_chunk(self.buffer, next, &self.algorithm)?;
                EntryRecord {
                    entry: ArchiveEntry::file(name, data.len() as u64, start..end),
                    data,
                }
            }
        };

        self.position = record.entry.span.end;
        debug!(
            name = %record.entry.name,
            size = record.entry.size,
            compressed = record.entry.compressed_size,
            "read entry"
        );
        Ok(Some(record))
    }

    /// Read every remaining entry, discarding payloads.
    pub fn entries(self) -> Result<Vec<ArchiveEntry>> {
        self.map(|record| record.map(|r| r.entry)).collect()
    }
}

impl Iterator for ArchiveReader<'_> {
    type Item = Result<EntryRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.next_entry() {
            Ok(record) => record.map(Ok),
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::{write_chunk, write_raw_chunk};
    use compressfly_core::traits::Codec;

    fn archive(algorithm: CompressionAlgorithm, entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut buffer = Vec::new();
        write_raw_chunk(&mut buffer, &algorithm.metadata()).unwrap();
        for (name, data) in entries {
            write_chunk(&mut buffer, &algorithm, name.as_bytes()).unwrap();
            if !name.ends_with('/') {
                write_chunk(&mut buffer, &algorithm, data).unwrap();
            }
        }
        buffer
    }

    #[test]
    fn test_read_entries() {
        let algorithm = CompressionAlgorithm::lempel_ziv();
        let buffer = archive(
            algorithm,
            &[
                ("docs/a.txt", b"hello hello".as_slice()),
                ("docs/empty/", b"".as_slice()),
                ("b.bin", b"\x00\x01".as_slice()),
            ],
        );

        let mut reader = ArchiveReader::new(&buffer).unwrap();
        assert_eq!(reader.algorithm(), algorithm);

        let first = reader.next_entry().unwrap().unwrap();
        assert_eq!(first.entry.name, "docs/a.txt");
        assert!(first.entry.is_file());
        assert_eq!(first.data, b"hello hello");
        assert_eq!(first.entry.span.start, reader.metadata_span().end);

        let second = reader.next_entry().unwrap().unwrap();
        assert!(second.entry.is_dir());
        assert!(second.data.is_empty());
        assert_eq!(second.entry.span.start, first.entry.span.end);

        let third = reader.next_entry().unwrap().unwrap();
        assert_eq!(third.entry.size, 2);
        assert_eq!(third.entry.span.end, buffer.len());

        assert!(reader.next_entry().unwrap().is_none());
    }

    #[test]
    fn test_metadata_only_archive_is_empty() {
        let buffer = archive(CompressionAlgorithm::huffman(), &[]);
        let entries = ArchiveReader::new(&buffer).unwrap().entries().unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_unknown_codec() {
        let mut buffer = Vec::new();
        write_raw_chunk(&mut buffer, b"ZipCompression").unwrap();
        assert!(matches!(
            ArchiveReader::new(&buffer),
            Err(CompressFlyError::UnrecognizedCodecTag { .. })
        ));
    }

    #[test]
    fn test_missing_payload_chunk() {
        let algorithm = CompressionAlgorithm::default();
        let mut buffer = Vec::new();
        write_raw_chunk(&mut buffer, &algorithm.metadata()).unwrap();
        write_chunk(&mut buffer, &algorithm, b"a.txt").unwrap();

        let mut reader = ArchiveReader::new(&buffer).unwrap();
        assert!(reader.next().unwrap().is_err());
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_truncated_archive() {
        let algorithm = CompressionAlgorithm::default();
        let buffer = archive(algorithm, &[("a.txt", b"abc".as_slice())]);
        let truncated = &buffer[..buffer.len() - 1];
        let result: Result<Vec<_>> = ArchiveReader::new(truncated).unwrap().collect();
        assert!(result.is_err());
    }
}
