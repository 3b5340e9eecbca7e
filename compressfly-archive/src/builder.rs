//! Archive builder.
//!
//! Walks the given roots depth-first and writes one entry per file and per
//! empty directory. Paths are stored exactly as given, with children joined
//! by `/`. Directory listings are sorted so that the same tree always
//! produces the same archive.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use compressfly_core::entry::FOLDER_SUFFIX;
use compressfly_core::error::{CompressFlyError, Result};
use compressfly_core::traits::Codec;
use tracing::{debug, info};

use crate::algorithm::CompressionAlgorithm;
use crate::chunk::{read_raw_chunk, write_raw_chunk};
use crate::cleanup::CleanupList;

/// Paths skipped while walking the input tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreRules {
    /// Files skipped by exact path.
    pub files: Vec<String>,
    /// Folders skipped (with everything below them), compared after
    /// normalizing separators.
    pub folders: Vec<String>,
    /// Files skipped by path suffix, e.g. `.log`.
    pub extensions: Vec<String>,
}

impl IgnoreRules {
    /// Whether the folder at `path` is skipped.
    pub fn skips_folder(&self, path: &str) -> bool {
        let path = Path::new(path);
        self.folders
            .iter()
            .any(|folder| Path::new(folder).components().eq(path.components()))
    }

    /// Whether the file at `path` is skipped.
    pub fn skips_file(&self, path: &str) -> bool {
        self.files.iter().any(|file| file == path)
            || self.extensions.iter().any(|ext| path.ends_with(ext.as_str()))
    }
}

/// Options for building or appending to an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    /// Paths to skip.
    pub ignore: IgnoreRules,
    /// Undo writes to the output when the build fails.
    pub remove_output_on_error: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            ignore: IgnoreRules::default(),
            remove_output_on_error: true,
        }
    }
}

/// Counters for one build or append.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildSummary {
    /// File entries written.
    pub files: usize,
    /// Empty-directory entries written.
    pub directories: usize,
    /// Uncompressed bytes read from input files.
    pub bytes_in: u64,
    /// Archive bytes written, length prefixes included.
    pub bytes_written: u64,
}

/// Writes archive entries for a tree of input paths.
pub struct EntryWriter<'a, W: Write> {
    writer: W,
    algorithm: CompressionAlgorithm,
    ignore: &'a IgnoreRules,
    summary: BuildSummary,
}

impl<'a, W: Write> EntryWriter<'a, W> {
    /// Create a writer appending entries to `writer`.
    pub fn new(writer: W, algorithm: CompressionAlgorithm, ignore: &'a IgnoreRules) -> Self {
        Self {
            writer,
            algorithm,
            ignore,
            summary: BuildSummary::default(),
        }
    }

    /// Write the metadata chunk naming the codec.
    pub fn write_metadata(&mut self) -> Result<()> {
        self.summary.bytes_written += write_raw_chunk(&mut self.writer, &self.algorithm.metadata())?;
        Ok(())
    }

    /// Add every root path, recursing into directories.
    pub fn add_roots<S: AsRef<str>>(&mut self, roots: &[S]) -> Result<()> {
        for root in roots {
            self.add_path(root.as_ref())?;
        }
        Ok(())
    }

    /// Add one path, recursing into directories.
    pub fn add_path(&mut self, path: &str) -> Result<()> {
        let metadata =
            fs::metadata(path).map_err(|_| CompressFlyError::missing_input(path))?;

        if metadata.is_dir() {
            self.add_directory(path)
        } else if metadata.is_file() {
            self.add_file(path)
        } else {
            Err(CompressFlyError::missing_input(path))
        }
    }

    fn add_directory(&mut self, path: &str) -> Result<()> {
        if self.ignore.skips_folder(path) {
            debug!(path, "skipping ignored folder");
            return Ok(());
        }

        let mut children = Vec::new();
        for entry in fs::read_dir(path)? {
            let name = entry?.file_name().into_string().map_err(|name| {
                CompressFlyError::invalid_parameter(format!(
                    "{} in {path} is not valid UTF-8",
                    PathBuf::from(name).display()
                ))
            })?;
            children.push(name);
        }
        children.sort();

        if children.is_empty() {
            let marker = directory_marker(path);
            self.check_compatible(&marker, marker.as_bytes())?;
            let frame = self.encode(&marker, marker.as_bytes())?;
            self.summary.bytes_written += write_raw_chunk(&mut self.writer, &frame)?;
            self.summary.directories += 1;
            debug!(path = %marker, "wrote empty directory");
            return Ok(());
        }

        for child in children {
            self.add_path(&join_archive_path(path, &child))?;
        }
        Ok(())
    }

    fn add_file(&mut self, path: &str) -> Result<()> {
        if self.ignore.skips_file(path) {
            debug!(path, "skipping ignored file");
            return Ok(());
        }

        let data = fs::read(path)?;
        self.check_compatible(path, path.as_bytes())?;
        self.check_compatible(path, &data)?;

        // Both chunks are encoded before either is written, so a codec
        // failure never leaves half an entry behind.
        let path_frame = self.encode(path, path.as_bytes())?;
        let data_frame = self.encode(path, &data)?;
        self.summary.bytes_written += write_raw_chunk(&mut self.writer, &path_frame)?;
        self.summary.bytes_written += write_raw_chunk(&mut self.writer, &data_frame)?;

        self.summary.files += 1;
        self.summary.bytes_in += data.len() as u64;
        debug!(
            path,
            size = data.len(),
            compressed = data_frame.len(),
            "wrote file"
        );
        Ok(())
    }

    fn check_compatible(&self, path: &str, data: &[u8]) -> Result<()> {
        if self.algorithm.accepts(data) {
            Ok(())
        } else {
            Err(CompressFlyError::incompatible(path, self.algorithm.name()))
        }
    }

    fn encode(&self, path: &str, data: &[u8]) -> Result<Vec<u8>> {
        self.algorithm.compress(data).map_err(|e| match e {
            CompressFlyError::AmbiguousEncoding { .. } => {
                CompressFlyError::incompatible(path, self.algorithm.name())
            }
            other => other,
        })
    }

    /// Flush the underlying writer and return the counters.
    pub fn finish(mut self) -> Result<BuildSummary> {
        self.writer.flush()?;
        Ok(self.summary)
    }
}

/// Path stored for an empty directory.
pub fn directory_marker(path: &str) -> String {
    let trimmed = path.trim_end_matches(FOLDER_SUFFIX);
    format!("{trimmed}{FOLDER_SUFFIX}")
}

/// Join an archive path and a child name with `/`.
pub fn join_archive_path(parent: &str, child: &str) -> String {
    if parent.is_empty() {
        child.to_string()
    } else if parent.ends_with(FOLDER_SUFFIX) {
        format!("{parent}{child}")
    } else {
        format!("{parent}{FOLDER_SUFFIX}{child}")
    }
}

/// Create `output` (replacing any existing file) and write a new archive.
///
/// On failure the output file is removed when
/// [`BuildOptions::remove_output_on_error`] is set.
pub fn build_archive<S: AsRef<str>>(
    output: impl AsRef<Path>,
    algorithm: CompressionAlgorithm,
    roots: &[S],
    options: &BuildOptions,
) -> Result<BuildSummary> {
    let output = output.as_ref();
    let mut cleanup = CleanupList::new();
    if options.remove_output_on_error {
        cleanup.remove_file(output);
    }

    let result = File::create(output).map_err(CompressFlyError::from).and_then(|file| {
        let mut entries = EntryWriter::new(BufWriter::new(file), algorithm, &options.ignore);
        entries.write_metadata()?;
        entries.add_roots(roots)?;
        entries.finish()
    });

    match result {
        Ok(summary) => {
            cleanup.commit();
            info!(
                output = %output.display(),
                codec = %algorithm,
                files = summary.files,
                directories = summary.directories,
                bytes = summary.bytes_written,
                "built archive"
            );
            Ok(summary)
        }
        Err(e) => {
            cleanup.run();
            Err(e)
        }
    }
}

/// Append entries to the existing archive at `output`.
///
/// No metadata chunk is written. `algorithm` must match the codec named by
/// the archive's metadata chunk, otherwise
/// [`CompressFlyError::InvalidParameter`] is returned before anything is
/// written. On failure the archive is truncated back to its previous length
/// when [`BuildOptions::remove_output_on_error`] is set; it is never deleted.
pub fn append_to_archive<S: AsRef<str>>(
    output: impl AsRef<Path>,
    algorithm: CompressionAlgorithm,
    roots: &[S],
    options: &BuildOptions,
) -> Result<BuildSummary> {
    let output = output.as_ref();
    let existing = fs::read(output)?;
    let stored = CompressionAlgorithm::from_metadata(read_raw_chunk(&existing, 0)?.payload)?;
    if stored != algorithm {
        return Err(CompressFlyError::invalid_parameter(format!(
            "{} was written with {stored}, cannot append with {algorithm}",
            output.display()
        )));
    }

    let file = OpenOptions::new().append(true).open(output)?;
    let original_len = file.metadata()?.len();

    let mut cleanup = CleanupList::new();
    if options.remove_output_on_error {
        cleanup.truncate(output, original_len);
    }

    let mut entries = EntryWriter::new(BufWriter::new(file), algorithm, &options.ignore);
    let result = entries.add_roots(roots).and_then(|()| entries.finish());

    match result {
        Ok(summary) => {
            cleanup.commit();
            info!(
                output = %output.display(),
                files = summary.files,
                directories = summary.directories,
                "appended to archive"
            );
            Ok(summary)
        }
        Err(e) => {
            cleanup.run();
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::ArchiveReader;

    fn path_str(path: &Path) -> String {
        path.to_str().unwrap().to_string()
    }

    #[test]
    fn test_join_archive_path() {
        assert_eq!(join_archive_path("", "a"), "a");
        assert_eq!(join_archive_path("dir", "a"), "dir/a");
        assert_eq!(join_archive_path("dir/", "a"), "dir/a");
    }

    #[test]
    fn test_directory_marker() {
        assert_eq!(directory_marker("dir"), "dir/");
        assert_eq!(directory_marker("dir/"), "dir/");
    }

    #[test]
    fn test_ignore_rules() {
        let rules = IgnoreRules {
            files: vec!["data/skip.txt".into()],
            folders: vec!["data/cache/".into()],
            extensions: vec![".log".into()],
        };
        assert!(rules.skips_file("data/skip.txt"));
        assert!(rules.skips_file("data/run.log"));
        assert!(!rules.skips_file("data/keep.txt"));
        assert!(rules.skips_folder("data/cache"));
        assert!(rules.skips_folder("data/./cache"));
        assert!(!rules.skips_folder("data/cache2"));
    }

    #[test]
    fn test_entry_writer_in_memory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("note.txt");
        fs::write(&file, b"hello world").unwrap();

        let rules = IgnoreRules::default();
        let mut buffer = Vec::new();
        let mut writer =
            EntryWriter::new(&mut buffer, CompressionAlgorithm::lempel_ziv(), &rules);
        writer.write_metadata().unwrap();
        writer.add_path(&path_str(&file)).unwrap();
        let summary = writer.finish().unwrap();
        assert_eq!(summary.files, 1);
        assert_eq!(summary.bytes_in, 11);
        assert_eq!(summary.bytes_written as usize, buffer.len());

        let entries = ArchiveReader::new(&buffer).unwrap().entries().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, path_str(&file));
    }

    #[test]
    fn test_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.cfly");
        let missing = path_str(&dir.path().join("missing"));

        let err = build_archive(
            &output,
            CompressionAlgorithm::default(),
            &[missing],
            &BuildOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, CompressFlyError::MissingInput { .. }));
        assert!(!output.exists());
    }

    fn build_rle_archive(dir: &Path) -> (PathBuf, String) {
        let input = dir.join("first.txt");
        fs::write(&input, b"aaaabbbb").unwrap();
        let output = dir.join("out.cfly");
        build_archive(
            &output,
            CompressionAlgorithm::rle(1).unwrap(),
            &[path_str(&input)],
            &BuildOptions::default(),
        )
        .unwrap();
        (output, path_str(&input))
    }

    #[test]
    fn test_append_adds_entries() {
        let dir = tempfile::tempdir().unwrap();
        let (output, first) = build_rle_archive(dir.path());
        let second = dir.path().join("second.txt");
        fs::write(&second, b"ccccdddd").unwrap();

        let summary = append_to_archive(
            &output,
            CompressionAlgorithm::rle(1).unwrap(),
            &[path_str(&second)],
            &BuildOptions::default(),
        )
        .unwrap();
        assert_eq!(summary.files, 1);

        let bytes = fs::read(&output).unwrap();
        let names: Vec<_> = ArchiveReader::new(&bytes)
            .unwrap()
            .entries()
            .unwrap()
            .into_iter()
            .map(|entry| entry.name)
            .collect();
        assert_eq!(names, [first, path_str(&second)]);
    }

    #[test]
    fn test_append_rejects_other_codec() {
        let dir = tempfile::tempdir().unwrap();
        let (output, first) = build_rle_archive(dir.path());
        let before = fs::read(&output).unwrap();

        for algorithm in [
            CompressionAlgorithm::huffman(),
            CompressionAlgorithm::rle(2).unwrap(),
        ] {
            let err = append_to_archive(
                &output,
                algorithm,
                &[first.as_str()],
                &BuildOptions::default(),
            )
            .unwrap_err();
            assert!(
                matches!(err, CompressFlyError::InvalidParameter { .. }),
                "{algorithm}"
            );
        }
        assert_eq!(fs::read(&output).unwrap(), before);
    }

    #[test]
    fn test_failed_append_restores_length() {
        let dir = tempfile::tempdir().unwrap();
        let (output, first) = build_rle_archive(dir.path());
        let before = fs::read(&output).unwrap();
        let missing = path_str(&dir.path().join("missing"));

        // The first root is written before the missing one fails.
        let err = append_to_archive(
            &output,
            CompressionAlgorithm::rle(1).unwrap(),
            &[first, missing],
            &BuildOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, CompressFlyError::MissingInput { .. }));
        assert_eq!(fs::read(&output).unwrap(), before);
    }

    #[test]
    fn test_keep_output_when_requested() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.cfly");
        let options = BuildOptions {
            remove_output_on_error: false,
            ..BuildOptions::default()
        };

        let missing = path_str(&dir.path().join("missing"));
        assert!(build_archive(&output, CompressionAlgorithm::default(), &[missing], &options).is_err());
        assert!(output.exists());
    }
}
