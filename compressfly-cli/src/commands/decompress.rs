//! Decompress command implementation.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use compressfly_archive::{ExtractMode, decompress_archives_with};
use tracing::debug;

use super::{CmdResult, EXIT_INVALID_ARCHIVES};
use crate::utils::{create_progress_bar, print_invalid};

/// Options for extracting archives.
pub struct DecompressOptions<'a> {
    pub archives: &'a [PathBuf],
    pub output: Option<&'a Path>,
    pub timeout: u64,
    pub progress: bool,
}

pub fn cmd_decompress(options: &DecompressOptions) -> CmdResult {
    let output_dir = match options.output {
        Some(dir) if !dir.is_dir() => {
            return Err(format!("output path {} is not a directory", dir.display()).into());
        }
        Some(dir) => dir,
        None => Path::new("."),
    };

    debug!(
        archives = options.archives.len(),
        output = %output_dir.display(),
        timeout = options.timeout,
        "decompressing archives"
    );
    let start = Instant::now();
    let pb = create_progress_bar(options.archives.len() as u64, options.progress);
    let report = decompress_archives_with(
        options.archives,
        output_dir,
        ExtractMode::Extract,
        Some(Duration::from_secs(options.timeout)),
        |archive, _| {
            pb.set_message(archive.display().to_string());
            pb.inc(1);
        },
    );
    pb.finish_and_clear();
    let report = report?;

    for listing in &report.listings {
        println!(
            "Extracted {} entries from {} ({})",
            listing.extracted.len(),
            listing.archive.display(),
            listing.algorithm
        );
    }
    println!(
        "Extracted to {} in {:.2?}",
        output_dir.display(),
        start.elapsed()
    );

    if !report.is_clean() {
        print_invalid(&report.invalid);
        std::process::exit(EXIT_INVALID_ARCHIVES);
    }
    Ok(())
}
