//! Compress command implementation.

use std::path::Path;
use std::time::Instant;

use compressfly_archive::{BuildOptions, CompressionAlgorithm, build_archive};

use super::CmdResult;
use crate::utils::{format_ratio, format_size};

/// Options for building an archive.
pub struct CompressOptions<'a> {
    pub inputs: &'a [String],
    pub output: Option<&'a Path>,
    pub algorithm: CompressionAlgorithm,
    pub build: BuildOptions,
}

pub fn cmd_compress(options: &CompressOptions) -> CmdResult {
    let output = options
        .output
        .filter(|path| !path.as_os_str().is_empty())
        .ok_or("missing output path parameter")?;

    let start = Instant::now();
    let summary = build_archive(output, options.algorithm, options.inputs, &options.build)?;

    println!("Compressed into {} using {}", output.display(), options.algorithm);
    println!(
        "  {} files, {} empty folders",
        summary.files, summary.directories
    );
    println!("  Input size:   {}", format_size(summary.bytes_in));
    println!(
        "  Archive size: {} ({})",
        format_size(summary.bytes_written),
        format_ratio(summary.bytes_in, summary.bytes_written)
    );
    println!("  Elapsed:      {:.2?}", start.elapsed());
    Ok(())
}
