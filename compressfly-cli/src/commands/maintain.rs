//! Remove and update command implementations.

use std::path::Path;

use compressfly_archive::{BuildOptions, remove_entries, update_entries};

use super::CmdResult;

fn require_archive(archive: &Path) -> CmdResult {
    if archive.is_file() {
        Ok(())
    } else {
        Err(format!(
            "output path: [{}] does not exist as file path",
            archive.display()
        )
        .into())
    }
}

pub fn cmd_remove(archive: &Path, prefixes: &[String]) -> CmdResult {
    require_archive(archive)?;
    let removed = remove_entries(archive, prefixes)?;
    println!("Removed {} entries from {}", removed, archive.display());
    Ok(())
}

pub fn cmd_update(archive: &Path, inputs: &[String], options: &BuildOptions) -> CmdResult {
    require_archive(archive)?;
    let summary = update_entries(archive, inputs, options)?;
    println!("Updated {}", archive.display());
    println!(
        "  {} files, {} empty folders re-added",
        summary.files, summary.directories
    );
    Ok(())
}
