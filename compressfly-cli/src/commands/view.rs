//! View command implementation.

use std::collections::BTreeMap;
use std::path::PathBuf;

use compressfly_archive::{ArchiveListing, ExtractMode, decompress_archives};
use compressfly_core::ArchiveEntry;
use serde::{Deserialize, Serialize};

use super::{CmdResult, EXIT_INVALID_ARCHIVES};
use crate::utils::{filter_entries, print_entries, print_invalid};

/// JSON serializable entry data for archive listings.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct EntryJson {
    name: String,
    size: u64,
    compressed_size: u64,
    ratio: f64,
    is_dir: bool,
}

impl EntryJson {
    fn from_entry(entry: &ArchiveEntry) -> Self {
        Self {
            name: entry.name.clone(),
            size: entry.size,
            compressed_size: entry.compressed_size,
            ratio: entry.compression_ratio(),
            is_dir: entry.is_dir(),
        }
    }
}

/// JSON output for one archive listing.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ArchiveListJson {
    archive: String,
    codec: String,
    entries: Vec<EntryJson>,
}

/// JSON output for a whole `view` run.
#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct ViewJson {
    archives: Vec<ArchiveListJson>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    invalid: BTreeMap<String, String>,
}

/// Options for listing archive contents.
pub struct ViewOptions<'a> {
    pub archives: &'a [PathBuf],
    pub verbose: bool,
    pub json: bool,
    pub include: &'a [String],
    pub exclude: &'a [String],
}

fn listing_json(listing: &ArchiveListing, entries: &[ArchiveEntry]) -> ArchiveListJson {
    ArchiveListJson {
        archive: listing.archive.display().to_string(),
        codec: listing.algorithm.to_string(),
        entries: entries.iter().map(EntryJson::from_entry).collect(),
    }
}

pub fn cmd_view(options: &ViewOptions) -> CmdResult {
    let report = decompress_archives(options.archives, ".", ExtractMode::View, None)?;

    if options.json {
        let output = ViewJson {
            archives: report
                .listings
                .iter()
                .map(|listing| {
                    let entries = filter_entries(&listing.entries, options.include, options.exclude);
                    listing_json(listing, &entries)
                })
                .collect(),
            invalid: report
                .invalid
                .iter()
                .map(|(path, reason)| (path.display().to_string(), reason.clone()))
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        for listing in &report.listings {
            println!("Archive: {} ({})", listing.archive.display(), listing.algorithm);
            println!();
            let entries = filter_entries(&listing.entries, options.include, options.exclude);
            print_entries(&entries, options.verbose);
            println!();
        }
        print_invalid(&report.invalid);
    }

    if !report.is_clean() {
        std::process::exit(EXIT_INVALID_ARCHIVES);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_json_shape() {
        let entry = ArchiveEntry::file("docs/a.txt", 100, 0..40);
        let json = serde_json::to_value(EntryJson::from_entry(&entry)).unwrap();
        assert_eq!(json["name"], "docs/a.txt");
        assert_eq!(json["size"], 100);
        assert_eq!(json["compressed_size"], 40);
        assert_eq!(json["is_dir"], false);
    }

    #[test]
    fn test_clean_view_omits_invalid() {
        let json = serde_json::to_string(&ViewJson::default()).unwrap();
        assert_eq!(json, r#"{"archives":[]}"#);
    }
}
