//! Utility functions for the CLI.

use std::collections::BTreeMap;
use std::path::PathBuf;

use compressfly_core::ArchiveEntry;
use glob::Pattern;
use indicatif::{ProgressBar, ProgressStyle};

/// Create a progress bar with standard styling.
pub fn create_progress_bar(len: u64, enable: bool) -> ProgressBar {
    if !enable {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .expect("progress bar template is valid")
            .progress_chars("█▓▒░ "),
    );
    pb
}

/// Check if an entry name matches the filter patterns.
/// - If include patterns are specified, the name must match at least one
/// - If exclude patterns are specified, the name must not match any
pub fn matches_filters(name: &str, include: &[String], exclude: &[String]) -> bool {
    let matches = |pattern: &String| Pattern::new(pattern).is_ok_and(|p| p.matches(name));

    if exclude.iter().any(matches) {
        return false;
    }
    include.is_empty() || include.iter().any(matches)
}

/// Filter entries based on include/exclude patterns.
pub fn filter_entries(
    entries: &[ArchiveEntry],
    include: &[String],
    exclude: &[String],
) -> Vec<ArchiveEntry> {
    entries
        .iter()
        .filter(|e| matches_filters(&e.name, include, exclude))
        .cloned()
        .collect()
}

/// Human-readable byte count.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KiB", "MiB", "GiB", "TiB"];
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}

/// Compressed size as a percentage of the original.
pub fn format_ratio(original: u64, compressed: u64) -> String {
    if original == 0 {
        "-".to_string()
    } else {
        format!("{:.1}%", compressed as f64 / original as f64 * 100.0)
    }
}

/// Print entries in a formatted table.
pub fn print_entries(entries: &[ArchiveEntry], verbose: bool) {
    if verbose {
        println!("{:>10} {:>10} {:>6}  Name", "Size", "Compressed", "Ratio");
        println!("{}", "-".repeat(50));

        let mut total_size = 0u64;
        let mut total_compressed = 0u64;

        for entry in entries {
            let ratio = if entry.size > 0 {
                format!("{:.1}%", entry.space_savings())
            } else {
                "-".to_string()
            };
            let type_prefix = if entry.is_dir() { "d " } else { "  " };

            println!(
                "{:>10} {:>10} {:>6}  {}{}",
                entry.size, entry.compressed_size, ratio, type_prefix, entry.name
            );

            total_size += entry.size;
            total_compressed += entry.compressed_size;
        }

        println!("{}", "-".repeat(50));
        let total_ratio = if total_size > 0 {
            (1.0 - total_compressed as f64 / total_size as f64) * 100.0
        } else {
            0.0
        };
        println!(
            "{:>10} {:>10} {:>5.1}%  {} entries",
            total_size,
            total_compressed,
            total_ratio,
            entries.len()
        );
    } else {
        for entry in entries {
            println!("{entry}");
        }
    }
}

/// Print the archives a batch rejected to stderr.
pub fn print_invalid(invalid: &BTreeMap<PathBuf, String>) {
    if invalid.is_empty() {
        return;
    }
    eprintln!("Invalid archives:");
    for (archive, reason) in invalid {
        eprintln!("  {}: {}", archive.display(), reason);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_matches_filters() {
        let none: Vec<String> = Vec::new();
        assert!(matches_filters("src/lib.rs", &none, &none));
        assert!(matches_filters("src/lib.rs", &strings(&["src/*"]), &none));
        assert!(!matches_filters("docs/a.md", &strings(&["src/*"]), &none));
        assert!(!matches_filters("src/lib.rs", &none, &strings(&["*.rs"])));
        // Exclusion wins over inclusion.
        assert!(!matches_filters("src/lib.rs", &strings(&["src/*"]), &strings(&["*.rs"])));
        // Invalid patterns match nothing.
        assert!(!matches_filters("a[", &strings(&["a["]), &none));
    }

    #[test]
    fn test_filter_entries() {
        let entries = vec![
            ArchiveEntry::file("src/lib.rs", 10, 0..20),
            ArchiveEntry::directory("src/empty/", 20..30),
            ArchiveEntry::file("README.md", 5, 30..40),
        ];
        let filtered = filter_entries(&entries, &strings(&["src/*"]), &[]);
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|e| e.name.starts_with("src/")));
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KiB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MiB");
    }

    #[test]
    fn test_format_ratio() {
        assert_eq!(format_ratio(0, 10), "-");
        assert_eq!(format_ratio(200, 50), "25.0%");
    }
}
