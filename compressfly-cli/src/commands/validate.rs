//! Validate command implementation.

use std::collections::BTreeMap;
use std::path::PathBuf;

use compressfly_archive::validate_archives;
use serde::{Deserialize, Serialize};

use super::{CmdResult, EXIT_INVALID_ARCHIVES};

/// JSON output for a `validate` run.
#[derive(Debug, Serialize, Deserialize)]
struct ValidationJson {
    valid: Vec<String>,
    invalid: BTreeMap<String, String>,
}

pub fn cmd_validate(archives: &[PathBuf], json: bool) -> CmdResult {
    let invalid = validate_archives(archives);

    if json {
        let output = ValidationJson {
            valid: archives
                .iter()
                .filter(|archive| !invalid.contains_key(*archive))
                .map(|archive| archive.display().to_string())
                .collect(),
            invalid: invalid
                .iter()
                .map(|(path, reason)| (path.display().to_string(), reason.clone()))
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        for archive in archives {
            match invalid.get(archive) {
                Some(reason) => println!("  INVALID: {} - {}", archive.display(), reason),
                None => println!("  OK: {}", archive.display()),
            }
        }
        println!();
        println!("Validation results:");
        println!("  Total archives: {}", archives.len());
        println!("  OK: {}", archives.len() - invalid.len());
        println!("  Invalid: {}", invalid.len());
    }

    if !invalid.is_empty() {
        std::process::exit(EXIT_INVALID_ARCHIVES);
    }
    Ok(())
}
