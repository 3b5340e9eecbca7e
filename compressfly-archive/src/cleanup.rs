//! Compensating cleanup for interrupted operations.
//!
//! Builds and extractions write to disk as they go. When one fails partway,
//! the side effects recorded here are undone in reverse order. Cleanup is
//! best effort: a step that fails is logged and the rest still run.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Compensation {
    RemoveFile(PathBuf),
    Truncate { path: PathBuf, len: u64 },
}

/// Side effects to undo if the current operation fails.
#[derive(Debug, Default)]
pub struct CleanupList {
    steps: Vec<Compensation>,
}

impl CleanupList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove `path` on failure.
    pub fn remove_file(&mut self, path: impl Into<PathBuf>) {
        self.steps.push(Compensation::RemoveFile(path.into()));
    }

    /// Truncate `path` back to `len` bytes on failure.
    pub fn truncate(&mut self, path: impl Into<PathBuf>, len: u64) {
        self.steps.push(Compensation::Truncate {
            path: path.into(),
            len,
        });
    }

    /// Number of recorded steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Forget every recorded step; the operation succeeded.
    pub fn commit(mut self) {
        self.steps.clear();
    }

    /// Undo every recorded step, most recent first.
    pub fn run(self) {
        for step in self.steps.into_iter().rev() {
            match step {
                Compensation::RemoveFile(path) => remove_file(&path),
                Compensation::Truncate { path, len } => truncate(&path, len),
            }
        }
    }
}

fn remove_file(path: &Path) {
    // Only regular files are removed; directories may hold unrelated data.
    if !path.is_file() {
        return;
    }
    match fs::remove_file(path) {
        Ok(()) => warn!(path = %path.display(), "removed partial output"),
        Err(e) => warn!(path = %path.display(), error = %e, "failed to remove partial output"),
    }
}

fn truncate(path: &Path, len: u64) {
    let result = OpenOptions::new()
        .write(true)
        .open(path)
        .and_then(|file| file.set_len(len));
    match result {
        Ok(()) => warn!(path = %path.display(), len, "truncated archive to its previous length"),
        Err(e) => warn!(path = %path.display(), error = %e, "failed to truncate archive"),
    }
}
