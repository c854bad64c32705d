//! Scanner for collecting source files from a directory.
//!
//! Used by the presentation layers to expand a directory argument into
//! the ordered input list of a job. The sequencer itself never scans;
//! it only processes the paths it was handed.

use crate::job::is_supported_input;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Recursively collects eligible source files under `root`, sorted by path.
///
/// Hidden directories (names starting with `.`) are not descended into.
/// A missing root yields an empty list.
pub fn find_source_files(root: &Path) -> Vec<PathBuf> {
    if !root.exists() {
        return Vec::new();
    }

    let walker = WalkDir::new(root).into_iter().filter_entry(|entry| {
        if entry.file_type().is_dir() && entry.depth() > 0 {
            if let Some(name) = entry.file_name().to_str() {
                if name.starts_with('.') {
                    return false;
                }
            }
        }
        true
    });

    let mut files: Vec<PathBuf> = walker
        .filter_map(|e| e.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| is_supported_input(path))
        .collect();

    files.sort();
    debug!(root = %root.display(), count = files.len(), "scanned for source files");
    files
}
