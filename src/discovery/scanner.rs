//! File system scanner for annotated headers.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::manifest::Manifest;

/// Result of scanning source directories for headers.
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Discovered headers, sorted.
    pub headers: Vec<PathBuf>,
    /// Source directories that do not exist.
    pub missing: Vec<PathBuf>,
}

impl ScanResult {
    /// Create a new empty scan result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the total number of discovered files.
    pub fn total(&self) -> usize {
        self.headers.len()
    }

    /// Check if no files were discovered.
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Merge another scan result into this one.
    pub fn merge(&mut self, other: ScanResult) {
        self.headers.extend(other.headers);
        self.missing.extend(other.missing);
    }
}

/// Scan a directory for headers.
///
/// Only the top level is scanned unless the manifest asks for recursion.
/// Results are sorted so runs are reproducible.
pub fn scan_directory(root: &Path, manifest: &Manifest) -> ScanResult {
    let mut result = ScanResult::new();

    if !root.is_dir() {
        result.missing.push(root.to_path_buf());
        return result;
    }

    let max_depth = if manifest.recursive { usize::MAX } else { 1 };
    for entry in WalkDir::new(root)
        .follow_links(true)
        .max_depth(max_depth)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !entry.file_type().is_file() {
            continue;
        }
        if manifest.is_excluded(path) || !manifest.is_header(path) {
            continue;
        }
        result.headers.push(path.to_path_buf());
    }

    result
}

/// Scan multiple source paths.
pub fn scan_sources(sources: &[String], base_path: &Path, manifest: &Manifest) -> ScanResult {
    let mut result = ScanResult::new();

    for source in sources {
        let source_path = if Path::new(source).is_absolute() {
            PathBuf::from(source)
        } else {
            base_path.join(source)
        };

        result.merge(scan_directory(&source_path, manifest));
    }

    result
}
