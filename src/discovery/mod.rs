//! Header discovery and loading for kinnow projects.
//!
//! Finds the project manifest (`kinnow.yaml`, or the editor's
//! `EditorData.json`), scans its source directories for headers and loads
//! them with per-file failure isolation.
//!
//! # Example
//!
//! ```ignore
//! use kinnow::discovery::discover;
//!
//! let result = discover("./engine")?;
//! println!("Found {} headers", result.scan.total());
//!
//! let loaded = result.load();
//! let (tree, diagnostics) = loaded.into_builder().build();
//! ```

mod loader;
mod manifest;
mod scanner;

use std::path::{Path, PathBuf};

use crate::error::Result;

pub use loader::{load_header, load_headers, LoadFailure, LoadResult};
pub use manifest::{Manifest, DEFAULT_OUTPUT_STEM};
pub use scanner::{scan_directory, scan_sources, ScanResult};

/// The name of the manifest file.
pub const MANIFEST_FILENAME: &str = "kinnow.yaml";

/// The editor data file, consulted when there is no manifest.
pub const EDITOR_DATA_FILENAME: &str = "EditorData.json";

/// Result of discovering headers in a project.
#[derive(Debug)]
pub struct DiscoveryResult {
    /// The project root directory.
    pub root: PathBuf,

    /// The loaded manifest (default if none was found).
    pub manifest: Manifest,

    /// The manifest file that was read, if any.
    pub manifest_path: Option<PathBuf>,

    /// Scan results with discovered headers.
    pub scan: ScanResult,
}

impl DiscoveryResult {
    /// Load all discovered headers.
    pub fn load(&self) -> LoadResult {
        load_headers(&self.scan.headers, &self.manifest.parser)
    }

    /// Output directory, resolved against the project root.
    pub fn output_dir(&self) -> PathBuf {
        if self.manifest.output.is_absolute() {
            self.manifest.output.clone()
        } else {
            self.root.join(&self.manifest.output)
        }
    }

    /// Source directories, resolved against the project root.
    pub fn source_dirs(&self) -> Vec<PathBuf> {
        self.manifest
            .effective_sources()
            .iter()
            .map(|s| self.root.join(s))
            .collect()
    }
}

/// Find the manifest in `root`: `kinnow.yaml` first, then `EditorData.json`.
pub fn find_manifest(root: &Path) -> Option<PathBuf> {
    [MANIFEST_FILENAME, EDITOR_DATA_FILENAME]
        .iter()
        .map(|name| root.join(name))
        .find(|path| path.is_file())
}

/// Discover headers in a project directory.
///
/// Uses the manifest's source directories when one is found, otherwise
/// scans the root directory itself.
pub fn discover(root: impl AsRef<Path>) -> Result<DiscoveryResult> {
    let root = root.as_ref();
    match find_manifest(root) {
        Some(path) => discover_with_manifest(root, &path),
        None => Ok(scan_with(root.to_path_buf(), Manifest::default(), None)),
    }
}

/// Discover headers using an explicit manifest file.
pub fn discover_with_manifest(root: impl AsRef<Path>, manifest_path: &Path) -> Result<DiscoveryResult> {
    let manifest = Manifest::load(manifest_path)?;
    Ok(scan_with(
        root.as_ref().to_path_buf(),
        manifest,
        Some(manifest_path.to_path_buf()),
    ))
}

fn scan_with(root: PathBuf, manifest: Manifest, manifest_path: Option<PathBuf>) -> DiscoveryResult {
    let scan = scan_sources(&manifest.effective_sources(), &root, &manifest);
    DiscoveryResult {
        root,
        manifest,
        manifest_path,
        scan,
    }
}

/// Discover headers from specific paths (no manifest lookup).
///
/// Files are taken as they are; directories are scanned with the default
/// settings.
pub fn discover_paths(paths: &[PathBuf]) -> DiscoveryResult {
    let manifest = Manifest::default();
    let mut scan = ScanResult::new();

    for path in paths {
        if path.is_dir() {
            scan.merge(scan_directory(path, &manifest));
        } else if path.is_file() {
            scan.headers.push(path.clone());
        } else {
            scan.missing.push(path.clone());
        }
    }

    let root = paths
        .first()
        .and_then(|p| p.parent())
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."));

    DiscoveryResult {
        root,
        manifest,
        manifest_path: None,
        scan,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const HEALTH: &str = "/* CT_COMPONENT_NAME: \"health\" */\ntypedef struct {\n  float hp;\n} Health;\n";

    #[test]
    fn test_discover_empty_directory() {
        let dir = tempdir().unwrap();

        let result = discover(dir.path()).unwrap();

        assert!(result.manifest_path.is_none());
        assert!(result.scan.is_empty());
    }

    #[test]
    fn test_discover_without_manifest() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("Health.h"), HEALTH).unwrap();

        let result = discover(dir.path()).unwrap();

        assert!(result.manifest_path.is_none());
        assert_eq!(result.scan.total(), 1);
        assert_eq!(result.output_dir(), dir.path().join("generated"));
    }

    #[test]
    fn test_discover_with_manifest() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("kinnow.yaml"),
            "sources:\n  - components\noutput: build\n",
        )
        .unwrap();
        fs::create_dir_all(dir.path().join("components")).unwrap();
        fs::write(dir.path().join("components/Health.h"), HEALTH).unwrap();
        fs::write(dir.path().join("Ignored.h"), HEALTH).unwrap();

        let result = discover(dir.path()).unwrap();

        assert_eq!(result.manifest_path, Some(dir.path().join("kinnow.yaml")));
        assert_eq!(result.output_dir(), dir.path().join("build"));
        assert_eq!(result.scan.total(), 1);
        assert!(result.scan.headers[0].ends_with("components/Health.h"));
    }

    #[test]
    fn test_discover_with_editor_data() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("EditorData.json"),
            r#"{ "kinnow": ["engine/scene/components"] }"#,
        )
        .unwrap();
        fs::create_dir_all(dir.path().join("engine/scene/components")).unwrap();
        fs::write(dir.path().join("engine/scene/components/Health.h"), HEALTH).unwrap();

        let result = discover(dir.path()).unwrap();

        assert_eq!(result.manifest_path, Some(dir.path().join("EditorData.json")));
        assert_eq!(result.scan.total(), 1);
    }

    #[test]
    fn test_discover_and_load() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("Health.h"), HEALTH).unwrap();

        let result = discover(dir.path()).unwrap();
        let loaded = result.load();
        assert!(loaded.is_ok());

        let (tree, _) = loaded.into_builder().build();
        let health = tree.find_struct("Health").unwrap();
        assert_eq!(health.markup.component_name.as_deref(), Some("health"));
    }

    #[test]
    fn test_discover_paths() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("Health.h");
        fs::write(&file, HEALTH).unwrap();

        let result = discover_paths(&[file.clone(), dir.path().join("missing.h")]);
        assert_eq!(result.scan.headers, vec![file]);
        assert_eq!(result.scan.missing.len(), 1);

        let result = discover_paths(&[dir.path().to_path_buf()]);
        assert_eq!(result.scan.total(), 1);
    }
}
