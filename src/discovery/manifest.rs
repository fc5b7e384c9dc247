//! Project manifest parsing.
//!
//! The manifest lists the directories holding annotated headers and where
//! the generated files go. It is read from `kinnow.yaml`, or from the
//! editor's `EditorData.json`, whose `kinnow` key lists the same
//! directories.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{KinnowError, Result};
use crate::parser::ParserConfig;

/// Project manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Manifest {
    /// Directories to scan for headers, relative to the project root.
    /// Defaults to the root itself if empty.
    #[serde(alias = "kinnow")]
    pub sources: Vec<String>,

    /// Output directory for generated files.
    pub output: PathBuf,

    /// File name (without extension) of the generated files.
    pub output_stem: String,

    /// Scan source directories recursively instead of only their top level.
    pub recursive: bool,

    /// Extensions of header files.
    pub extensions: Vec<String>,

    /// Patterns to exclude from discovery.
    pub excludes: Vec<String>,

    /// Path fragments ignored by watch mode (editor backups, lock files).
    pub watch_ignore: Vec<String>,

    /// Parser options.
    pub parser: ParserConfig,
}

/// Default file name of the generated outputs.
pub const DEFAULT_OUTPUT_STEM: &str = "KinnowComponentGen";

fn default_output() -> PathBuf {
    PathBuf::from("generated")
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            sources: vec![],
            output: default_output(),
            output_stem: DEFAULT_OUTPUT_STEM.to_string(),
            recursive: false,
            extensions: vec!["h".to_string()],
            excludes: vec![],
            watch_ignore: vec!["~".to_string(), ".lock".to_string()],
            parser: ParserConfig::default(),
        }
    }
}

impl Manifest {
    /// Load a manifest file. Files ending in `.json` are read as JSON,
    /// everything else as YAML.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| KinnowError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read manifest: {}", e),
        })?;

        let is_json = path
            .extension()
            .map_or(false, |ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::parse_json(&content)
        } else {
            Self::parse(&content)
        }
    }

    /// Parse manifest from YAML string.
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| KinnowError::Parse {
            message: format!("Invalid manifest: {}", e),
            help: Some("Check kinnow.yaml syntax".to_string()),
        })
    }

    /// Parse manifest from an editor data JSON string.
    pub fn parse_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| KinnowError::Parse {
            message: format!("Invalid editor data: {}", e),
            help: Some("Expected an object with a \"kinnow\" list of directories".to_string()),
        })
    }

    /// Check if a path should be excluded based on exclude patterns.
    pub fn is_excluded(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy().replace('\\', "/");
        self.excludes
            .iter()
            .any(|pattern| matches_pattern(&path_str, pattern))
    }

    /// Whether watch mode should ignore events for `path`.
    pub fn is_watch_ignored(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();
        self.watch_ignore
            .iter()
            .any(|fragment| path_str.contains(fragment.as_str()))
    }

    /// Whether `path` has one of the header extensions.
    pub fn is_header(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map_or(false, |ext| self.extensions.iter().any(|e| e == ext))
    }

    /// Get effective source paths, defaulting to current directory.
    pub fn effective_sources(&self) -> Vec<String> {
        if self.sources.is_empty() {
            vec![".".to_string()]
        } else {
            self.sources.clone()
        }
    }
}

/// Simple glob pattern matching.
fn matches_pattern(path: &str, pattern: &str) -> bool {
    if let Some(suffix) = pattern.strip_prefix("**/") {
        if let Some(dir) = suffix.strip_suffix("/*") {
            return path.contains(&format!("/{}/", dir)) || path.starts_with(&format!("{}/", dir));
        }
        return path.contains(suffix);
    }

    if let Some(suffix) = pattern.strip_prefix('*') {
        if !pattern.contains('/') {
            return path.ends_with(suffix);
        }
    }

    if let Some(prefix) = pattern.strip_suffix("/*") {
        return path.starts_with(&format!("{}/", prefix)) || path.contains(&format!("/{}/", prefix));
    }

    path.contains(pattern)
}
