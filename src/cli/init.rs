//! Init command implementation.
//!
//! Generates a `kinnow.yaml` manifest listing the directories that hold
//! annotated headers.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;

use crate::discovery::{scan_directory, Manifest, MANIFEST_FILENAME};
use crate::error::{KinnowError, Result};
use crate::output::{display_path, plural, Printer};

/// Marker that makes a header worth listing.
const MARKUP_MARKER: &str = "CT_";

/// Initialize a kinnow project by generating a kinnow.yaml manifest
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to scan (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Overwrite existing kinnow.yaml
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs, printer: &Printer) -> Result<()> {
    let manifest_path = args.path.join(MANIFEST_FILENAME);

    if manifest_path.exists() && !args.force {
        return Err(KinnowError::Build {
            message: format!("{} already exists", MANIFEST_FILENAME),
            help: Some("Use --force to overwrite".to_string()),
        });
    }

    printer.status("Scanning", &display_path(&args.path));
    let scan_settings = Manifest {
        recursive: true,
        ..Manifest::default()
    };
    let scan = scan_directory(&args.path, &scan_settings);

    let annotated: Vec<&PathBuf> = scan
        .headers
        .iter()
        .filter(|path| is_annotated(path))
        .collect();

    let mut source_dirs = BTreeSet::new();
    for file in &annotated {
        if let Some(parent) = file.parent() {
            let relative = parent.strip_prefix(&args.path).unwrap_or(parent);
            if relative == Path::new("") {
                source_dirs.insert(".".to_string());
            } else {
                source_dirs.insert(relative.to_string_lossy().replace('\\', "/"));
            }
        }
    }

    let yaml = manifest_yaml(&source_dirs);
    fs::write(&manifest_path, &yaml).map_err(|e| KinnowError::Io {
        path: manifest_path.clone(),
        message: format!("Failed to write manifest: {}", e),
    })?;

    if !source_dirs.is_empty() {
        let dirs: Vec<&str> = source_dirs.iter().map(|s| s.as_str()).collect();
        printer.info("Discovered", &dirs.join(", "));
    }

    printer.success(
        "Created",
        &format!(
            "{} ({} found)",
            MANIFEST_FILENAME,
            plural(annotated.len(), "annotated header", "annotated headers")
        ),
    );

    Ok(())
}

fn is_annotated(path: &Path) -> bool {
    fs::read_to_string(path)
        .map(|source| source.contains(MARKUP_MARKER))
        .unwrap_or(false)
}

/// Write the manifest by hand for clean formatting. A project whose only
/// source is the root needs no `sources` list.
fn manifest_yaml(source_dirs: &BTreeSet<String>) -> String {
    let defaults = Manifest::default();
    let mut yaml = String::new();

    let root_only = source_dirs.len() == 1 && source_dirs.contains(".");
    if !source_dirs.is_empty() && !root_only {
        yaml.push_str("sources:\n");
        for dir in source_dirs {
            yaml.push_str(&format!("  - \"{}\"\n", dir));
        }
    }

    yaml.push_str(&format!("output: {}\n", defaults.output.display()));
    yaml.push_str(&format!("output_stem: {}\n", defaults.output_stem));
    yaml
}
