//! Generate command implementation.
//!
//! Discovers headers, merges them into one module tree and writes the JSON,
//! header and implementation outputs.

use std::path::{Path, PathBuf};

use clap::Args;

use crate::discovery::DiscoveryResult;
use crate::error::{KinnowError, Result};
use crate::output::{display_path, plural, Printer};
use crate::render::write_outputs;
use crate::validation::{validate_tree, Diagnostics};

/// Generate reflection tables from annotated headers
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Project root (default: current directory)
    #[arg(default_value = ".")]
    pub root: PathBuf,

    /// Output directory (overrides the manifest)
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Manifest to use instead of the one in the project root
    #[arg(long)]
    pub manifest: Option<PathBuf>,

    /// Fail if any header failed to load or validation found errors
    #[arg(long)]
    pub strict: bool,
}

/// What a generate run produced.
#[derive(Debug)]
pub struct GenerateReport {
    /// Files written, in render order.
    pub written: Vec<PathBuf>,
    /// Headers that could not be loaded.
    pub failed: usize,
    /// Load failures, parser warnings and validation results.
    pub diagnostics: Diagnostics,
}

impl GenerateReport {
    pub fn is_clean(&self) -> bool {
        self.failed == 0 && !self.diagnostics.has_errors()
    }
}

pub fn run(args: GenerateArgs, printer: &Printer) -> Result<()> {
    let discovery = super::discover_project(&args.root, args.manifest.as_deref())?;
    let output = args.output.clone().unwrap_or_else(|| discovery.output_dir());

    let report = generate(&discovery, &output, printer)?;
    printer.diagnostics(&report.diagnostics);

    if args.strict && !report.is_clean() {
        return Err(KinnowError::Build {
            message: format!(
                "{} failed, {} reported",
                plural(report.failed, "header", "headers"),
                plural(report.diagnostics.error_count(), "error", "errors")
            ),
            help: Some("Fix the reported problems or run without --strict".to_string()),
        });
    }

    Ok(())
}

/// Load, merge, validate and write one generate run.
///
/// Headers that fail to load are reported and skipped; only a failure to
/// write the outputs is an error.
pub fn generate(discovery: &DiscoveryResult, output: &Path, printer: &Printer) -> Result<GenerateReport> {
    for missing in &discovery.scan.missing {
        printer.warning("Missing", &display_path(missing));
    }
    printer.status(
        "Scanning",
        &format!(
            "{} ({})",
            display_path(&discovery.root),
            plural(discovery.scan.total(), "header", "headers")
        ),
    );

    let loaded = discovery.load();
    for failure in &loaded.failures {
        printer.error("Failed", &display_path(&failure.path));
    }
    let failed = loaded.failures.len();
    let mut diagnostics = loaded.failure_diagnostics();

    let builder = loaded.into_builder();
    let headers = builder.header_count();
    let (tree, parse_diagnostics) = builder.build();
    diagnostics.merge(parse_diagnostics);
    diagnostics.merge(validate_tree(&tree));

    printer.status(
        "Parsed",
        &format!(
            "{} into {} ({})",
            plural(headers, "header", "headers"),
            plural(tree.len(), "module", "modules"),
            plural(tree.declaration_count(), "declaration", "declarations")
        ),
    );

    let written = write_outputs(&tree, output, &discovery.manifest.output_stem)?;
    for path in &written {
        printer.success("Generated", &display_path(path));
    }

    Ok(GenerateReport {
        written,
        failed,
        diagnostics,
    })
}
