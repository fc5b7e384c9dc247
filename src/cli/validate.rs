//! Validate command implementation.

use std::path::PathBuf;

use clap::Args;

use crate::error::{KinnowError, Result};
use crate::output::{plural, Printer};
use crate::validation::{validate_tree, Diagnostics};

/// Check annotated headers without writing outputs
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Project root (default: current directory)
    #[arg(default_value = ".")]
    pub root: PathBuf,

    /// Manifest to use instead of the one in the project root
    #[arg(long)]
    pub manifest: Option<PathBuf>,
}

pub fn run(args: ValidateArgs, printer: &Printer) -> Result<()> {
    let diagnostics = check(&args)?;
    printer.diagnostics(&diagnostics);

    if diagnostics.has_errors() {
        return Err(KinnowError::Build {
            message: format!(
                "validation failed with {}",
                plural(diagnostics.error_count(), "error", "errors")
            ),
            help: None,
        });
    }

    printer.success("Validated", "no errors");
    Ok(())
}

fn check(args: &ValidateArgs) -> Result<Diagnostics> {
    let discovery = super::discover_project(&args.root, args.manifest.as_deref())?;

    let mut diagnostics = Diagnostics::new();
    for missing in &discovery.scan.missing {
        diagnostics.warning(
            "kinnow::discovery::missing-source",
            format!("source directory {} does not exist", missing.display()),
        );
    }

    let loaded = discovery.load();
    diagnostics.merge(loaded.failure_diagnostics());

    let (tree, parse_diagnostics) = loaded.into_builder().build();
    diagnostics.merge(parse_diagnostics);
    diagnostics.merge(validate_tree(&tree));

    Ok(diagnostics)
}
