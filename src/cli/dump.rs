//! Dump command implementation.
//!
//! Renders the given headers in one output format to stdout.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Args;

use crate::discovery::{discover_paths, DEFAULT_OUTPUT_STEM};
use crate::error::{KinnowError, Result};
use crate::output::{display_path, Printer};
use crate::render::create_renderer;

/// Print the metadata tree of the given headers
#[derive(Args, Debug)]
pub struct DumpArgs {
    /// Headers (or directories of headers) to read
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output format: json, header or impl
    #[arg(long, short, default_value = "json")]
    pub format: String,

    /// Name of the generated header, used by the impl format's include
    #[arg(long, default_value = DEFAULT_OUTPUT_STEM)]
    pub stem: String,
}

pub fn run(args: DumpArgs, printer: &Printer) -> Result<()> {
    let text = render(&args, printer)?;

    let mut stdout = io::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

fn render(args: &DumpArgs, printer: &Printer) -> Result<String> {
    let renderer = create_renderer(&args.format, &args.stem)?;

    let discovery = discover_paths(&args.files);
    for missing in &discovery.scan.missing {
        printer.warning("Missing", &display_path(missing));
    }

    let loaded = discovery.load();
    let mut diagnostics = loaded.failure_diagnostics();
    let failed = loaded.failures.len();
    let (tree, parse_diagnostics) = loaded.into_builder().build();
    diagnostics.merge(parse_diagnostics);
    printer.diagnostics(&diagnostics);

    if failed > 0 && tree.is_empty() {
        return Err(KinnowError::Build {
            message: "no header could be loaded".to_string(),
            help: None,
        });
    }

    renderer.render(&tree)
}
