pub mod completions;
pub mod dump;
pub mod generate;
pub mod init;
pub mod validate;
pub mod watch;

use std::path::Path;

use clap::{Parser, Subcommand};

use crate::discovery::{discover, discover_with_manifest, DiscoveryResult};
use crate::error::Result;

/// kinnow - reflection code generator for CT_* annotated C headers
#[derive(Parser, Debug)]
#[command(name = "kinnow")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate reflection tables from annotated headers
    Generate(generate::GenerateArgs),

    /// Print the metadata tree of the given headers
    Dump(dump::DumpArgs),

    /// Check annotated headers without writing outputs
    Validate(validate::ValidateArgs),

    /// Initialize a kinnow project (generates kinnow.yaml)
    Init(init::InitArgs),

    /// Regenerate whenever a header changes
    Watch(watch::WatchArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Discover a project, using `manifest` instead of the one in `root` when given.
pub(crate) fn discover_project(root: &Path, manifest: Option<&Path>) -> Result<DiscoveryResult> {
    match manifest {
        Some(path) => discover_with_manifest(root, path),
        None => discover(root),
    }
}
