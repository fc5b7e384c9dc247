use clap::Parser;
use kinnow::cli::{Cli, Commands};
use kinnow::output::Printer;
use miette::Result;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let printer = Printer::new();

    match cli.command {
        Commands::Generate(args) => kinnow::cli::generate::run(args, &printer)?,
        Commands::Dump(args) => kinnow::cli::dump::run(args, &printer)?,
        Commands::Validate(args) => kinnow::cli::validate::run(args, &printer)?,
        Commands::Init(args) => kinnow::cli::init::run(args, &printer)?,
        Commands::Watch(args) => kinnow::cli::watch::run(args, &printer)?,
        Commands::Completions(args) => kinnow::cli::completions::run(args)?,
    }

    Ok(())
}
