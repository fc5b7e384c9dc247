//! Watch command implementation.
//!
//! Runs one generate pass, then regenerates whenever a header in a source
//! directory changes. Bursts of events (editors writing a file several
//! times) are coalesced into a single pass.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use clap::Args;
use notify::{Event, EventKind, RecursiveMode, Watcher};

use crate::discovery::Manifest;
use crate::error::{KinnowError, Result};
use crate::output::{display_path, Printer};

/// Regenerate whenever a header changes
#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Project root (default: current directory)
    #[arg(default_value = ".")]
    pub root: PathBuf,

    /// Output directory (overrides the manifest)
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Manifest to use instead of the one in the project root
    #[arg(long)]
    pub manifest: Option<PathBuf>,

    /// Quiet period in milliseconds before regenerating
    #[arg(long, default_value = "200")]
    pub debounce: u64,
}

pub fn run(args: WatchArgs, printer: &Printer) -> Result<()> {
    let discovery = super::discover_project(&args.root, args.manifest.as_deref())?;
    let manifest = discovery.manifest.clone();
    let recursive = if manifest.recursive {
        RecursiveMode::Recursive
    } else {
        RecursiveMode::NonRecursive
    };

    regenerate(&args, printer);

    // Outputs may live inside a source directory; their writes are ignored.
    let output = args.output.clone().unwrap_or_else(|| discovery.output_dir());
    let output = output.canonicalize().unwrap_or(output);

    let (tx, rx) = mpsc::channel();
    let mut watcher = notify::recommended_watcher(tx)?;
    let mut watched = 0;
    for dir in discovery.source_dirs() {
        if dir.is_dir() {
            watcher.watch(&dir.canonicalize()?, recursive)?;
            watched += 1;
        } else {
            printer.warning("Missing", &display_path(&dir));
        }
    }
    if watched == 0 {
        return Err(KinnowError::Build {
            message: "no source directory to watch".to_string(),
            help: Some("Check the sources listed in kinnow.yaml".to_string()),
        });
    }
    printer.status("Watching", "for header changes");

    let debounce = Duration::from_millis(args.debounce);
    loop {
        let changed = match next_batch(&rx, &manifest, &output, debounce) {
            Some(changed) => changed,
            None => return Ok(()),
        };
        for path in &changed {
            printer.info("Changed", &display_path(path));
        }
        regenerate(&args, printer);
        printer.status("Watching", "for header changes");
    }
}

/// Run a generate pass, re-discovering so new headers are picked up.
/// Errors are printed; the watch keeps going.
fn regenerate(args: &WatchArgs, printer: &Printer) {
    let result = super::discover_project(&args.root, args.manifest.as_deref()).and_then(|discovery| {
        let output = args.output.clone().unwrap_or_else(|| discovery.output_dir());
        super::generate::generate(&discovery, &output, printer)
    });

    match result {
        Ok(report) => printer.diagnostics(&report.diagnostics),
        Err(e) => printer.error("Error", &e.to_string()),
    }
}

/// Block until a relevant change arrives, then collect everything that
/// follows within `debounce`. Returns `None` once the watcher is gone.
fn next_batch(
    rx: &Receiver<notify::Result<Event>>,
    manifest: &Manifest,
    output: &Path,
    debounce: Duration,
) -> Option<Vec<PathBuf>> {
    let mut changed = Vec::new();

    while changed.is_empty() {
        let event = rx.recv().ok()?;
        collect(event, manifest, output, &mut changed);
    }

    loop {
        match rx.recv_timeout(debounce) {
            Ok(event) => collect(event, manifest, output, &mut changed),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => return Some(changed),
        }
    }
}

fn collect(
    event: notify::Result<Event>,
    manifest: &Manifest,
    output: &Path,
    changed: &mut Vec<PathBuf>,
) {
    let Ok(event) = event else {
        return;
    };
    if !is_content_change(&event.kind) {
        return;
    }
    for path in event.paths {
        if is_relevant(&path, manifest) && !path.starts_with(output) && !changed.contains(&path) {
            changed.push(path);
        }
    }
}

fn is_content_change(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    )
}

/// A header that is not an editor backup or lock file.
fn is_relevant(path: &Path, manifest: &Manifest) -> bool {
    manifest.is_header(path) && !manifest.is_watch_ignored(path) && !manifest.is_excluded(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind, ModifyKind};

    fn event(kind: EventKind, path: &str) -> notify::Result<Event> {
        Ok(Event::new(kind).add_path(PathBuf::from(path)))
    }

    #[test]
    fn test_relevant_paths() {
        let manifest = Manifest::default();
        assert!(is_relevant(Path::new("components/Health.h"), &manifest));
        assert!(!is_relevant(Path::new("components/Health.h~"), &manifest));
        assert!(!is_relevant(Path::new("components/.Health.h.lock/x.h"), &manifest));
        assert!(!is_relevant(Path::new("components/Health.cpp"), &manifest));
    }

    #[test]
    fn test_batch_coalesces_and_filters() {
        let manifest = Manifest::default();
        let (tx, rx) = mpsc::channel();

        tx.send(event(EventKind::Access(AccessKind::Any), "a/Open.h")).unwrap();
        tx.send(event(EventKind::Modify(ModifyKind::Any), "a/Health.h")).unwrap();
        tx.send(event(EventKind::Modify(ModifyKind::Any), "a/Health.h")).unwrap();
        tx.send(event(EventKind::Create(CreateKind::File), "a/Health.h~")).unwrap();
        tx.send(event(EventKind::Create(CreateKind::File), "a/Armor.h")).unwrap();
        tx.send(event(EventKind::Modify(ModifyKind::Any), "a/generated/Gen.h")).unwrap();
        tx.send(Err(notify::Error::generic("lost"))).unwrap();

        let batch = next_batch(&rx, &manifest, Path::new("a/generated"), Duration::from_millis(10)).unwrap();
        assert_eq!(
            batch,
            vec![PathBuf::from("a/Health.h"), PathBuf::from("a/Armor.h")]
        );
    }

    #[test]
    fn test_batch_ends_when_watcher_is_gone() {
        let (tx, rx) = mpsc::channel::<notify::Result<Event>>();
        drop(tx);
        assert!(next_batch(&rx, &Manifest::default(), Path::new("out"), Duration::from_millis(10)).is_none());
    }
}
