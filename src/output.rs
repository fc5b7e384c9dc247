//! Terminal output for the kinnow CLI.
//!
//! Status lines are Cargo-style, with a right-aligned coloured verb, and go
//! to stderr. Stdout carries only machine-readable output (`dump`,
//! `completions`).

use std::io::{self, IsTerminal, Write};
use std::path::Path;

use crate::validation::{Diagnostic, Diagnostics, Severity};

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";

/// Width for right-aligned verb column.
const VERB_WIDTH: usize = 12;

/// Terminal-aware status printer.
///
/// Colour is enabled when stderr is a terminal.
pub struct Printer {
    color: bool,
}

impl Default for Printer {
    fn default() -> Self {
        Self::new()
    }
}

impl Printer {
    pub fn new() -> Self {
        Self {
            color: io::stderr().is_terminal(),
        }
    }

    /// A printer that never emits colour codes.
    pub fn plain() -> Self {
        Self { color: false }
    }

    /// Print a status line with a green bold verb,
    /// e.g. "    Scanning engine/scene/components".
    pub fn status(&self, verb: &str, message: &str) {
        self.print_line(GREEN, verb, message);
    }

    pub fn success(&self, verb: &str, message: &str) {
        self.print_line(GREEN, verb, message);
    }

    pub fn info(&self, verb: &str, message: &str) {
        self.print_line(CYAN, verb, message);
    }

    pub fn warning(&self, verb: &str, message: &str) {
        self.print_line(YELLOW, verb, message);
    }

    pub fn error(&self, verb: &str, message: &str) {
        self.print_line(RED, verb, message);
    }

    pub fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    pub fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    pub fn cyan(&self, text: &str) -> String {
        self.paint(CYAN, text)
    }

    /// Format a diagnostic severity label with colour.
    pub fn severity(&self, severity: Severity) -> String {
        let label = severity.to_string();
        let color = match severity {
            Severity::Error => RED,
            Severity::Warning => YELLOW,
        };
        if self.color {
            format!("{BOLD}{color}{label}{RESET}")
        } else {
            label
        }
    }

    /// Print every diagnostic, then a one-line summary when there were any.
    pub fn diagnostics(&self, diagnostics: &Diagnostics) {
        if diagnostics.is_empty() {
            return;
        }

        let mut stderr = io::stderr().lock();
        for diagnostic in diagnostics.iter() {
            let _ = write!(stderr, "{}", self.format_diagnostic(diagnostic));
        }
        drop(stderr);

        let summary = format!(
            "{}, {}",
            plural(diagnostics.error_count(), "error", "errors"),
            plural(diagnostics.warning_count(), "warning", "warnings")
        );
        if diagnostics.has_errors() {
            self.error("Found", &summary);
        } else {
            self.warning("Found", &summary);
        }
    }

    /// Format one diagnostic as it is printed, newline-terminated.
    pub fn format_diagnostic(&self, diagnostic: &Diagnostic) -> String {
        let mut text = format!(
            "{}[{}]: {}\n",
            self.severity(diagnostic.severity),
            diagnostic.code,
            diagnostic.message
        );
        if let Some(origin) = diagnostic.origin() {
            text.push_str(&format!("  {} {}\n", self.dim("-->"), self.cyan(&origin)));
        }
        if let Some(help) = &diagnostic.help {
            text.push_str(&format!("  {} {}\n", self.dim("help:"), help));
        }
        text
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.color {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn print_line(&self, color: &str, verb: &str, message: &str) {
        let mut stderr = io::stderr().lock();
        if self.color {
            let _ = writeln!(
                stderr,
                "{BOLD}{color}{verb:>VERB_WIDTH$}{RESET} {message}"
            );
        } else {
            let _ = writeln!(stderr, "{verb:>VERB_WIDTH$} {message}");
        }
    }
}

/// Pluralize a count: `plural(1, "header", "headers")` gives "1 header".
pub fn plural(n: usize, singular: &str, pluralized: &str) -> String {
    if n == 1 {
        format!("{} {}", n, singular)
    } else {
        format!("{} {}", n, pluralized)
    }
}

/// Return a relative display path when possible, absolute otherwise.
pub fn display_path(path: &Path) -> String {
    if let Ok(cwd) = std::env::current_dir() {
        if let Ok(relative) = path.strip_prefix(&cwd) {
            let s = relative.display().to_string();
            if s.is_empty() {
                return ".".to_string();
            }
            return s;
        }
    }
    path.display().to_string()
}
