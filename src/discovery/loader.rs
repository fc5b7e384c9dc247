//! Header loader - parses discovered headers into a module tree builder.
//!
//! Each header is read and parsed on its own. A header that cannot be read
//! or parsed is recorded as a failure and contributes nothing; the rest of
//! the batch carries on.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{KinnowError, Result};
use crate::parser::{parse_header, ParsedHeader, ParserConfig};
use crate::registry::ModuleTreeBuilder;
use crate::validation::{Diagnostic, Diagnostics};

/// A header that could not be loaded.
#[derive(Debug)]
pub struct LoadFailure {
    pub path: PathBuf,
    pub error: KinnowError,
}

impl LoadFailure {
    /// The failure as an error diagnostic pointing at the header.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diagnostic = Diagnostic::error("kinnow::load", self.error.to_string()).with_path(&self.path);
        match &self.error {
            KinnowError::MalformedValue { location, reason, .. } => diagnostic
                .with_location(*location)
                .with_help(reason.clone()),
            KinnowError::InvalidNumber { location, .. } => diagnostic.with_location(*location),
            _ => diagnostic,
        }
    }
}

/// Outcome of loading a batch of headers.
#[derive(Debug, Default)]
pub struct LoadResult {
    /// Successfully parsed headers, in load order.
    pub headers: Vec<(PathBuf, ParsedHeader)>,
    /// Headers that failed.
    pub failures: Vec<LoadFailure>,
}

impl LoadResult {
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }

    /// Merge the parsed headers into a fresh builder.
    pub fn into_builder(self) -> ModuleTreeBuilder {
        let mut builder = ModuleTreeBuilder::new();
        for (path, header) in self.headers {
            builder.add_header(&path, header);
        }
        builder
    }

    /// Error diagnostics for every failed header.
    pub fn failure_diagnostics(&self) -> Diagnostics {
        let mut diagnostics = Diagnostics::new();
        diagnostics.extend(self.failures.iter().map(LoadFailure::to_diagnostic));
        diagnostics
    }
}

/// Read and parse one header.
pub fn load_header(path: &Path, config: &ParserConfig) -> Result<ParsedHeader> {
    let source = fs::read_to_string(path).map_err(|e| KinnowError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to read header: {}", e),
    })?;
    parse_header(&source, config)
}

/// Load every header in `paths`, isolating failures per file.
pub fn load_headers(paths: &[PathBuf], config: &ParserConfig) -> LoadResult {
    let mut result = LoadResult::default();

    for path in paths {
        match load_header(path, config) {
            Ok(header) => result.headers.push((path.clone(), header)),
            Err(error) => result.failures.push(LoadFailure {
                path: path.clone(),
                error,
            }),
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_failures_do_not_stop_the_batch() {
        let dir = tempdir().unwrap();
        let good = dir.path().join("Good.h");
        let bad = dir.path().join("Bad.h");
        let missing = dir.path().join("Missing.h");
        fs::write(&good, "typedef struct { float hp; } Health;\n").unwrap();
        fs::write(
            &bad,
            "typedef struct {\n  /* CT_DEFAULT: \"{'a': }\" */\n  int a;\n} Broken;\n",
        )
        .unwrap();

        let result = load_headers(
            &[bad.clone(), good.clone(), missing.clone()],
            &ParserConfig::default(),
        );

        assert!(!result.is_ok());
        assert_eq!(result.headers.len(), 1);
        assert_eq!(result.headers[0].0, good);

        let failed: Vec<_> = result.failures.iter().map(|f| f.path.clone()).collect();
        assert_eq!(failed, vec![bad.clone(), missing]);

        let diagnostics = result.failure_diagnostics();
        assert_eq!(diagnostics.error_count(), 2);
        let first = diagnostics.iter().next().unwrap();
        assert_eq!(first.path.as_deref(), Some(bad.as_path()));
        assert_eq!(first.location.map(|l| l.line), Some(2));

        let (tree, _) = result.into_builder().build();
        assert!(tree.find_struct("Health").is_some());
        assert!(tree.find_struct("Broken").is_none());
    }
}
