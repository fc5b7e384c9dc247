use miette::Diagnostic;
use thiserror::Error;

use crate::parser::Location;

/// Main error type for kinnow operations
#[derive(Error, Diagnostic, Debug)]
pub enum KinnowError {
    #[error("IO error: {0}")]
    #[diagnostic(code(kinnow::io))]
    IoError(#[from] std::io::Error),

    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(kinnow::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Parse error: {message}")]
    #[diagnostic(code(kinnow::parse))]
    Parse {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// A `CT_DEFAULT:` or `CT_COMPONENT_GROUPS:` payload that is not valid structured data.
    #[error("{location}: failed to parse {key} value: {text}: {reason}")]
    #[diagnostic(
        code(kinnow::markup),
        help("values are JSON; single quotes are accepted in place of double quotes")
    )]
    MalformedValue {
        key: &'static str,
        text: String,
        reason: String,
        location: Location,
    },

    #[error("{location}: invalid number: {text}")]
    #[diagnostic(code(kinnow::number))]
    InvalidNumber { text: String, location: Location },

    #[error("Render error: {message}")]
    #[diagnostic(code(kinnow::render))]
    Render { message: String },

    #[error("Build error: {message}")]
    #[diagnostic(code(kinnow::build))]
    Build {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Watch error: {0}")]
    #[diagnostic(code(kinnow::watch))]
    Watch(#[from] notify::Error),
}

pub type Result<T> = std::result::Result<T, KinnowError>;
