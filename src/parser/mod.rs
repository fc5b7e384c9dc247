//! Parser for `CT_*` annotated C headers.
//!
//! A header goes through two stages:
//!
//! 1. [`tokenize`] splits the text into words, literals, comment delimiters
//!    and line breaks.
//! 2. The declaration extractors walk the tokens, digesting markup comments
//!    as they go, and produce the header's [`Declarations`].
//!
//! # Usage
//!
//! ```ignore
//! use kinnow::parser::{parse_header, ParserConfig};
//!
//! let source = std::fs::read_to_string("components/Health.h")?;
//! let header = parse_header(&source, &ParserConfig::default())?;
//!
//! for (name, decl) in &header.declarations.structs {
//!     println!("{}: {} members", name, decl.members.len());
//! }
//! ```

mod context;
mod decl;
mod markup;
pub mod config;
pub mod span;
pub mod token;

pub use config::{ParserConfig, DEFAULT_MODULE};
pub use context::ParseContext;
pub use markup::{normalize_structured, MarkupKey, VOCABULARY};
pub use span::Location;
pub use token::{tokenize, Token, TokenKind, TokenStream};

use crate::error::Result;
use crate::types::{ComponentGroups, Declarations};
use crate::validation::Diagnostics;

use context::HeaderParser;

/// Everything extracted from one header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedHeader {
    /// Module the header's declarations belong to.
    pub module: String,
    pub declarations: Declarations,
    /// Component groups declared in this header.
    pub groups: ComponentGroups,
    /// Warnings raised while extracting.
    pub diagnostics: Diagnostics,
}

/// Parse one header.
///
/// Fails only on malformed markup values (`CT_DEFAULT:`,
/// `CT_COMPONENT_GROUPS:`) and non-numeric `CT_MIN:`-style or enumerator
/// values. Everything else that cannot be understood is skipped and
/// reported in [`ParsedHeader::diagnostics`].
pub fn parse_header(source: &str, config: &ParserConfig) -> Result<ParsedHeader> {
    let mut parser = HeaderParser::new(TokenStream::from_source(source), config);
    let declarations = parser.parse_declarations()?;
    let ParseContext {
        module,
        groups,
        diagnostics,
    } = parser.into_context();

    Ok(ParsedHeader {
        module: module.unwrap_or_else(|| config.default_module.clone()),
        declarations,
        groups,
        diagnostics,
    })
}
