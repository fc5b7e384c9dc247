//! Extraction state for one header.

use crate::error::KinnowError;
use crate::types::ComponentGroups;
use crate::validation::{Diagnostic, Diagnostics};

use super::config::ParserConfig;
use super::span::Location;
use super::token::{Token, TokenKind, TokenStream};

/// Why extraction stopped before the end of a construct.
#[derive(Debug)]
pub(super) enum Halt {
    /// The token stream ran out.
    Exhausted,
    /// A markup value or enumerator could not be parsed.
    Failed(KinnowError),
}

impl From<KinnowError> for Halt {
    fn from(err: KinnowError) -> Self {
        Halt::Failed(err)
    }
}

pub(super) type Step<T> = std::result::Result<T, Halt>;

/// State that outlives a single declaration.
#[derive(Debug, Default)]
pub struct ParseContext {
    /// Module named by `CT_MODULE:`, if any.
    pub module: Option<String>,
    /// Groups declared with `CT_COMPONENT_GROUPS:`.
    pub groups: ComponentGroups,
    /// Warnings raised while extracting.
    pub diagnostics: Diagnostics,
}

/// Drives the tokens of one header through the markup digester and the
/// declaration extractors.
pub(super) struct HeaderParser<'a> {
    pub(super) tokens: TokenStream,
    pub(super) config: &'a ParserConfig,
    pub(super) ctx: ParseContext,
}

impl<'a> HeaderParser<'a> {
    pub(super) fn new(tokens: TokenStream, config: &'a ParserConfig) -> Self {
        Self {
            tokens,
            config,
            ctx: ParseContext::default(),
        }
    }

    pub(super) fn into_context(self) -> ParseContext {
        self.ctx
    }

    /// Next token of any kind.
    pub(super) fn advance(&mut self) -> Step<Token> {
        self.tokens.next().ok_or(Halt::Exhausted)
    }

    /// Next token that is not a line break.
    pub(super) fn advance_significant(&mut self) -> Step<Token> {
        loop {
            let token = self.advance()?;
            if !token.is_newline() {
                return Ok(token);
            }
        }
    }

    /// Whether the next token is the word `word`, without consuming it.
    pub(super) fn peek_is_word(&mut self, word: &str) -> bool {
        self.tokens.peek().map_or(false, |t| t.is_word(word))
    }

    /// Skip `count` significant tokens.
    pub(super) fn skip_tokens(&mut self, count: usize) -> Step<()> {
        for _ in 0..count {
            self.advance_significant()?;
        }
        Ok(())
    }

    /// Skip the rest of the current line, including any comment that starts on it.
    pub(super) fn skip_line(&mut self) -> Step<()> {
        loop {
            let token = self.advance()?;
            match token.kind {
                TokenKind::Newline => return Ok(()),
                TokenKind::CommentOpen => self.skip_comment()?,
                _ => {}
            }
        }
    }

    /// Skip to the end of a block comment without reading its markup.
    pub(super) fn skip_comment(&mut self) -> Step<()> {
        while self.advance()?.kind != TokenKind::CommentClose {}
        Ok(())
    }

    pub(super) fn warn(&mut self, code: &str, message: impl Into<String>, location: Location) {
        self.ctx.diagnostics.push(
            Diagnostic::warning(format!("kinnow::parse::{}", code), message)
                .with_location(location),
        );
    }
}
