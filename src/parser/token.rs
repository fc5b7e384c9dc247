//! Header tokenizer.
//!
//! Splits C header text into a flat stream of tokens. Only the distinctions
//! the declaration extractors need are kept: words (identifiers, numbers and
//! punctuation), string literals, block comment delimiters and line breaks.
//! Everything else (spaces, tabs, carriage returns, stray backslashes) is
//! dropped, and a backslash before a line break joins the two lines.

use std::fmt;
use std::iter::Peekable;
use std::vec::IntoIter;

use super::span::Location;

/// Characters that always form a token of their own.
const PUNCTUATION: &[char] = &[',', '#', ';', '[', ']', '(', ')', '{', '}'];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// Identifier, number, operator or single punctuation character.
    Word(String),
    /// Payload of a `"..."` literal, quotes removed.
    Literal(String),
    /// `/*`
    CommentOpen,
    /// `*/`
    CommentClose,
    /// One `\n` in the source.
    Newline,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub location: Location,
}

impl Token {
    pub fn new(kind: TokenKind, location: Location) -> Self {
        Self { kind, location }
    }

    /// Text of a word or literal token.
    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Word(text) | TokenKind::Literal(text) => Some(text),
            _ => None,
        }
    }

    /// Whether this is the word `word` (literals never match).
    pub fn is_word(&self, word: &str) -> bool {
        matches!(&self.kind, TokenKind::Word(w) if w == word)
    }

    /// Whether this is a word that can start a name: letter, digit or underscore.
    pub fn is_identifier(&self) -> bool {
        match &self.kind {
            TokenKind::Word(w) => w
                .chars()
                .next()
                .map_or(false, |c| c.is_alphanumeric() || c == '_'),
            _ => false,
        }
    }

    pub fn is_newline(&self) -> bool {
        self.kind == TokenKind::Newline
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TokenKind::Word(w) => write!(f, "{}", w),
            TokenKind::Literal(text) => write!(f, "\"{}\"", text),
            TokenKind::CommentOpen => write!(f, "/*"),
            TokenKind::CommentClose => write!(f, "*/"),
            TokenKind::Newline => write!(f, "\\n"),
        }
    }
}

/// Tokenize a header source.
pub fn tokenize(source: &str) -> Vec<Token> {
    Lexer::new(source).run()
}

struct Lexer {
    chars: Vec<(usize, char)>,
    pos: usize,
    line: u32,
    column: u32,
    tokens: Vec<Token>,
    word: String,
    word_start: Location,
}

impl Lexer {
    fn new(source: &str) -> Self {
        Self {
            chars: source.char_indices().collect(),
            pos: 0,
            line: 1,
            column: 1,
            tokens: Vec::new(),
            word: String::new(),
            word_start: Location::start(),
        }
    }

    fn run(mut self) -> Vec<Token> {
        while let Some(c) = self.peek() {
            let next = self.peek_at(1);
            match c {
                '"' => {
                    self.flush_word();
                    self.literal();
                }
                '/' if next == Some('*') => self.pair(TokenKind::CommentOpen),
                '*' if next == Some('/') => self.pair(TokenKind::CommentClose),
                '*' => self.single(TokenKind::Word("*".to_string())),
                '\n' => self.single(TokenKind::Newline),
                '\\' => {
                    self.flush_word();
                    self.bump();
                    self.splice_line();
                }
                c if c.is_whitespace() => {
                    self.flush_word();
                    self.bump();
                }
                c if PUNCTUATION.contains(&c) => self.single(TokenKind::Word(c.to_string())),
                c => {
                    if self.word.is_empty() {
                        self.word_start = self.location();
                    }
                    self.word.push(c);
                    self.bump();
                }
            }
        }
        self.flush_word();
        self.tokens
    }

    fn peek(&self) -> Option<char> {
        self.peek_at(0)
    }

    fn peek_at(&self, ahead: usize) -> Option<char> {
        self.chars.get(self.pos + ahead).map(|&(_, c)| c)
    }

    fn location(&self) -> Location {
        let offset = self
            .chars
            .get(self.pos)
            .map(|&(offset, _)| offset)
            .unwrap_or_else(|| self.chars.last().map_or(0, |&(o, c)| o + c.len_utf8()));
        Location::new(offset, self.line, self.column)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    /// Drop a line break directly after a backslash, joining the two lines.
    fn splice_line(&mut self) {
        if self.peek() == Some('\r') && self.peek_at(1) == Some('\n') {
            self.bump();
        }
        if self.peek() == Some('\n') {
            self.bump();
        }
    }

    fn flush_word(&mut self) {
        if !self.word.is_empty() {
            let word = std::mem::take(&mut self.word);
            self.tokens
                .push(Token::new(TokenKind::Word(word), self.word_start));
        }
    }

    /// Emit a one-character token.
    fn single(&mut self, kind: TokenKind) {
        self.flush_word();
        let location = self.location();
        self.bump();
        self.tokens.push(Token::new(kind, location));
    }

    /// Emit a two-character token.
    fn pair(&mut self, kind: TokenKind) {
        self.flush_word();
        let location = self.location();
        self.bump();
        self.bump();
        self.tokens.push(Token::new(kind, location));
    }

    /// Lex a string literal. An unterminated literal produces no token.
    fn literal(&mut self) {
        let location = self.location();
        self.bump();

        let mut text = String::new();
        loop {
            match self.bump() {
                None => return,
                Some('"') => break,
                Some('\\') => match self.bump() {
                    Some('"') => text.push('"'),
                    Some(c) => {
                        text.push('\\');
                        text.push(c);
                    }
                    None => return,
                },
                Some(c) => text.push(c),
            }
        }
        self.tokens
            .push(Token::new(TokenKind::Literal(text), location));
    }
}

/// Forward-only cursor over a token list with one token of lookahead.
///
/// End of input is an ordinary state: `next` returns `None` and
/// `is_exhausted` reports `true`.
#[derive(Debug)]
pub struct TokenStream {
    tokens: Peekable<IntoIter<Token>>,
    last: Location,
}

impl TokenStream {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens: tokens.into_iter().peekable(),
            last: Location::start(),
        }
    }

    pub fn from_source(source: &str) -> Self {
        Self::new(tokenize(source))
    }

    pub fn peek(&mut self) -> Option<&Token> {
        self.tokens.peek()
    }

    pub fn is_exhausted(&mut self) -> bool {
        self.tokens.peek().is_none()
    }

    /// Location of the most recently consumed token.
    pub fn last_location(&self) -> Location {
        self.last
    }
}

impl Iterator for TokenStream {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.next()?;
        self.last = token.location;
        Some(token)
    }
}
