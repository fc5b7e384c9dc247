//! `CT_*` markup vocabulary and block comment digestion.
//!
//! Markup lives in block comments next to the declaration it annotates:
//!
//! ```c
//! /* CT_COMPONENT_NAME: "health" CT_LABEL: "Health" */
//! typedef struct health { ... } health;
//! ```
//!
//! Words in a comment that are not `CT_*` keys are prose and ignored.

use serde_json::Value;

use crate::error::KinnowError;
use crate::types::{ComponentGroups, Flag, Markup, Number, NumberField, TextField};

use super::context::{Halt, HeaderParser, Step};
use super::token::{Token, TokenKind};

/// What a recognised markup key does with its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkupKey {
    Flag(Flag),
    Text(TextField),
    Number(NumberField),
    Default,
    OldName,
    ComponentGroups,
    Module,
}

/// Recognised keys, exactly as written in headers. A trailing colon means
/// the key takes the next token as its value.
pub const VOCABULARY: &[(&str, MarkupKey)] = &[
    ("CT_HIDDEN", MarkupKey::Flag(Flag::Hidden)),
    ("CT_EDITOR_READ_ONLY", MarkupKey::Flag(Flag::EditorReadOnly)),
    ("CT_NO_LOAD", MarkupKey::Flag(Flag::NoLoad)),
    ("CT_EMBED_BLOB", MarkupKey::Flag(Flag::EmbedBlob)),
    ("CT_COPY_BLOB", MarkupKey::Flag(Flag::CopyBlob)),
    ("CT_MODULE:", MarkupKey::Module),
    ("CT_LABEL:", MarkupKey::Text(TextField::Label)),
    ("CT_DOCUMENTATION:", MarkupKey::Text(TextField::Documentation)),
    ("CT_UNITS:", MarkupKey::Text(TextField::Units)),
    ("CT_COMPONENT_NAME:", MarkupKey::Text(TextField::ComponentName)),
    ("CT_ENUM:", MarkupKey::Text(TextField::Enum)),
    ("CT_BITS:", MarkupKey::Text(TextField::Bits)),
    ("CT_LENGTH_VAR:", MarkupKey::Text(TextField::LengthVar)),
    ("CT_MIN:", MarkupKey::Number(NumberField::Min)),
    ("CT_MAX:", MarkupKey::Number(NumberField::Max)),
    ("CT_SOFT_MIN:", MarkupKey::Number(NumberField::SoftMin)),
    ("CT_SOFT_MAX:", MarkupKey::Number(NumberField::SoftMax)),
    ("CT_DEFAULT:", MarkupKey::Default),
    ("CT_OLD_NAME:", MarkupKey::OldName),
    ("CT_COMPONENT_GROUPS:", MarkupKey::ComponentGroups),
];

const MARKUP_PREFIX: &str = "CT_";

impl MarkupKey {
    pub fn lookup(word: &str) -> Option<Self> {
        VOCABULARY
            .iter()
            .find(|(key, _)| *key == word)
            .map(|&(_, key)| key)
    }
}

/// Split an unrecognised `CT_*` word into its key and whether it takes a value.
fn extension_key(word: &str) -> Option<(&str, bool)> {
    if word.len() <= MARKUP_PREFIX.len() || !word.starts_with(MARKUP_PREFIX) {
        return None;
    }
    match word.strip_suffix(':') {
        Some(key) => Some((key, true)),
        None => Some((word, false)),
    }
}

/// Turn a markup payload into structured data.
///
/// Single quotes not preceded by a backslash become double quotes. Numbers,
/// booleans and quoted strings become one-element arrays; text starting with
/// `[` or `{` is parsed as JSON; any other bare text becomes a one-element
/// array holding that text.
pub fn normalize_structured(text: &str) -> Result<Value, String> {
    let text = text.trim();
    let requoted = requote(text);

    if let Some(number) = Number::parse(&requoted) {
        return Ok(Value::Array(vec![number.into()]));
    }

    match requoted.as_str() {
        "true" => return Ok(Value::Array(vec![Value::Bool(true)])),
        "false" => return Ok(Value::Array(vec![Value::Bool(false)])),
        _ => {}
    }

    match requoted.chars().next() {
        None => Err("empty value".to_string()),
        Some('[') | Some('{') => serde_json::from_str(&requoted).map_err(|e| e.to_string()),
        Some('"') => serde_json::from_str::<Value>(&requoted)
            .map(|v| Value::Array(vec![v]))
            .map_err(|e| e.to_string()),
        Some(_) => Ok(Value::Array(vec![Value::String(text.to_string())])),
    }
}

fn requote(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous = None;
    for c in text.chars() {
        if c == '\'' && previous != Some('\\') {
            out.push('"');
        } else {
            out.push(c);
        }
        previous = Some(c);
    }
    out
}

/// Merge `incoming` groups into `groups`, later definitions winning.
/// Returns the names of groups that were replaced with a different list.
pub fn merge_groups(groups: &mut ComponentGroups, incoming: ComponentGroups) -> Vec<String> {
    let mut replaced = Vec::new();
    for (name, components) in incoming {
        if let Some(previous) = groups.insert(name.clone(), components) {
            if previous != groups[&name] {
                replaced.push(name);
            }
        }
    }
    replaced
}

impl HeaderParser<'_> {
    /// Read markup up to the closing `*/`. The opening `/*` has been consumed.
    pub(super) fn digest_block_comment(&mut self, record: &mut Markup) -> Step<()> {
        let opened = self.tokens.last_location();
        loop {
            let Some(token) = self.tokens.next() else {
                self.warn(
                    "unterminated-comment",
                    format!("block comment opened at {} is never closed", opened),
                    opened,
                );
                return Err(Halt::Exhausted);
            };

            let TokenKind::Word(word) = &token.kind else {
                if token.kind == TokenKind::CommentClose {
                    return Ok(());
                }
                continue;
            };

            if let Some(key) = MarkupKey::lookup(word) {
                self.apply_markup(key, &token, record)?;
            } else if let Some((key, takes_value)) = extension_key(word) {
                self.apply_extension(key, takes_value, &token, record)?;
            }
        }
    }

    /// Consume block comments on the rest of the current line and its line
    /// break. Stops in front of any other token.
    pub(super) fn finish_line(&mut self, record: &mut Markup) -> Step<()> {
        loop {
            let (newline, comment) = match self.tokens.peek() {
                None => return Ok(()),
                Some(t) => (t.is_newline(), t.kind == TokenKind::CommentOpen),
            };
            if !newline && !comment {
                return Ok(());
            }
            self.tokens.next();
            if newline {
                return Ok(());
            }
            self.digest_block_comment(record)?;
        }
    }

    /// Value token of a key. Line breaks before it are skipped; a missing
    /// value (the comment closes first) is reported and yields `None`.
    fn markup_value(&mut self, key: &Token) -> Step<Option<Token>> {
        loop {
            let (newline, has_text) = match self.tokens.peek() {
                None => return Ok(None),
                Some(t) => (t.is_newline(), t.text().is_some()),
            };
            if newline {
                self.tokens.next();
            } else if has_text {
                return Ok(self.tokens.next());
            } else {
                self.warn("missing-value", format!("{} has no value", key), key.location);
                return Ok(None);
            }
        }
    }

    /// Text of a structured value. An unquoted `{` or `[` opens a payload
    /// that runs until its brackets balance, or up to the end of the
    /// comment if they never do. Any other token is taken as it is.
    fn structured_text(&mut self, first: &Token) -> String {
        let text = first.text().unwrap_or_default();
        if !(first.is_word("{") || first.is_word("[")) {
            return text.to_string();
        }

        let mut pieces = vec![text.to_string()];
        let mut depth = 1usize;
        while depth > 0 {
            let Some(token) = self.tokens.peek() else {
                break;
            };
            match &token.kind {
                TokenKind::Newline => {}
                TokenKind::Word(word) => {
                    match word.as_str() {
                        "{" | "[" => depth += 1,
                        "}" | "]" => depth -= 1,
                        _ => {}
                    }
                    pieces.push(word.clone());
                }
                TokenKind::Literal(literal) => pieces.push(format!("\"{}\"", literal)),
                TokenKind::CommentOpen | TokenKind::CommentClose => break,
            }
            self.tokens.next();
        }
        pieces.join(" ")
    }

    fn apply_markup(&mut self, key: MarkupKey, token: &Token, record: &mut Markup) -> Step<()> {
        if let MarkupKey::Flag(flag) = key {
            record.set_flag(flag);
            return Ok(());
        }

        let Some(value) = self.markup_value(token)? else {
            return Ok(());
        };
        let text = match key {
            MarkupKey::Default | MarkupKey::ComponentGroups => self.structured_text(&value),
            _ => value.text().unwrap_or_default().to_string(),
        };

        match key {
            MarkupKey::Flag(_) => {}
            MarkupKey::Text(field) => record.set_text(field, text),
            MarkupKey::Number(field) => {
                let number = Number::parse(&text).ok_or_else(|| KinnowError::InvalidNumber {
                    text: text.clone(),
                    location: value.location,
                })?;
                record.set_number(field, number);
            }
            MarkupKey::Default => {
                let parsed = normalize_structured(&text).map_err(|reason| {
                    KinnowError::MalformedValue {
                        key: "CT_DEFAULT",
                        text: text.clone(),
                        reason,
                        location: value.location,
                    }
                })?;
                record.default = Some(parsed);
            }
            MarkupKey::OldName => record.old_names.push(text),
            MarkupKey::ComponentGroups => {
                let groups = normalize_structured(&text)
                    .and_then(|v| {
                        serde_json::from_value::<ComponentGroups>(v).map_err(|e| {
                            format!("expected a mapping of group names to component lists: {}", e)
                        })
                    })
                    .map_err(|reason| KinnowError::MalformedValue {
                        key: "CT_COMPONENT_GROUPS",
                        text: text.clone(),
                        reason,
                        location: value.location,
                    })?;
                for name in merge_groups(&mut self.ctx.groups, groups) {
                    self.warn(
                        "group-overwritten",
                        format!("component group '{}' is redefined", name),
                        value.location,
                    );
                }
            }
            MarkupKey::Module => {
                if self.config.honor_module_markup {
                    self.ctx.module = Some(text);
                }
            }
        }
        Ok(())
    }

    fn apply_extension(
        &mut self,
        key: &str,
        takes_value: bool,
        token: &Token,
        record: &mut Markup,
    ) -> Step<()> {
        self.warn(
            "unknown-markup",
            format!("unknown markup key {}", key),
            token.location,
        );

        let value = if takes_value {
            match self.markup_value(token)? {
                Some(value) => Value::String(value.text().unwrap_or_default().to_string()),
                None => return Ok(()),
            }
        } else {
            Value::Bool(true)
        };
        record.extensions.insert(key.to_string(), value);
        Ok(())
    }
}
