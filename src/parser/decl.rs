//! Declaration extractors.
//!
//! The top level scans for `typedef` and hands off to one of three
//! extractors depending on what follows it:
//!
//! - `typedef struct [Tag] { ... } [Name];`
//! - `typedef enum [Tag] { ... } [Name];`
//! - anything else: `typedef <type...> <Name>;`
//!
//! Block comments before a `typedef` become the declaration's markup.
//! Inside bodies, comments before a member or constant, and comments on the
//! same line after it, become that member's or constant's markup.

use std::mem;

use crate::error::{KinnowError, Result};
use crate::types::{Declarations, EnumDecl, Field, FieldMap, Markup, Number, StructDecl, TypedefDecl};

use super::context::{Halt, HeaderParser, Step};
use super::span::Location;
use super::token::{Token, TokenKind};

/// Keywords that may precede a member type and are not part of its name.
const ELABORATED_KEYWORDS: &[&str] = &["struct", "enum", "union"];

/// Pieces of a member declaration collected up to its `;`.
#[derive(Debug, Default)]
struct MemberParts {
    is_const: bool,
    words: Vec<String>,
    depth: usize,
    length: Option<String>,
    /// Set after `:` or `=`; later words belong to a bitfield width or
    /// initialiser and are ignored.
    tail: bool,
}

impl MemberParts {
    fn accept(&mut self, token: &Token) {
        if self.tail {
            return;
        }
        let Some(word) = token.text() else {
            return;
        };
        match word {
            "*" => self.depth += 1,
            ":" | "=" => self.tail = true,
            "const" if self.words.is_empty() => self.is_const = true,
            "const" => {}
            w if self.words.is_empty() && ELABORATED_KEYWORDS.contains(&w) => {}
            _ if token.is_identifier() => self.words.push(word.to_string()),
            _ => {}
        }
    }
}

/// Join alias type words, attaching `*` to the word before it.
fn push_type_word(words: &mut Vec<String>, word: &str) {
    match (word, words.last_mut()) {
        ("*", Some(last)) => last.push('*'),
        _ => words.push(word.to_string()),
    }
}

fn is_identifier_text(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_alphanumeric() || c == '_')
}

impl HeaderParser<'_> {
    /// Extract every declaration in the header.
    ///
    /// A declaration cut short by the end of input is dropped with a warning
    /// and ends the header normally. Malformed markup values and enum values
    /// fail the whole header.
    pub(super) fn parse_declarations(&mut self) -> Result<Declarations> {
        let mut declarations = Declarations::new();
        let mut pending = Markup::new();

        while let Some(token) = self.tokens.next() {
            let step = match &token.kind {
                TokenKind::CommentOpen => self.digest_block_comment(&mut pending),
                TokenKind::Word(w) if w == "#" => self.skip_line(),
                TokenKind::Word(w) if w == "typedef" => {
                    let seed = mem::take(&mut pending);
                    let step = self.digest_typedef(seed, &mut declarations);
                    if matches!(step, Err(Halt::Exhausted)) {
                        self.warn(
                            "truncated-declaration",
                            "input ends inside this typedef; it was dropped",
                            token.location,
                        );
                    }
                    step
                }
                _ => Ok(()),
            };

            match step {
                Ok(()) => {}
                Err(Halt::Exhausted) => break,
                Err(Halt::Failed(err)) => return Err(err),
            }
        }

        Ok(declarations)
    }

    /// Next token that is neither a line break nor a comment; comments on
    /// the way are digested into `record`.
    fn next_code_token(&mut self, record: &mut Markup) -> Step<Token> {
        loop {
            let token = self.advance_significant()?;
            if token.kind == TokenKind::CommentOpen {
                self.digest_block_comment(record)?;
            } else {
                return Ok(token);
            }
        }
    }

    /// `typedef` has been consumed; `markup` is the pending file-level markup.
    fn digest_typedef(&mut self, mut markup: Markup, out: &mut Declarations) -> Step<()> {
        let head = self.next_code_token(&mut markup)?;
        if head.is_word("struct") {
            self.digest_typedef_struct(markup, out)
        } else if head.is_word("enum") {
            self.digest_typedef_enum(markup, out)
        } else {
            self.digest_typedef_alias(markup, Vec::new(), head, out)
        }
    }

    /// Read an optional tag and the opening brace of a body.
    ///
    /// Returns `Ok(None)` when there is no body, after handing the rest of
    /// the statement to the alias extractor.
    fn digest_body_head(
        &mut self,
        keyword: &str,
        markup: &mut Markup,
        out: &mut Declarations,
    ) -> Step<Option<Option<String>>> {
        let token = self.next_code_token(markup)?;
        if token.is_word("{") {
            return Ok(Some(None));
        }

        let tag = token.text().unwrap_or_default().to_string();
        let next = self.next_code_token(markup)?;
        if next.is_word("{") {
            return Ok(Some(Some(tag)));
        }

        // `typedef struct Tag Name;` has no body.
        let words = vec![keyword.to_string(), tag];
        self.digest_typedef_alias(mem::take(markup), words, next, out)?;
        Ok(None)
    }

    fn digest_typedef_struct(&mut self, mut markup: Markup, out: &mut Declarations) -> Step<()> {
        let start = self.tokens.last_location();
        let Some(tag) = self.digest_body_head("struct", &mut markup, out)? else {
            return Ok(());
        };

        let mut members = FieldMap::new();
        let mut pending = Markup::new();
        loop {
            let token = self.advance()?;
            match &token.kind {
                TokenKind::Newline => {}
                TokenKind::CommentOpen => self.digest_block_comment(&mut pending)?,
                TokenKind::Word(w) if w == "}" => break,
                TokenKind::Word(w) if w == "#" => self.skip_line()?,
                TokenKind::Word(w) if self.config.is_opaque_macro(w) => {
                    self.skip_tokens(self.config.opaque_macro_args)?;
                }
                _ if token.is_identifier() => {
                    let record = mem::take(&mut pending);
                    if let Some(member) = self.digest_member(token, record)? {
                        members.insert(member);
                    }
                }
                _ => {}
            }
        }

        let name = self.digest_closing_name(&mut markup)?;
        let Some(name) = name.or(tag) else {
            self.warn("anonymous-declaration", "struct has no name; it was skipped", start);
            return Ok(());
        };
        out.structs.insert(name, StructDecl { members, markup });
        Ok(())
    }

    /// One member, starting at its first token, through its `;` and any
    /// comments on the rest of the line.
    fn digest_member(&mut self, first: Token, markup: Markup) -> Step<Option<Field>> {
        let location = first.location;
        let mut field = Field::default().with_markup(markup);
        let mut parts = MemberParts::default();
        parts.accept(&first);

        loop {
            let token = self.advance()?;
            match &token.kind {
                TokenKind::Newline => {}
                TokenKind::CommentOpen => self.digest_block_comment(&mut field.markup)?,
                TokenKind::Word(w) if w == ";" => break,
                TokenKind::Word(w) if w == "[" && !parts.tail => {
                    let len = self.advance_significant()?;
                    if !len.is_word("]") {
                        parts.length = len.text().map(str::to_string);
                        while !self.advance()?.is_word("]") {}
                    }
                }
                _ => parts.accept(&token),
            }
        }
        self.finish_line(&mut field.markup)?;

        let Some(name) = parts.words.pop() else {
            self.warn("malformed-member", "member declaration has no name", location);
            return Ok(None);
        };
        if parts.words.is_empty() {
            self.warn(
                "malformed-member",
                format!("member '{}' has no type", name),
                location,
            );
            return Ok(None);
        }

        let mut type_name = parts.words.join(" ");
        if parts.depth > 1 {
            self.warn(
                "nested-pointer",
                format!(
                    "member '{}' has {} levels of indirection; recorded as {}",
                    name, parts.depth, self.config.pointer_fallback_type
                ),
                location,
            );
            type_name = self.config.pointer_fallback_type.clone();
        }

        field.name = name;
        field.type_name = Some(type_name);
        field.pointer = parts.depth > 0;
        field.is_const = parts.is_const;
        field.length = parts.length;
        Ok(Some(field))
    }

    fn digest_typedef_enum(&mut self, mut markup: Markup, out: &mut Declarations) -> Step<()> {
        let start = self.tokens.last_location();
        let Some(tag) = self.digest_body_head("enum", &mut markup, out)? else {
            return Ok(());
        };

        let mut constants = FieldMap::new();
        let mut pending = Markup::new();
        let mut next_value: i64 = 0;
        loop {
            let token = self.advance()?;
            match &token.kind {
                TokenKind::Newline => {}
                TokenKind::CommentOpen => self.digest_block_comment(&mut pending)?,
                TokenKind::Word(w) if w == "}" => break,
                TokenKind::Word(w) if w == "#" => self.skip_line()?,
                TokenKind::Word(word) if token.is_identifier() => {
                    // `=` is not punctuation, so `A=5` and `A= 5` arrive as one word.
                    let (name, attached) = match word.split_once('=') {
                        Some((name, value)) => (name, Some(value)),
                        None => (word.as_str(), None),
                    };
                    let value = match attached {
                        Some("") => self.digest_enum_value()?,
                        Some(text) => enum_value(text, token.location)?,
                        None if self.peek_is_word("=") => {
                            self.advance()?;
                            self.digest_enum_value()?
                        }
                        None if self.peek_starts_with('=') => {
                            let value = self.advance()?;
                            let text = value.text().unwrap_or_default();
                            enum_value(&text[1..], value.location)?
                        }
                        None => next_value,
                    };
                    next_value = value.saturating_add(1);

                    let mut constant = Field::constant(name.to_string(), value)
                        .with_markup(mem::take(&mut pending));
                    self.digest_constant_end(&mut constant.markup)?;
                    constants.insert(constant);
                }
                _ => {}
            }
        }

        let name = self.digest_closing_name(&mut markup)?;
        let Some(name) = name.or(tag) else {
            self.warn("anonymous-declaration", "enum has no name; it was skipped", start);
            return Ok(());
        };
        out.enums.insert(name, EnumDecl { constants, markup });
        Ok(())
    }

    /// Read the value token after an enumerator's `=`.
    fn digest_enum_value(&mut self) -> Step<i64> {
        let value = self.advance_significant()?;
        Ok(enum_value(value.text().unwrap_or_default(), value.location)?)
    }

    fn peek_starts_with(&mut self, prefix: char) -> bool {
        matches!(self.tokens.peek(), Some(Token { kind: TokenKind::Word(w), .. }) if w.starts_with(prefix))
    }

    /// Skip the rest of a constant up to its `,`, keeping comments on the
    /// way. Stops in front of a line break or `}`.
    fn digest_constant_end(&mut self, record: &mut Markup) -> Step<()> {
        loop {
            let (stop, comma) = match self.tokens.peek() {
                None => return Ok(()),
                Some(t) => (t.is_newline() || t.is_word("}"), t.is_word(",")),
            };
            if stop {
                return Ok(());
            }
            let token = self.advance()?;
            if comma {
                return self.finish_line(record);
            }
            if token.kind == TokenKind::CommentOpen {
                self.digest_block_comment(record)?;
            }
        }
    }

    /// Read `Name;` after a closing brace. Returns the first identifier
    /// before the `;`, if any.
    fn digest_closing_name(&mut self, markup: &mut Markup) -> Step<Option<String>> {
        let mut name = None;
        loop {
            let token = self.next_code_token(markup)?;
            if token.is_word(";") {
                break;
            }
            if name.is_none() && token.is_identifier() {
                name = token.text().map(str::to_string);
            }
        }
        self.finish_line(markup)?;
        Ok(name)
    }

    /// `typedef <type...> <Name>;`. `words` holds type words already read
    /// and `next` is the first unread token.
    fn digest_typedef_alias(
        &mut self,
        mut markup: Markup,
        mut words: Vec<String>,
        next: Token,
        out: &mut Declarations,
    ) -> Step<()> {
        let location = next.location;
        let mut supported = true;
        let mut token = next;
        loop {
            match &token.kind {
                TokenKind::Word(w) if w == ";" => break,
                TokenKind::CommentOpen => self.digest_block_comment(&mut markup)?,
                TokenKind::Word(w) if w == "*" || token.is_identifier() => {
                    push_type_word(&mut words, w)
                }
                TokenKind::Newline => {}
                _ => supported = false,
            }
            token = self.advance()?;
        }
        self.finish_line(&mut markup)?;

        let name = words.pop().filter(|n| is_identifier_text(n));
        match name {
            Some(name) if supported && !words.is_empty() => {
                let mut decl = TypedefDecl::new(words.join(" "));
                decl.markup = markup;
                out.typedefs.insert(name, decl);
            }
            _ => self.unsupported_typedef(location),
        }
        Ok(())
    }

    fn unsupported_typedef(&mut self, location: Location) {
        self.warn(
            "unsupported-typedef",
            "typedef form is not understood; it was skipped",
            location,
        );
    }
}

/// Explicit enumerator value. Only integers are accepted.
fn enum_value(text: &str, location: Location) -> std::result::Result<i64, KinnowError> {
    match Number::parse(text) {
        Some(Number::Int(value)) => Ok(value),
        _ => Err(KinnowError::InvalidNumber {
            text: text.to_string(),
            location,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::config::ParserConfig;
    use crate::parser::token::TokenStream;
    use crate::validation::Diagnostics;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn extract_with(source: &str, config: &ParserConfig) -> (Result<Declarations>, Diagnostics) {
        let mut parser = HeaderParser::new(TokenStream::from_source(source), config);
        let result = parser.parse_declarations();
        (result, parser.into_context().diagnostics)
    }

    fn extract(source: &str) -> Declarations {
        let (result, _) = extract_with(source, &ParserConfig::default());
        result.unwrap()
    }

    fn warnings(source: &str, code: &str) -> usize {
        let (_, diagnostics) = extract_with(source, &ParserConfig::default());
        diagnostics.with_code(code).count()
    }

    fn values(decl: &EnumDecl) -> Vec<(&str, i64)> {
        decl.constants
            .iter()
            .map(|c| (c.name.as_str(), c.value.unwrap()))
            .collect()
    }

    #[test]
    fn test_enum_auto_increment() {
        let decls = extract("typedef enum {\n  RED,\n  GREEN,\n  BLUE\n} Color;\n");
        assert_eq!(
            values(&decls.enums["Color"]),
            vec![("RED", 0), ("GREEN", 1), ("BLUE", 2)]
        );
    }

    #[test]
    fn test_enum_continues_after_explicit_value() {
        let decls = extract("typedef enum { A, B = 10, C, D = -3, E } Letters;");
        assert_eq!(
            values(&decls.enums["Letters"]),
            vec![("A", 0), ("B", 10), ("C", 11), ("D", -3), ("E", -2)]
        );
    }

    #[test]
    fn test_enum_hex_values_and_ignored_expression_tail() {
        let decls = extract(
            "typedef enum {\n  F_A = 0x0001,\n  F_B = 0x0002,\n  F_C = 4 << 0,\n  F_D\n} Flags;",
        );
        assert_eq!(
            values(&decls.enums["Flags"]),
            vec![("F_A", 1), ("F_B", 2), ("F_C", 4), ("F_D", 5)]
        );
    }

    #[test]
    fn test_enum_values_without_spaces() {
        let decls = extract("typedef enum { A=5, B, C= 8, D =-1, E } E;");
        assert_eq!(
            values(&decls.enums["E"]),
            vec![("A", 5), ("B", 6), ("C", 8), ("D", -1), ("E", 0)]
        );
    }

    #[test]
    fn test_enum_value_must_be_integer() {
        let (result, _) =
            extract_with("typedef enum { A = SOME_MACRO } E;", &ParserConfig::default());
        match result {
            Err(KinnowError::InvalidNumber { text, .. }) => assert_eq!(text, "SOME_MACRO"),
            other => panic!("expected invalid number, got {:?}", other),
        }
    }

    #[test]
    fn test_enum_constant_markup() {
        let decls = extract(
            "typedef enum {\n\
             /* CT_LABEL: \"Red\" CT_OLD_NAME: \"SCARLET\" */\n\
             RED,\n\
             GREEN, /* CT_HIDDEN */\n\
             BLUE /* CT_DOCUMENTATION: \"Sky\" */\n\
             } Color;",
        );
        let constants = &decls.enums["Color"].constants;
        let red = constants.get("RED").unwrap();
        assert_eq!(red.markup.label.as_deref(), Some("Red"));
        assert_eq!(red.markup.old_names, vec!["SCARLET"]);
        assert!(constants.get("GREEN").unwrap().markup.hidden);
        assert!(constants.get("BLUE").unwrap().markup.label.is_none());
        assert_eq!(
            constants.get("BLUE").unwrap().markup.documentation.as_deref(),
            Some("Sky")
        );
    }

    #[test]
    fn test_declaration_markup_from_preceding_comment() {
        let decls = extract(
            "/* CT_HIDDEN CT_OLD_NAME: \"a\" CT_OLD_NAME: \"b\" */\n\
             typedef enum { X } Hidden;\n\
             typedef enum { Y } Visible;",
        );
        let hidden = &decls.enums["Hidden"].markup;
        assert!(hidden.hidden);
        assert_eq!(hidden.old_names, vec!["a", "b"]);
        assert!(!decls.enums["Visible"].markup.hidden);
    }

    #[test]
    fn test_struct_members_in_order() {
        let decls = extract("typedef struct {\n  float x;\n  float y;\n} Point;\n");
        let point = &decls.structs["Point"];
        let names: Vec<_> = point.members.names().collect();
        assert_eq!(names, vec!["x", "y"]);
        assert_eq!(point.members.get("x").unwrap().type_name.as_deref(), Some("float"));
    }

    #[test]
    fn test_one_line_struct() {
        let decls = extract("typedef struct { float x; float y; } Point;");
        assert_eq!(decls.structs["Point"].members.len(), 2);
    }

    #[test]
    fn test_pointer_members() {
        let decls = extract("typedef struct {\n  int32_t* foo;\n  int32_t** bar;\n} P;");
        let members = &decls.structs["P"].members;

        let foo = members.get("foo").unwrap();
        assert!(foo.pointer);
        assert_eq!(foo.type_name.as_deref(), Some("int32_t"));

        let bar = members.get("bar").unwrap();
        assert!(bar.pointer);
        assert_eq!(bar.type_name.as_deref(), Some("void"));
    }

    #[test]
    fn test_nested_pointer_warns() {
        assert_eq!(
            warnings("typedef struct { char** names; } S;", "kinnow::parse::nested-pointer"),
            1
        );
    }

    #[test]
    fn test_fixed_array_length() {
        let decls = extract("typedef struct { float values[8]; char name[CT_MAX_NAME]; int open[]; } A;");
        let members = &decls.structs["A"].members;
        assert_eq!(members.get("values").unwrap().length.as_deref(), Some("8"));
        assert_eq!(members.get("name").unwrap().length.as_deref(), Some("CT_MAX_NAME"));
        assert_eq!(members.get("open").unwrap().length, None);
    }

    #[test]
    fn test_const_and_elaborated_members() {
        let decls = extract(
            "typedef struct {\n  const char* label;\n  struct Node* next;\n  enum Mode mode;\n  unsigned int count;\n} S;",
        );
        let members = &decls.structs["S"].members;

        let label = members.get("label").unwrap();
        assert!(label.is_const);
        assert!(label.pointer);
        assert_eq!(label.type_name.as_deref(), Some("char"));

        assert_eq!(members.get("next").unwrap().type_name.as_deref(), Some("Node"));
        assert_eq!(members.get("mode").unwrap().type_name.as_deref(), Some("Mode"));
        assert_eq!(
            members.get("count").unwrap().type_name.as_deref(),
            Some("unsigned int")
        );
    }

    #[test]
    fn test_member_markup_before_and_after() {
        let decls = extract(
            "typedef struct {\n\
             /* CT_UNITS: \"METERS\" CT_MIN: 0 */\n\
             float distance; /* CT_LABEL: \"Distance\" */\n\
             float speed;\n\
             } Motion;",
        );
        let members = &decls.structs["Motion"].members;
        let distance = members.get("distance").unwrap();
        assert_eq!(distance.markup.units.as_deref(), Some("METERS"));
        assert_eq!(distance.markup.min, Some(Number::Int(0)));
        assert_eq!(distance.markup.label.as_deref(), Some("Distance"));
        assert!(members.get("speed").unwrap().markup.is_empty());
    }

    #[test]
    fn test_duplicate_member_replaces_in_place() {
        let decls = extract("typedef struct { int a; float b; double a; } D;");
        let members = &decls.structs["D"].members;
        let names: Vec<_> = members.names().collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(members.get("a").unwrap().type_name.as_deref(), Some("double"));
    }

    #[test]
    fn test_opaque_macro_is_skipped() {
        let decls = extract("typedef struct {\n  CT_KINNOW_STRUCT(Health)\n  float hp;\n} Health;");
        let names: Vec<_> = decls.structs["Health"].members.names().collect();
        assert_eq!(names, vec!["hp"]);
    }

    #[test]
    fn test_configured_opaque_macro() {
        let config = ParserConfig {
            opaque_macros: vec!["MY_REFLECT".to_string()],
            ..ParserConfig::default()
        };
        let (result, _) = extract_with(
            "typedef struct {\n  MY_REFLECT(H)\n  float hp;\n  CT_KINNOW_STRUCT x;\n} H;",
            &config,
        );
        let decls = result.unwrap();
        let names: Vec<_> = decls.structs["H"].members.names().collect();
        assert_eq!(names, vec!["hp", "x"]);
    }

    #[test]
    fn test_bitfield_width_is_ignored() {
        let decls = extract("typedef struct { uint32_t flags : 4; } B;");
        let flags = decls.structs["B"].members.get("flags").unwrap();
        assert_eq!(flags.type_name.as_deref(), Some("uint32_t"));
    }

    #[test]
    fn test_tag_names_anonymous_closing() {
        let decls = extract("typedef struct Tagged { int a; };\ntypedef struct Inner { int b; } Outer;");
        assert!(decls.structs.contains_key("Tagged"));
        assert!(decls.structs.contains_key("Outer"));
        assert!(!decls.structs.contains_key("Inner"));
    }

    #[test]
    fn test_anonymous_declaration_is_skipped() {
        let source = "typedef struct { int a; };";
        assert!(extract(source).is_empty());
        assert_eq!(warnings(source, "kinnow::parse::anonymous-declaration"), 1);
    }

    #[test]
    fn test_generic_typedefs() {
        let decls = extract(
            "typedef uint32_t ctFlags;\ntypedef unsigned char byte;\ntypedef const char* cstr;\n",
        );
        assert_eq!(decls.typedefs["ctFlags"].type_name, "uint32_t");
        assert_eq!(decls.typedefs["byte"].type_name, "unsigned char");
        assert_eq!(decls.typedefs["cstr"].type_name, "const char*");
    }

    #[test]
    fn test_typedef_markup() {
        let decls = extract(
            "/* CT_BITS: \"Flags\" */\ntypedef uint32_t ctFlags; /* CT_LABEL: \"Flags\" */\n",
        );
        let markup = &decls.typedefs["ctFlags"].markup;
        assert_eq!(markup.bits.as_deref(), Some("Flags"));
        assert_eq!(markup.label.as_deref(), Some("Flags"));
    }

    #[test]
    fn test_bodyless_struct_typedef() {
        let decls = extract("typedef struct ctNode ctNode;\ntypedef enum ctMode ctModeAlias;");
        assert_eq!(decls.typedefs["ctNode"].type_name, "struct ctNode");
        assert_eq!(decls.typedefs["ctModeAlias"].type_name, "enum ctMode");
    }

    #[test]
    fn test_function_pointer_typedef_is_unsupported() {
        let source = "typedef void (*callback)(int);\ntypedef int ok;";
        let decls = extract(source);
        assert_eq!(decls.len(), 1);
        assert!(decls.typedefs.contains_key("ok"));
        assert_eq!(warnings(source, "kinnow::parse::unsupported-typedef"), 1);
    }

    #[test]
    fn test_preprocessor_lines_are_skipped() {
        let decls = extract(
            "#pragma once\n#define TYPEDEF typedef int bad; \\\n  more\n\
             typedef struct {\n#if 0\n  int hidden;\n#endif\n  int shown;\n} S;",
        );
        assert!(decls.typedefs.is_empty());
        let names: Vec<_> = decls.structs["S"].members.names().collect();
        assert_eq!(names, vec!["hidden", "shown"]);
    }

    #[test]
    fn test_truncated_declaration_is_dropped() {
        let source = "typedef enum { A } Kept;\ntypedef struct {\n  float x;\n";
        let (result, diagnostics) = extract_with(source, &ParserConfig::default());
        let decls = result.unwrap();
        assert!(decls.enums.contains_key("Kept"));
        assert!(decls.structs.is_empty());
        assert_eq!(
            diagnostics
                .with_code("kinnow::parse::truncated-declaration")
                .count(),
            1
        );
    }

    #[test]
    fn test_malformed_default_fails_header() {
        let (result, _) = extract_with(
            "typedef struct {\n  /* CT_DEFAULT: \"[1,\" */\n  int a;\n} S;",
            &ParserConfig::default(),
        );
        assert!(matches!(
            result,
            Err(KinnowError::MalformedValue { key: "CT_DEFAULT", .. })
        ));
    }

    #[test]
    fn test_default_on_member() {
        let decls = extract("typedef struct {\n  /* CT_DEFAULT: \"[1,2]\" */\n  int pair[2];\n} S;");
        let pair = decls.structs["S"].members.get("pair").unwrap();
        assert_eq!(pair.markup.default, Some(json!([1, 2])));
    }

    #[test]
    fn test_pending_markup_is_cleared_after_typedef() {
        let decls = extract("/* CT_LABEL: \"First\" */\ntypedef int a;\ntypedef int b;");
        assert_eq!(decls.typedefs["a"].markup.label.as_deref(), Some("First"));
        assert!(decls.typedefs["b"].markup.is_empty());
    }
}
