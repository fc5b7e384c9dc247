//! Parser configuration.
//!
//! Loaded from the `parser` section of the manifest; every field has a
//! default so an absent section behaves like the stock engine headers.

use serde::{Deserialize, Serialize};

/// Module used when a header carries no `CT_MODULE:` markup.
pub const DEFAULT_MODULE: &str = "default";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Module for headers without `CT_MODULE:`.
    pub default_module: String,

    /// Whether `CT_MODULE:` moves a header's declarations into that module.
    /// When false every header lands in `default_module`.
    pub honor_module_markup: bool,

    /// Macro names that may appear inside a struct body and are not members.
    /// A body word containing one of these is skipped along with its
    /// argument list.
    pub opaque_macros: Vec<String>,

    /// Number of tokens following an opaque macro that belong to it
    /// (`(`, argument, `)`).
    pub opaque_macro_args: usize,

    /// Type recorded for members with more than one level of indirection.
    pub pointer_fallback_type: String,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            default_module: DEFAULT_MODULE.to_string(),
            honor_module_markup: true,
            opaque_macros: vec!["CT_KINNOW_STRUCT".to_string()],
            opaque_macro_args: 3,
            pointer_fallback_type: "void".to_string(),
        }
    }
}

impl ParserConfig {
    /// Whether `word` is an opaque macro invocation.
    pub fn is_opaque_macro(&self, word: &str) -> bool {
        self.opaque_macros.iter().any(|m| word.contains(m.as_str()))
    }
}
