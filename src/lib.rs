//! kinnow - reflection code generator for CT_* annotated C headers
//!
//! Reads C headers whose `typedef struct` and `typedef enum` declarations
//! carry `CT_*` markup comments, merges them into a module tree and emits a
//! JSON dump plus the C reflection tables the engine loads at runtime.

pub mod cli;
pub mod discovery;
pub mod error;
pub mod output;
pub mod parser;
pub mod registry;
pub mod render;
pub mod types;
pub mod validation;

pub use discovery::{discover, discover_paths, DiscoveryResult, LoadResult, Manifest, ScanResult};
pub use error::{KinnowError, Result};
pub use parser::{parse_header, ParsedHeader, ParserConfig};
pub use registry::ModuleTreeBuilder;
pub use render::{create_renderer, write_outputs, HeaderRenderer, ImplementationRenderer, JsonRenderer, Renderer};
pub use types::{
    Declarations, EnumDecl, Field, FieldMap, Markup, Module, ModuleTree, Number, StructDecl,
    TypedefDecl,
};
pub use validation::{validate_tree, Diagnostic, Diagnostics, Severity};
