//! Metadata model for reflected declarations.
//!
//! - `Markup` - `CT_*` annotations on a declaration, member or constant
//! - `Field` / `FieldMap` - struct members and enum constants in order
//! - `EnumDecl`, `StructDecl`, `TypedefDecl` - extracted declarations
//! - `Module` / `ModuleTree` - declarations aggregated across headers

mod decl;
mod field;
mod markup;
mod module;

pub use decl::{Declarations, EnumDecl, StructDecl, TypedefDecl};
pub use field::{Field, FieldMap};
pub use markup::{ComponentGroups, Flag, Markup, Number, NumberField, TextField};
pub use module::{Module, ModuleTree};
