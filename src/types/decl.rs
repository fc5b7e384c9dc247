//! Declarations extracted from a header: enums, structs and plain typedefs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::field::FieldMap;
use super::markup::Markup;

/// `typedef enum { ... } Name;`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnumDecl {
    #[serde(rename = "CT_CONSTANTS")]
    pub constants: FieldMap,
    #[serde(flatten)]
    pub markup: Markup,
}

/// `typedef struct { ... } Name;`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructDecl {
    #[serde(rename = "CT_MEMBERS")]
    pub members: FieldMap,
    #[serde(flatten)]
    pub markup: Markup,
}

/// `typedef <type> Name;`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypedefDecl {
    #[serde(rename = "CT_TYPE")]
    pub type_name: String,
    #[serde(flatten)]
    pub markup: Markup,
}

impl TypedefDecl {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            markup: Markup::default(),
        }
    }
}

/// All declarations found in one header, keyed by declaration name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Declarations {
    #[serde(rename = "CT_TYPEDEFS")]
    pub typedefs: BTreeMap<String, TypedefDecl>,
    #[serde(rename = "CT_ENUMS")]
    pub enums: BTreeMap<String, EnumDecl>,
    #[serde(rename = "CT_STRUCTS")]
    pub structs: BTreeMap<String, StructDecl>,
}

impl Declarations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of declarations.
    pub fn len(&self) -> usize {
        self.typedefs.len() + self.enums.len() + self.structs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Merge another set of declarations into this one. Declarations in
    /// `other` replace same-named ones here entirely.
    pub fn merge(&mut self, other: Declarations) {
        self.typedefs.extend(other.typedefs);
        self.enums.extend(other.enums);
        self.structs.extend(other.structs);
    }
}
