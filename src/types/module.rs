//! The aggregated module tree handed to the emitters.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::decl::{Declarations, EnumDecl, StructDecl, TypedefDecl};
use super::markup::ComponentGroups;

/// Declarations of one module plus the run's component groups.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Module {
    #[serde(flatten)]
    pub declarations: Declarations,
    #[serde(rename = "CT_COMPONENT_GROUPS")]
    pub component_groups: ComponentGroups,
}

/// Module name to module, in name order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleTree {
    modules: BTreeMap<String, Module>,
}

impl ModuleTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, module: &str) -> Option<&Module> {
        self.modules.get(module)
    }

    /// Module named `module`, created empty if missing.
    pub fn module_mut(&mut self, module: &str) -> &mut Module {
        self.modules.entry(module.to_string()).or_default()
    }

    pub fn modules(&self) -> impl Iterator<Item = (&str, &Module)> {
        self.modules.iter().map(|(name, m)| (name.as_str(), m))
    }

    pub fn modules_mut(&mut self) -> impl Iterator<Item = &mut Module> {
        self.modules.values_mut()
    }

    /// Every enum in every module, in module then name order.
    pub fn enums(&self) -> impl Iterator<Item = (&str, &EnumDecl)> {
        self.modules
            .values()
            .flat_map(|m| m.declarations.enums.iter())
            .map(|(name, decl)| (name.as_str(), decl))
    }

    /// Every struct in every module, in module then name order.
    pub fn structs(&self) -> impl Iterator<Item = (&str, &StructDecl)> {
        self.modules
            .values()
            .flat_map(|m| m.declarations.structs.iter())
            .map(|(name, decl)| (name.as_str(), decl))
    }

    pub fn typedefs(&self) -> impl Iterator<Item = (&str, &TypedefDecl)> {
        self.modules
            .values()
            .flat_map(|m| m.declarations.typedefs.iter())
            .map(|(name, decl)| (name.as_str(), decl))
    }

    pub fn find_enum(&self, name: &str) -> Option<&EnumDecl> {
        self.modules
            .values()
            .find_map(|m| m.declarations.enums.get(name))
    }

    pub fn find_struct(&self, name: &str) -> Option<&StructDecl> {
        self.modules
            .values()
            .find_map(|m| m.declarations.structs.get(name))
    }

    pub fn find_typedef(&self, name: &str) -> Option<&TypedefDecl> {
        self.modules
            .values()
            .find_map(|m| m.declarations.typedefs.get(name))
    }

    /// The run's component groups (identical on every module).
    pub fn component_groups(&self) -> Option<&ComponentGroups> {
        self.modules.values().next().map(|m| &m.component_groups)
    }

    /// Number of modules.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Total number of declarations across all modules.
    pub fn declaration_count(&self) -> usize {
        self.modules.values().map(|m| m.declarations.len()).sum()
    }
}
