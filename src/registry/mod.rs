//! Module aggregation.
//!
//! Parsed headers are merged into a [`ModuleTree`]: each header's
//! declarations go to the module the header names, and component groups
//! from every header are collected once for the whole run.
//!
//! # Example
//!
//! ```ignore
//! use kinnow::registry::ModuleTreeBuilder;
//!
//! let mut builder = ModuleTreeBuilder::new();
//! builder.add_header(&path, header);
//!
//! let (tree, diagnostics) = builder.build();
//! ```

use std::path::Path;

use crate::parser::ParsedHeader;
use crate::types::{ComponentGroups, ModuleTree};
use crate::validation::{Diagnostic, Diagnostics};

/// Builder for a [`ModuleTree`].
///
/// Headers are merged in the order they are added. A declaration in a later
/// header replaces a same-named one from an earlier header in the same
/// module.
#[derive(Debug, Default)]
pub struct ModuleTreeBuilder {
    tree: ModuleTree,
    groups: ComponentGroups,
    diagnostics: Diagnostics,
    headers: usize,
}

impl ModuleTreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one successfully parsed header.
    pub fn add_header(&mut self, source: &Path, header: ParsedHeader) -> &mut Self {
        let ParsedHeader {
            module,
            declarations,
            groups,
            mut diagnostics,
        } = header;

        diagnostics.attach_path(source);
        self.diagnostics.merge(diagnostics);

        self.tree
            .module_mut(&module)
            .declarations
            .merge(declarations);

        for (name, components) in groups {
            if let Some(previous) = self.groups.insert(name.clone(), components) {
                if previous != self.groups[&name] {
                    self.diagnostics.push(
                        Diagnostic::warning(
                            "kinnow::registry::group-overwritten",
                            format!("component group '{}' is redefined", name),
                        )
                        .with_path(source),
                    );
                }
            }
        }

        self.headers += 1;
        self
    }

    /// Number of headers merged so far.
    pub fn header_count(&self) -> usize {
        self.headers
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Finish the tree. The run's component groups are copied onto every
    /// module.
    pub fn build(self) -> (ModuleTree, Diagnostics) {
        let mut tree = self.tree;
        for module in tree.modules_mut() {
            module.component_groups = self.groups.clone();
        }
        (tree, self.diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse_header, ParserConfig};
    use pretty_assertions::assert_eq;

    fn header(source: &str) -> ParsedHeader {
        parse_header(source, &ParserConfig::default()).unwrap()
    }

    #[test]
    fn test_empty_builder() {
        let (tree, diagnostics) = ModuleTreeBuilder::new().build();
        assert!(tree.is_empty());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_later_header_wins_whole_struct() {
        let mut builder = ModuleTreeBuilder::new();
        builder
            .add_header(
                Path::new("a.h"),
                header("typedef struct { float x; float y; } Point;"),
            )
            .add_header(Path::new("b.h"), header("typedef struct { double z; } Point;"));

        let (tree, _) = builder.build();
        let point = tree.find_struct("Point").unwrap();
        let names: Vec<_> = point.members.names().collect();
        assert_eq!(names, vec!["z"]);
    }

    #[test]
    fn test_modules_are_kept_apart() {
        let mut builder = ModuleTreeBuilder::new();
        builder
            .add_header(
                Path::new("a.h"),
                header("/* CT_MODULE: \"game\" */\ntypedef enum { A } E;"),
            )
            .add_header(Path::new("b.h"), header("typedef enum { B } E;"));

        let (tree, _) = builder.build();
        assert_eq!(tree.len(), 2);
        assert!(tree.get("game").unwrap().declarations.enums.contains_key("E"));
        assert!(tree.get("default").unwrap().declarations.enums.contains_key("E"));
    }

    #[test]
    fn test_groups_copied_to_every_module() {
        let mut builder = ModuleTreeBuilder::new();
        builder
            .add_header(
                Path::new("a.h"),
                header(
                    "/* CT_MODULE: \"game\" CT_COMPONENT_GROUPS: \"{'combat':['Health','Armor']}\" */\n\
                     typedef int a;",
                ),
            )
            .add_header(
                Path::new("b.h"),
                header("/* CT_COMPONENT_GROUPS: \"{'ai':['Behavior']}\" */\ntypedef int b;"),
            );

        let (tree, diagnostics) = builder.build();
        for (_, module) in tree.modules() {
            assert_eq!(module.component_groups["combat"], vec!["Health", "Armor"]);
            assert_eq!(module.component_groups["ai"], vec!["Behavior"]);
        }
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_group_overwrite_across_headers_warns() {
        let mut builder = ModuleTreeBuilder::new();
        builder
            .add_header(
                Path::new("a.h"),
                header("/* CT_COMPONENT_GROUPS: \"{'g':['A']}\" */\ntypedef int a;"),
            )
            .add_header(
                Path::new("b.h"),
                header("/* CT_COMPONENT_GROUPS: \"{'g':['B']}\" */\ntypedef int b;"),
            );

        let (tree, diagnostics) = builder.build();
        assert_eq!(tree.component_groups().unwrap()["g"], vec!["B"]);

        let warning = diagnostics
            .with_code("kinnow::registry::group-overwritten")
            .next()
            .unwrap();
        assert_eq!(warning.path.as_deref(), Some(Path::new("b.h")));
    }

    #[test]
    fn test_header_diagnostics_get_paths() {
        let mut builder = ModuleTreeBuilder::new();
        builder.add_header(Path::new("x.h"), header("/* CT_SPARKLE */\ntypedef int a;"));
        assert_eq!(builder.header_count(), 1);

        let (_, diagnostics) = builder.build();
        let d = diagnostics.iter().next().unwrap();
        assert_eq!(d.code, "kinnow::parse::unknown-markup");
        assert_eq!(d.path.as_deref(), Some(Path::new("x.h")));
    }
}
