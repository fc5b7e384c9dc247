//! Diagnostics and cross-reference checks.
//!
//! Parser warnings and the checks below share one [`Diagnostic`] type. The
//! checks run against a built module tree and are used by both
//! `kinnow validate` and `kinnow generate`.

mod checks;
mod warning;

pub use warning::{Diagnostic, Diagnostics, Severity};

use crate::types::ModuleTree;

/// Run all validation checks against the module tree.
pub fn validate_tree(tree: &ModuleTree) -> Diagnostics {
    let mut result = Diagnostics::new();

    result.merge(checks::check_enum_refs(tree));
    result.merge(checks::check_length_vars(tree));
    result.merge(checks::check_component_groups(tree));
    result.merge(checks::check_duplicate_component_names(tree));
    result.merge(checks::check_duplicate_declarations(tree));
    result.merge(checks::check_ranges(tree));

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse_header, ParserConfig};
    use crate::registry::ModuleTreeBuilder;
    use std::path::Path;

    #[test]
    fn test_validate_empty_tree() {
        let result = validate_tree(&ModuleTree::new());
        assert!(result.is_ok());
    }

    #[test]
    fn test_validate_valid_tree() {
        let mut builder = ModuleTreeBuilder::new();
        builder.add_header(
            Path::new("Health.h"),
            parse_header(
                "/* CT_COMPONENT_GROUPS: \"{'combat':['health']}\" */\n\
                 /* CT_COMPONENT_NAME: \"health\" */\n\
                 typedef struct {\n  /* CT_MIN: 0 CT_MAX: 100 */\n  float hp;\n} Health;\n",
                &ParserConfig::default(),
            )
            .unwrap(),
        );
        let (tree, _) = builder.build();

        assert!(validate_tree(&tree).is_ok());
    }
}
