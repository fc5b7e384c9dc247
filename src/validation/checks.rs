//! Validation checks for the module tree.
//!
//! Each check takes a `&ModuleTree` and returns `Diagnostics`.

use std::collections::{BTreeMap, BTreeSet};

use crate::types::{Markup, ModuleTree, Number};

use super::warning::{Diagnostic, Diagnostics};

/// Check that `CT_ENUM` and `CT_BITS` name declared enums.
pub fn check_enum_refs(tree: &ModuleTree) -> Diagnostics {
    let mut result = Diagnostics::new();

    let mut check = |owner: String, markup: &Markup| {
        for (key, target) in [("CT_ENUM", &markup.enum_type), ("CT_BITS", &markup.bits)] {
            let Some(target) = target else {
                continue;
            };
            if tree.find_enum(target).is_none() {
                result.push(
                    Diagnostic::error(
                        "kinnow::validate::unknown-enum",
                        format!("{} on {} names unknown enum '{}'", key, owner, target),
                    )
                    .with_help("Declare the enum in a scanned header or fix the name"),
                );
            }
        }
    };

    for (name, typedef) in tree.typedefs() {
        check(format!("typedef '{}'", name), &typedef.markup);
    }
    for (name, decl) in tree.structs() {
        for member in &decl.members {
            check(format!("member '{}.{}'", name, member.name), &member.markup);
        }
    }

    result
}

/// Check that `CT_LENGTH_VAR` names a member of the same struct.
pub fn check_length_vars(tree: &ModuleTree) -> Diagnostics {
    let mut result = Diagnostics::new();

    for (name, decl) in tree.structs() {
        for member in &decl.members {
            let Some(length_var) = &member.markup.length_var else {
                continue;
            };
            if !decl.members.contains(length_var) {
                result.push(
                    Diagnostic::error(
                        "kinnow::validate::unknown-length-var",
                        format!(
                            "CT_LENGTH_VAR on '{}.{}' names missing member '{}'",
                            name, member.name, length_var
                        ),
                    )
                    .with_help(format!("Add a '{}' member to {}", length_var, name)),
                );
            }
        }
    }

    result
}

/// Check that component groups only list declared component names.
pub fn check_component_groups(tree: &ModuleTree) -> Diagnostics {
    let mut result = Diagnostics::new();
    let Some(groups) = tree.component_groups() else {
        return result;
    };

    let declared: BTreeSet<&str> = tree
        .structs()
        .filter_map(|(_, decl)| decl.markup.component_name.as_deref())
        .collect();

    for (group, components) in groups {
        for component in components {
            if !declared.contains(component.as_str()) {
                result.push(
                    Diagnostic::warning(
                        "kinnow::validate::unknown-component",
                        format!(
                            "component group '{}' lists '{}', which no struct declares",
                            group, component
                        ),
                    )
                    .with_help("Set CT_COMPONENT_NAME on the component's struct"),
                );
            }
        }
    }

    result
}

/// Check that no two structs share a `CT_COMPONENT_NAME`.
pub fn check_duplicate_component_names(tree: &ModuleTree) -> Diagnostics {
    let mut result = Diagnostics::new();

    let mut owners: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for (name, decl) in tree.structs() {
        if let Some(component) = decl.markup.component_name.as_deref() {
            owners.entry(component).or_default().push(name);
        }
    }

    for (component, structs) in owners {
        if structs.len() > 1 {
            result.push(Diagnostic::error(
                "kinnow::validate::duplicate-component",
                format!(
                    "component name '{}' is used by {}",
                    component,
                    structs.join(", ")
                ),
            ));
        }
    }

    result
}

/// Check that no declaration name is used twice across the tree.
///
/// Generated symbols are named after the declaration alone, so an enum and
/// a struct called `E`, or two `E`s in different modules, cannot coexist.
pub fn check_duplicate_declarations(tree: &ModuleTree) -> Diagnostics {
    let mut result = Diagnostics::new();

    let mut owners: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for (module, contents) in tree.modules() {
        let declarations = &contents.declarations;
        let named = declarations
            .typedefs
            .keys()
            .map(|name| (name, "typedef"))
            .chain(declarations.enums.keys().map(|name| (name, "enum")))
            .chain(declarations.structs.keys().map(|name| (name, "struct")));
        for (name, kind) in named {
            owners
                .entry(name.as_str())
                .or_default()
                .push(format!("{} in module '{}'", kind, module));
        }
    }

    for (name, places) in owners {
        if places.len() > 1 {
            result.push(
                Diagnostic::error(
                    "kinnow::validate::duplicate-declaration",
                    format!("'{}' is declared more than once: {}", name, places.join(", ")),
                )
                .with_help("Rename one of the declarations; generated symbols use the bare name"),
            );
        }
    }

    result
}

/// Check that `CT_MIN`/`CT_MAX` and their soft variants are not inverted.
pub fn check_ranges(tree: &ModuleTree) -> Diagnostics {
    let mut result = Diagnostics::new();

    for (name, decl) in tree.structs() {
        for member in &decl.members {
            let markup = &member.markup;
            for (lo_key, lo, hi_key, hi) in [
                ("CT_MIN", markup.min, "CT_MAX", markup.max),
                ("CT_SOFT_MIN", markup.soft_min, "CT_SOFT_MAX", markup.soft_max),
            ] {
                if let (Some(lo), Some(hi)) = (lo, hi) {
                    if is_inverted(lo, hi) {
                        result.push(Diagnostic::error(
                            "kinnow::validate::inverted-range",
                            format!(
                                "'{}.{}' has {} {} greater than {} {}",
                                name, member.name, lo_key, lo, hi_key, hi
                            ),
                        ));
                    }
                }
            }
        }
    }

    result
}

fn is_inverted(lo: Number, hi: Number) -> bool {
    match (lo, hi) {
        (Number::Int(lo), Number::Int(hi)) => lo > hi,
        (lo, hi) => lo.as_f64() > hi.as_f64(),
    }
}
