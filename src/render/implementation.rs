//! Generated C++ implementation: reflection tables for every enum and struct.
//!
//! Layout of the output:
//!
//! 1. include of the companion header
//! 2. null-terminated old-name arrays for every declaration, constant and member
//! 3. per enum: entry table, reference descriptor, `X_GetFields`
//! 4. per struct: entry table, reference descriptor, `X_GetFields`
//! 5. the global enum and struct registries and their accessors
//! 6. per struct: `X_Init`, applying `CT_DEFAULT` values

use serde_json::Value;

use crate::error::Result;
use crate::render::Renderer;
use crate::types::{Field, Markup, ModuleTree, Number, StructDecl};

pub const FLAG_POINTER: u32 = 0x01;
pub const FLAG_CONST: u32 = 0x02;
pub const FLAG_BITFIELD: u32 = 0x04;
pub const FLAG_HIDDEN: u32 = 0x08;
pub const FLAG_EDITOR_READ_ONLY: u32 = 0x10;
pub const FLAG_NO_LOAD: u32 = 0x20;
pub const FLAG_EMBED_BLOB: u32 = 0x40;
pub const FLAG_COPY_BLOB: u32 = 0x80;

/// Typedef chains longer than this are treated as unresolvable.
const MAX_ALIAS_DEPTH: usize = 16;

/// Reflection data types for built-in and engine types.
const BUILTIN_TYPES: &[(&str, &str)] = &[
    ("int8_t", "CT_KINNOW_REFLECT_INT8"),
    ("int16_t", "CT_KINNOW_REFLECT_INT16"),
    ("int32_t", "CT_KINNOW_REFLECT_INT32"),
    ("int", "CT_KINNOW_REFLECT_INT32"),
    ("int64_t", "CT_KINNOW_REFLECT_INT64"),
    ("uint8_t", "CT_KINNOW_REFLECT_UINT8"),
    ("uint16_t", "CT_KINNOW_REFLECT_UINT16"),
    ("uint32_t", "CT_KINNOW_REFLECT_UINT32"),
    ("unsigned int", "CT_KINNOW_REFLECT_UINT32"),
    ("uint64_t", "CT_KINNOW_REFLECT_UINT64"),
    ("char", "CT_KINNOW_REFLECT_CHAR8"),
    ("bool", "CT_KINNOW_REFLECT_BOOL"),
    ("float", "CT_KINNOW_REFLECT_FLOAT"),
    ("double", "CT_KINNOW_REFLECT_DOUBLE"),
    ("ctVec2", "CT_KINNOW_REFLECT_VEC2"),
    ("ctVec3", "CT_KINNOW_REFLECT_VEC3"),
    ("ctVec4", "CT_KINNOW_REFLECT_VEC4"),
    ("ctQuat", "CT_KINNOW_REFLECT_QUAT"),
    ("ctGUID", "CT_KINNOW_REFLECT_GUID"),
    ("ctEntity", "CT_KINNOW_REFLECT_ENTITY"),
];

const TYPE_ENUM: &str = "CT_KINNOW_REFLECT_ENUM";
const TYPE_STRUCT: &str = "CT_KINNOW_REFLECT_STRUCT";
const TYPE_UNDEFINED: &str = "CT_KINNOW_REFLECT_UNDEFINED";

pub struct ImplementationRenderer {
    header: String,
}

impl ImplementationRenderer {
    /// Renderer whose output includes `header`.
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
        }
    }

    /// Renderer for the header generated next to it as `<stem>.h`.
    pub fn for_stem(stem: &str) -> Self {
        Self::new(format!("{}.h", stem))
    }
}

impl Renderer for ImplementationRenderer {
    fn render(&self, tree: &ModuleTree) -> Result<String> {
        let types = TypeResolver { tree };
        let mut blocks = Vec::new();

        blocks.push(format!(
            "#include \"{}\"\n#include <float.h>\n#include <stddef.h>\n#include <string.h>\n",
            c_escape(&self.header)
        ));

        let mut old_names = String::new();
        for (name, decl) in tree.enums() {
            old_names.push_str(&old_names_array(&format!("_{}", name), &decl.markup));
            for constant in &decl.constants {
                let array = format!("_{}_{}", name, constant.name);
                old_names.push_str(&old_names_array(&array, &constant.markup));
            }
        }
        for (name, decl) in tree.structs() {
            old_names.push_str(&old_names_array(&format!("_{}", name), &decl.markup));
            for member in &decl.members {
                let array = format!("_{}_{}", name, member.name);
                old_names.push_str(&old_names_array(&array, &member.markup));
            }
        }
        if !old_names.is_empty() {
            blocks.push(old_names);
        }

        let mut all_enums = String::new();
        for (name, decl) in tree.enums() {
            let mut block = format!("static ctKinnowReflectEnumEntryField _{}_Fields[] = {{\n", name);
            for constant in &decl.constants {
                block.push_str(&format!(
                    "   {{\"{}\", \"{}\", _{}_{}_OldNames, {}, {}}},\n",
                    c_escape(&constant.name),
                    c_escape(constant.label()),
                    name,
                    constant.name,
                    flags_literal(markup_flags(&constant.markup)),
                    constant.value.unwrap_or_default()
                ));
            }
            block.push_str("   {NULL}\n};\n");
            block.push_str(&format!(
                "static ctKinnowReflectEnumField _{0}_RefField = {{\"{0}\", _{0}_OldNames, {1}, _{0}_Fields}};\n",
                name,
                flags_literal(markup_flags(&decl.markup))
            ));
            block.push_str(&format!(
                "const struct ctKinnowReflectEnumField* {0}_GetFields() {{ return &_{0}_RefField; }}\n",
                name
            ));
            blocks.push(block);
            all_enums.push_str(&format!("   &_{}_RefField,\n", name));
        }

        let mut all_structs = String::new();
        let mut initializers = Vec::new();
        for (name, decl) in tree.structs() {
            blocks.push(struct_block(name, decl, &types));
            all_structs.push_str(&format!("   &_{}_RefField,\n", name));
            initializers.push(init_function(name, decl, &types));
        }

        blocks.push(format!(
            "static const struct ctKinnowReflectEnumField* _CT_KINNOW_ALL_ENUMS[] = {{\n{}   NULL\n}};\n\
             const struct ctKinnowReflectEnumField* const* ctKinnowReflectGetAllEnums() {{ return _CT_KINNOW_ALL_ENUMS; }}\n",
            all_enums
        ));
        blocks.push(format!(
            "static const struct ctKinnowReflectStructField* _CT_KINNOW_ALL_STRUCTS[] = {{\n{}   NULL\n}};\n\
             const struct ctKinnowReflectStructField* const* ctKinnowReflectGetAllStructs() {{ return _CT_KINNOW_ALL_STRUCTS; }}\n",
            all_structs
        ));
        blocks.extend(initializers);

        Ok(blocks.join("\n"))
    }

    fn file_extension(&self) -> &str {
        "cpp"
    }
}

fn struct_block(name: &str, decl: &StructDecl, types: &TypeResolver<'_>) -> String {
    let mut block = format!("static ctKinnowReflectStructEntryField _{}_Fields[] = {{\n", name);
    for member in &decl.members {
        let type_name = member.type_name.as_deref().unwrap_or_default();
        let (data_type, utype) = types.resolve(type_name);
        let markup = &member.markup;

        let min = bound(markup.min, "-DBL_MAX");
        let max = bound(markup.max, "DBL_MAX");
        let soft_min = markup.soft_min.map_or_else(|| min.clone(), |n| bound(Some(n), ""));
        let soft_max = markup.soft_max.map_or_else(|| max.clone(), |n| bound(Some(n), ""));

        block.push_str(&format!(
            "   {{\"{}\", {}, \"{}\", {}, {}, {}, _{}_{}_OldNames, {}, {}, (int32_t)offsetof({}, {}), {}, {}, {}, {}, {}}},\n",
            c_escape(&member.name),
            c_str_or_null(utype.as_deref()),
            c_escape(member.label()),
            c_str_or_null(markup.units.as_deref()),
            c_str_or_null(markup.documentation.as_deref()),
            c_str_or_null(markup.length_var.as_deref()),
            name,
            member.name,
            data_type,
            flags_literal(member_flags(member, types)),
            name,
            member.name,
            member.length.as_deref().unwrap_or("0"),
            min,
            max,
            soft_min,
            soft_max
        ));
    }
    block.push_str("   {NULL}\n};\n");
    block.push_str(&format!(
        "static ctKinnowReflectStructField _{0}_RefField = {{\"{0}\", _{0}_OldNames, {1}, {2}, sizeof({0}), _{0}_Fields}};\n",
        name,
        c_str_or_null(decl.markup.component_name.as_deref()),
        flags_literal(markup_flags(&decl.markup))
    ));
    block.push_str(&format!(
        "const struct ctKinnowReflectStructField* {0}_GetFields() {{ return &_{0}_RefField; }}\n",
        name
    ));
    block
}

/// `X_Init`: zero the struct, then apply each member's `CT_DEFAULT`.
fn init_function(name: &str, decl: &StructDecl, types: &TypeResolver<'_>) -> String {
    let mut body = format!(
        "static void {0}_Init({0}* ptr) {{\n   memset(ptr, 0, sizeof({0}));\n",
        name
    );
    for member in &decl.members {
        for statement in default_statements(member, types) {
            body.push_str("   ");
            body.push_str(&statement);
            body.push('\n');
        }
    }
    body.push_str("}\n");
    body
}

/// Assignments for a member's `CT_DEFAULT`. Defaults that cannot be
/// expressed as plain assignments (objects, pointers to non-char data)
/// produce nothing.
fn default_statements(member: &Field, types: &TypeResolver<'_>) -> Vec<String> {
    let Some(Value::Array(items)) = &member.markup.default else {
        return Vec::new();
    };
    let target = format!("ptr->{}", member.name);
    let is_char = member
        .type_name
        .as_deref()
        .map_or(false, |t| types.resolve(t).0 == "CT_KINNOW_REFLECT_CHAR8");

    match items.as_slice() {
        [Value::String(text)] if member.length.is_some() && is_char && !member.pointer => {
            vec![format!(
                "strncpy({0}, \"{1}\", sizeof({0}) - 1);",
                target,
                c_escape(text)
            )]
        }
        [Value::String(text)] if !member.pointer && member.length.is_none() => {
            vec![format!("{} = {};", target, text)]
        }
        [_] if member.pointer || member.length.is_some() => Vec::new(),
        [single] => scalar_literal(single)
            .map(|v| vec![format!("{} = {};", target, v)])
            .unwrap_or_default(),
        many @ [_, _, ..] if !member.pointer => {
            let Some(values) = many.iter().map(scalar_literal).collect::<Option<Vec<_>>>() else {
                return Vec::new();
            };
            if member.length.is_some() {
                values
                    .iter()
                    .enumerate()
                    .map(|(i, v)| format!("{}[{}] = {};", target, i, v))
                    .collect()
            } else {
                vec![format!("{} = {{{}}};", target, values.join(", "))]
            }
        }
        _ => Vec::new(),
    }
}

/// C literal for a number or boolean default element.
fn scalar_literal(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn bound(value: Option<Number>, fallback: &str) -> String {
    match value {
        Some(n) => format!("{:?}", n.as_f64()),
        None => fallback.to_string(),
    }
}

fn markup_flags(markup: &Markup) -> u32 {
    let mut flags = 0;
    if markup.hidden {
        flags |= FLAG_HIDDEN;
    }
    if markup.editor_read_only {
        flags |= FLAG_EDITOR_READ_ONLY;
    }
    if markup.no_load {
        flags |= FLAG_NO_LOAD;
    }
    if markup.embed_blob {
        flags |= FLAG_EMBED_BLOB;
    }
    if markup.copy_blob {
        flags |= FLAG_COPY_BLOB;
    }
    flags
}

fn member_flags(member: &Field, types: &TypeResolver<'_>) -> u32 {
    let mut flags = markup_flags(&member.markup);
    if member.pointer {
        flags |= FLAG_POINTER;
    }
    if member.is_const {
        flags |= FLAG_CONST;
    }
    if member
        .type_name
        .as_deref()
        .map_or(false, |t| types.is_bitfield(t))
    {
        flags |= FLAG_BITFIELD;
    }
    flags
}

fn flags_literal(flags: u32) -> String {
    format!("0x{:02X}", flags)
}

/// Quoted C string, or `NULL`.
fn c_str_or_null(text: Option<&str>) -> String {
    match text {
        Some(text) => format!("\"{}\"", c_escape(text)),
        None => "NULL".to_string(),
    }
}

/// Escape text for a C string literal. Backslash escapes written in the
/// header are kept as they are.
fn c_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous = None;
    for c in text.chars() {
        match c {
            '"' if previous != Some('\\') => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            c => out.push(c),
        }
        previous = Some(c);
    }
    out
}

/// Null-terminated array of a record's `CT_OLD_NAME` values, named
/// `<prefix>_OldNames`.
fn old_names_array(prefix: &str, markup: &Markup) -> String {
    let mut entries: Vec<String> = markup
        .old_names
        .iter()
        .map(|n| format!("\"{}\"", c_escape(n)))
        .collect();
    entries.push("NULL".to_string());
    format!(
        "static const char* {}_OldNames[] = {{{}}};\n",
        prefix,
        entries.join(", ")
    )
}

/// Maps declared member types to reflection data types.
struct TypeResolver<'a> {
    tree: &'a ModuleTree,
}

impl TypeResolver<'_> {
    /// Reflection data type of `type_name`, plus the enum or struct it
    /// names, following typedef aliases.
    fn resolve(&self, type_name: &str) -> (&'static str, Option<String>) {
        let mut current = type_name.to_string();
        for _ in 0..MAX_ALIAS_DEPTH {
            let bare = strip_elaborated(&current);
            if let Some(&(_, data_type)) = BUILTIN_TYPES.iter().find(|(t, _)| *t == bare) {
                return (data_type, None);
            }
            if self.tree.find_enum(bare).is_some() {
                return (TYPE_ENUM, Some(bare.to_string()));
            }
            if self.tree.find_struct(bare).is_some() {
                return (TYPE_STRUCT, Some(bare.to_string()));
            }
            let Some(alias) = self.tree.find_typedef(bare) else {
                break;
            };
            if let Some(target) = alias.markup.enum_type.as_ref().or(alias.markup.bits.as_ref()) {
                return (TYPE_ENUM, Some(target.clone()));
            }
            current = alias.type_name.clone();
        }
        (TYPE_UNDEFINED, None)
    }

    /// Whether `type_name` is, or aliases, a typedef marked `CT_BITS`.
    fn is_bitfield(&self, type_name: &str) -> bool {
        let mut current = type_name.to_string();
        for _ in 0..MAX_ALIAS_DEPTH {
            let Some(alias) = self.tree.find_typedef(strip_elaborated(&current)) else {
                return false;
            };
            if alias.markup.bits.is_some() {
                return true;
            }
            current = alias.type_name.clone();
        }
        false
    }
}

fn strip_elaborated(type_name: &str) -> &str {
    ["struct ", "enum ", "union "]
        .iter()
        .find_map(|k| type_name.strip_prefix(k))
        .unwrap_or(type_name)
}
