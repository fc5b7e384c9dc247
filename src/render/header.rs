//! Generated C++ header: reflection accessor declarations.

use crate::error::Result;
use crate::render::Renderer;
use crate::types::ModuleTree;

const PREAMBLE: &str = "#pragma once
#include \"utilities/Common.h\"
#include \"scene/kinnow/KinnowReflection.h\"

const struct ctKinnowReflectEnumField* const* ctKinnowReflectGetAllEnums();
const struct ctKinnowReflectStructField* const* ctKinnowReflectGetAllStructs();
";

pub struct HeaderRenderer;

impl Renderer for HeaderRenderer {
    fn render(&self, tree: &ModuleTree) -> Result<String> {
        let mut output = String::from(PREAMBLE);
        output.push('\n');

        for (name, _) in tree.enums() {
            output.push_str(&format!(
                "const struct ctKinnowReflectEnumField* {}_GetFields();\n\n",
                name
            ));
        }
        for (name, _) in tree.structs() {
            output.push_str(&format!(
                "const struct ctKinnowReflectStructField* {}_GetFields();\n",
                name
            ));
            output.push_str(&format!("static void {0}_Init({0}* ptr);\n\n", name));
        }

        Ok(output)
    }

    fn file_extension(&self) -> &str {
        "h"
    }
}
