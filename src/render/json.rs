//! JSON dump of the module tree.

use crate::error::{KinnowError, Result};
use crate::render::Renderer;
use crate::types::ModuleTree;

pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, tree: &ModuleTree) -> Result<String> {
        let mut json = serde_json::to_string_pretty(tree).map_err(|e| KinnowError::Render {
            message: format!("Failed to serialize module tree: {}", e),
        })?;
        json.push('\n');
        Ok(json)
    }

    fn file_extension(&self) -> &str {
        "json"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse_header, ParserConfig};
    use crate::registry::ModuleTreeBuilder;
    use pretty_assertions::assert_eq;
    use std::path::Path;

    fn tree(source: &str) -> ModuleTree {
        let mut builder = ModuleTreeBuilder::new();
        builder.add_header(
            Path::new("test.h"),
            parse_header(source, &ParserConfig::default()).unwrap(),
        );
        builder.build().0
    }

    #[test]
    fn test_round_trip() {
        let tree = tree(
            "/* CT_COMPONENT_GROUPS: \"{'shapes':['point']}\" */\n\
             typedef enum {\n  RED, /* CT_LABEL: \"Red\" */\n  GREEN,\n  BLUE\n} Color;\n\
             /* CT_COMPONENT_NAME: \"point\" CT_SPARKLE */\n\
             typedef struct {\n  /* CT_DEFAULT: 0.5 CT_MIN: -1 CT_MAX: 1.5 */\n  float x;\n  float y;\n  const char* tags[4];\n} Point;\n\
             typedef uint32_t ctFlags; /* CT_BITS: \"Color\" */\n",
        );

        let json = JsonRenderer.render(&tree).unwrap();
        let back: ModuleTree = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tree);
    }

    #[test]
    fn test_member_order_is_kept() {
        let tree = tree("typedef struct { float z; float a; float m; } P;");
        let json = JsonRenderer.render(&tree).unwrap();

        let z = json.find("\"z\"").unwrap();
        let a = json.find("\"a\"").unwrap();
        let m = json.find("\"m\"").unwrap();
        assert!(z < a && a < m);
    }

    #[test]
    fn test_snapshot() {
        let tree = tree("typedef enum { RED, GREEN } Color; /* CT_HIDDEN */\n");
        insta::assert_snapshot!(JsonRenderer.render(&tree).unwrap(), @r###"
{
  "default": {
    "CT_TYPEDEFS": {},
    "CT_ENUMS": {
      "Color": {
        "CT_CONSTANTS": {
          "RED": {
            "CT_VALUE": 0
          },
          "GREEN": {
            "CT_VALUE": 1
          }
        },
        "CT_HIDDEN": true
      }
    },
    "CT_STRUCTS": {},
    "CT_COMPONENT_GROUPS": {}
  }
}
"###);
    }
}
