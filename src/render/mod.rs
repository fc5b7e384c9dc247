//! Emitters for the aggregated module tree.
//!
//! Each emitter turns a [`ModuleTree`] into the text of one generated file:
//!
//! - [`JsonRenderer`] - `<stem>.json`, the whole tree for tooling
//! - [`HeaderRenderer`] - `<stem>.h`, reflection accessor declarations
//! - [`ImplementationRenderer`] - `<stem>.cpp`, reflection tables

mod header;
mod implementation;
mod json;

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{KinnowError, Result};
use crate::types::ModuleTree;

pub use header::HeaderRenderer;
pub use implementation::ImplementationRenderer;
pub use json::JsonRenderer;

/// Trait for rendering a module tree into one output format.
pub trait Renderer {
    fn render(&self, tree: &ModuleTree) -> Result<String>;
    fn file_extension(&self) -> &str;
}

/// The three renderers of a generate run, for outputs named `stem`.
pub fn renderers(stem: &str) -> Vec<Box<dyn Renderer>> {
    vec![
        Box::new(JsonRenderer),
        Box::new(HeaderRenderer),
        Box::new(ImplementationRenderer::for_stem(stem)),
    ]
}

/// Create a renderer for the given format name.
pub fn create_renderer(format: &str, stem: &str) -> Result<Box<dyn Renderer>> {
    match format {
        "json" => Ok(Box::new(JsonRenderer)),
        "header" | "h" => Ok(Box::new(HeaderRenderer)),
        "impl" | "cpp" => Ok(Box::new(ImplementationRenderer::for_stem(stem))),
        _ => Err(KinnowError::Render {
            message: format!("unknown format: {}. Use json, header, or impl", format),
        }),
    }
}

/// Render every output for `tree` into `dir` as `<stem>.<ext>`.
///
/// All outputs are rendered before any file is written, so a render
/// failure leaves the directory untouched.
pub fn write_outputs(tree: &ModuleTree, dir: &Path, stem: &str) -> Result<Vec<PathBuf>> {
    let rendered = renderers(stem)
        .iter()
        .map(|r| Ok((dir.join(format!("{}.{}", stem, r.file_extension())), r.render(tree)?)))
        .collect::<Result<Vec<_>>>()?;

    fs::create_dir_all(dir).map_err(|e| KinnowError::Io {
        path: dir.to_path_buf(),
        message: format!("Failed to create output directory: {}", e),
    })?;

    let mut written = Vec::with_capacity(rendered.len());
    for (path, text) in rendered {
        fs::write(&path, text).map_err(|e| KinnowError::Io {
            path: path.clone(),
            message: format!("Failed to write output: {}", e),
        })?;
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_create_renderer() {
        assert_eq!(create_renderer("json", "Gen").unwrap().file_extension(), "json");
        assert_eq!(create_renderer("h", "Gen").unwrap().file_extension(), "h");
        assert_eq!(create_renderer("impl", "Gen").unwrap().file_extension(), "cpp");
        assert!(create_renderer("yaml", "Gen").is_err());
    }

    #[test]
    fn test_write_outputs() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("generated");

        let written = write_outputs(&ModuleTree::new(), &dir, "KinnowComponentGen").unwrap();

        let names: Vec<_> = written
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec![
                "KinnowComponentGen.json",
                "KinnowComponentGen.h",
                "KinnowComponentGen.cpp"
            ]
        );
        let cpp = fs::read_to_string(dir.join("KinnowComponentGen.cpp")).unwrap();
        assert!(cpp.starts_with("#include \"KinnowComponentGen.h\"\n"));
    }
}
