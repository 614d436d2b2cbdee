//! JSON generators

use std::path::{Path, PathBuf};

use super::{write_json, Generator};
use crate::error::Result;
use crate::model::DocumentationRoot;

/// Writes `index.json`
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonGenerator;

impl Generator for JsonGenerator {
    fn generate(&self, root: &DocumentationRoot, dest: &Path) -> Result<Vec<PathBuf>> {
        Ok(vec![write_json(root, dest, "index.json")?])
    }
}

/// Writes `index.mock.json`, the input of `serve --from`
#[derive(Debug, Clone, Copy, Default)]
pub struct MockGenerator;

impl Generator for MockGenerator {
    fn generate(&self, root: &DocumentationRoot, dest: &Path) -> Result<Vec<PathBuf>> {
        Ok(vec![write_json(root, dest, "index.mock.json")?])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Param, Resource};

    fn root() -> DocumentationRoot {
        let mut root = DocumentationRoot::new("Shop");
        let mut resource = Resource::new("/product", "get");
        resource.set_params([Param::query("sort")]);
        root.resources.insert(resource);
        root
    }

    #[test]
    fn test_json_generator_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let written = JsonGenerator.generate(&root(), dir.path()).unwrap();
        assert_eq!(written, vec![dir.path().join("index.json")]);

        let content = std::fs::read_to_string(&written[0]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(DocumentationRoot::from_value(value).unwrap(), root());
    }

    #[test]
    fn test_mock_generator_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let written = MockGenerator.generate(&root(), &dir.path().join("out")).unwrap();
        assert!(written[0].ends_with("out/index.mock.json"));
        assert!(written[0].exists());
    }
}
