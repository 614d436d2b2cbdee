//! Documentor
//!
//! The build pipeline: discover sources, run both parse passes, register
//! the resulting resources and attach recorded examples.

use std::path::{Path, PathBuf};

use rayon::prelude::*;

use super::discover::find_files;
use crate::config::Config;
use crate::error::Result;
use crate::examples_store::ExampleStore;
use crate::generate::Generator;
use crate::model::{DocumentationRoot, Resource};
use crate::parse::{Parser, SourceFile, Warning};

/// Result of a documentation build
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    pub root: DocumentationRoot,
    pub warnings: Vec<Warning>,
    /// Files that were parsed
    pub files: Vec<PathBuf>,
}

impl BuildReport {
    /// Documented resources without recorded examples
    pub fn without_examples(&self) -> Vec<&Resource> {
        self.root.resources.without_examples()
    }

    /// Resources declaring a parameter name twice, with the repeated names
    pub fn duplicate_params(&self) -> Vec<(&Resource, Vec<String>)> {
        self.root
            .resources
            .documented()
            .map(|r| (r, r.duplicate_param_names()))
            .filter(|(_, names)| !names.is_empty())
            .collect()
    }
}

/// Builds a [`DocumentationRoot`] from annotated sources
pub struct Documentor {
    config: Config,
    parser: Parser,
}

impl Documentor {
    pub fn new(config: Config) -> Self {
        let parser = Parser::new(config.block.clone());
        Self { config, parser }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Read sources in parallel; unreadable files are skipped with a warning
    fn read_sources(&self, files: &[PathBuf]) -> Vec<SourceFile> {
        files
            .par_iter()
            .filter_map(|path| match SourceFile::read(path) {
                Ok(source) => Some(source),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping unreadable file");
                    None
                }
            })
            .collect()
    }

    /// Run both parse passes over the annotated files under `source_dir`.
    ///
    /// No examples are attached.
    pub fn scan<P: AsRef<Path>>(&self, source_dir: P) -> Result<BuildReport> {
        let files = find_files(source_dir.as_ref(), &self.config.include, &self.config.exclude)?;
        let sources = self.read_sources(&files);

        let mut report = self.build_sources(&sources);
        report.files = files;
        Ok(report)
    }

    /// Build documentation from the annotated files under `source_dir`
    pub fn build<P: AsRef<Path>>(&self, source_dir: P) -> Result<BuildReport> {
        let mut report = self.scan(source_dir)?;

        let store = ExampleStore::new(&self.config.examples_dir);
        let attached = report.root.load_resource_examples(&store)?;
        tracing::info!(
            resources = report.root.resources.documented().count(),
            examples = attached,
            warnings = report.warnings.len(),
            "documentation built"
        );
        Ok(report)
    }

    /// Build from sources already in memory, without examples
    pub fn build_sources(&self, sources: &[SourceFile]) -> BuildReport {
        let output = self.parser.parse(sources);
        let mut root = DocumentationRoot::from_config(&self.config);

        for record in &output.resources {
            match record.to_resource() {
                Some(resource) => root.resources.insert(resource),
                None => tracing::debug!(
                    file = %record.filename,
                    line = record.line,
                    "resource without method not registered"
                ),
            }
        }

        BuildReport {
            root,
            warnings: output.warnings,
            files: Vec::new(),
        }
    }

    /// Write a report through a generator
    pub fn generate<P: AsRef<Path>>(
        &self,
        report: &BuildReport,
        generator: &dyn Generator,
        output_dir: P,
    ) -> Result<Vec<PathBuf>> {
        generator.generate(&report.root, output_dir.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = r#"
def handler():
    """
    @api {get} /item/:id Get an item
    @apiQueryParam fields
    @apiQueryParam fields
    """
    """
    @api /orphan No method
    """
"#;

    #[test]
    fn test_build_sources() {
        let documentor = Documentor::new(Config::default());
        let report = documentor.build_sources(&[SourceFile::new("item.py", SOURCE)]);

        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.root.resources.documented().count(), 1);
        assert!(report.root.resources.get("/item/:id-get").is_some());
        assert!(report.root.resources.get("/item/:id-options").is_some());

        let duplicates = report.duplicate_params();
        assert_eq!(duplicates.len(), 1);
        assert_eq!(duplicates[0].1, vec!["fields".to_string()]);
        assert_eq!(report.without_examples().len(), 1);
    }

    #[test]
    fn test_build_reads_tree_and_examples() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src");
        std::fs::create_dir_all(&src).unwrap();
        std::fs::write(src.join("item.py"), SOURCE).unwrap();

        let mut config = Config::default();
        config.title = "Items".to_string();
        config.examples_dir = dir.path().join("examples");

        let store = ExampleStore::new(&config.examples_dir);
        store
            .save(&crate::model::ResourceExample::new(
                crate::model::ExampleRequest::new("get", "/item/7"),
                crate::model::ExampleResponse::new(200),
            ))
            .unwrap();

        let report = Documentor::new(config).build(&src).unwrap();
        assert_eq!(report.files.len(), 1);
        assert_eq!(report.root.title, "Items");
        assert!(report.without_examples().is_empty());
    }
}
