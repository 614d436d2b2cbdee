//! Build command
//!
//! Implements `apiscribe build`: parse annotated sources, attach recorded
//! examples and write the output of one generator.

use std::path::PathBuf;

use anyhow::Result;
use console::style;

use super::output::{print_summary, print_warnings};
use crate::config::Config;
use crate::generate::GeneratorKind;
use crate::index::Documentor;

/// Options for the build command
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Directory holding the annotated sources
    pub source: PathBuf,
    /// Documentation title
    pub title: Option<String>,
    /// Output directory
    pub output: Option<PathBuf>,
    /// Base URI of the documented API
    pub base_uri: Option<String>,
    /// Generator name (markdown, json, mock)
    pub generator: Option<String>,
    /// Directory holding recorded examples
    pub examples: Option<PathBuf>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            source: PathBuf::from("."),
            title: None,
            output: None,
            base_uri: None,
            generator: None,
            examples: None,
        }
    }
}

impl BuildOptions {
    /// Apply the command line overrides on top of `config`
    pub fn apply(&self, mut config: Config) -> Result<Config> {
        if let Some(title) = &self.title {
            config.title = title.clone();
        }
        if let Some(output) = &self.output {
            config.output.dir = output.clone();
        }
        if let Some(base_uri) = &self.base_uri {
            config.base_uri = Some(base_uri.clone());
        }
        if let Some(generator) = &self.generator {
            config.output.generator = generator.parse::<GeneratorKind>()?;
        }
        if let Some(examples) = &self.examples {
            config.examples_dir = examples.clone();
        }
        Ok(config)
    }
}

/// Execute the build command
pub fn execute_build(options: BuildOptions, config: Config) -> Result<()> {
    let config = options.apply(config)?;
    println!(
        "{} Building documentation from {}...",
        style("→").cyan(),
        options.source.display()
    );

    let documentor = Documentor::new(config);
    let report = documentor.build(&options.source)?;

    if report.files.is_empty() {
        eprintln!(
            "{} No files found matching include patterns",
            style("✗").red()
        );
        for pattern in &documentor.config().include {
            eprintln!("    include: {}", pattern);
        }
        std::process::exit(1);
    }

    print_warnings(&report.warnings);

    let kind = documentor.config().output.generator;
    let output_dir = documentor.config().output.dir.clone();
    let written = documentor.generate(&report, kind.generator().as_ref(), &output_dir)?;

    println!(
        "{} {} output written to {} ({} files)",
        style("✓").green(),
        kind,
        output_dir.display(),
        written.len()
    );
    print_summary(&report);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_overrides_config() {
        let options = BuildOptions {
            title: Some("Online Store".to_string()),
            generator: Some("json".to_string()),
            base_uri: Some("http://localhost/api".to_string()),
            ..Default::default()
        };
        let config = options.apply(Config::default()).unwrap();

        assert_eq!(config.title, "Online Store");
        assert_eq!(config.output.generator, GeneratorKind::Json);
        assert_eq!(config.base_uri.as_deref(), Some("http://localhost/api"));
        assert_eq!(config.output.dir, PathBuf::from("./docs"));
    }

    #[test]
    fn test_apply_rejects_unknown_generator() {
        let options = BuildOptions {
            generator: Some("spa".to_string()),
            ..Default::default()
        };
        assert!(options.apply(Config::default()).is_err());
    }
}
