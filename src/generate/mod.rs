//! Output generators
//!
//! Writers that turn a [`DocumentationRoot`] into files on disk.

pub mod json;
pub mod markdown;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use json::{JsonGenerator, MockGenerator};
pub use markdown::MarkdownGenerator;

use crate::error::{ApiscribeError, Result};
use crate::model::DocumentationRoot;

/// Renders documentation into a destination directory
pub trait Generator {
    /// Write output under `dest`, returning the written files
    fn generate(&self, root: &DocumentationRoot, dest: &Path) -> Result<Vec<PathBuf>>;
}

/// Available generators
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeneratorKind {
    #[default]
    Markdown,
    Json,
    Mock,
}

impl GeneratorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GeneratorKind::Markdown => "markdown",
            GeneratorKind::Json => "json",
            GeneratorKind::Mock => "mock",
        }
    }

    pub fn generator(&self) -> Box<dyn Generator> {
        match self {
            GeneratorKind::Markdown => Box::new(MarkdownGenerator),
            GeneratorKind::Json => Box::new(JsonGenerator),
            GeneratorKind::Mock => Box::new(MockGenerator),
        }
    }
}

impl FromStr for GeneratorKind {
    type Err = ApiscribeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "markdown" | "md" => Ok(GeneratorKind::Markdown),
            "json" => Ok(GeneratorKind::Json),
            "mock" => Ok(GeneratorKind::Mock),
            other => Err(ApiscribeError::UnknownGenerator(other.to_string())),
        }
    }
}

impl fmt::Display for GeneratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Write `root` as pretty JSON to `dest/file_name`
pub(crate) fn write_json(root: &DocumentationRoot, dest: &Path, file_name: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(dest)?;
    let path = dest.join(file_name);
    let content = serde_json::to_string_pretty(&root.to_value()?)?;
    std::fs::write(&path, content)?;
    Ok(path)
}
