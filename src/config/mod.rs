//! Configuration
//!
//! Project configuration loading and defaults. Every field has a serde
//! default so a partial `.apiscribe.config.json` is always accepted.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::generate::GeneratorKind;

/// Default config file name, looked up in the working directory
pub const CONFIG_FILE: &str = ".apiscribe.config.json";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Documentation title
    #[serde(default = "default_title")]
    pub title: String,

    /// API version shown in generated output
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Base URI; its path is stripped from mock requests before routing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_uri: Option<String>,

    /// Default media type of request/response bodies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,

    /// Supported protocols (HTTP, HTTPS)
    #[serde(default)]
    pub protocols: Vec<String>,

    /// File patterns to include (glob syntax)
    #[serde(default = "default_include")]
    pub include: Vec<String>,

    /// File patterns to exclude (glob syntax)
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,

    /// Annotation block delimiters
    #[serde(default)]
    pub block: BlockConfig,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Directory holding recorded examples
    #[serde(default = "default_examples_dir")]
    pub examples_dir: PathBuf,

    /// Mock server settings
    #[serde(default)]
    pub mock: MockConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: default_title(),
            version: None,
            base_uri: None,
            media_type: None,
            protocols: Vec::new(),
            include: default_include(),
            exclude: default_exclude(),
            block: BlockConfig::default(),
            output: OutputConfig::default(),
            examples_dir: default_examples_dir(),
            mock: MockConfig::default(),
        }
    }
}

impl Config {
    /// Load config from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save config to a file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load from default location or fall back to defaults
    pub fn load_or_default() -> Self {
        Self::load(CONFIG_FILE).unwrap_or_default()
    }
}

fn default_title() -> String {
    "API Documentation".to_string()
}

fn default_include() -> Vec<String> {
    vec!["**/*.py".to_string()]
}

fn default_exclude() -> Vec<String> {
    vec![
        // VCS
        "**/.git/**".to_string(),
        // Virtual environments
        "**/.venv/**".to_string(),
        "**/venv/**".to_string(),
        // Cache/temp
        "**/__pycache__/**".to_string(),
        "**/.pytest_cache/**".to_string(),
        "**/.tox/**".to_string(),
        // Build outputs
        "**/build/**".to_string(),
        "**/dist/**".to_string(),
    ]
}

fn default_examples_dir() -> PathBuf {
    std::env::temp_dir().join("apiscribe_examples")
}

/// Start/end markers of an annotation block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockConfig {
    #[serde(default = "default_block_marker")]
    pub start: String,

    #[serde(default = "default_block_marker")]
    pub end: String,
}

fn default_block_marker() -> String {
    "\"\"\"".to_string()
}

impl Default for BlockConfig {
    fn default() -> Self {
        Self {
            start: default_block_marker(),
            end: default_block_marker(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Destination directory for generated files
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,

    /// Generator used when none is given on the command line
    #[serde(default)]
    pub generator: GeneratorKind,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./docs")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            generator: GeneratorKind::default(),
        }
    }
}

/// Mock server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MockConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}
