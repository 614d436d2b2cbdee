//! Serve command
//!
//! Implements `apiscribe serve`: start the mock server from a generated JSON
//! document or from a fresh build of annotated sources.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use console::style;

use crate::config::Config;
use crate::index::Documentor;
use crate::mock::{serve, MockResponder};
use crate::model::DocumentationRoot;

/// Where the served documentation comes from
#[derive(Debug, Clone)]
pub enum ServeSource {
    /// `index.json` or `index.mock.json` written by a generator
    Document(PathBuf),
    /// Directory of annotated sources, built on startup
    Sources(PathBuf),
}

/// Options for the serve command
#[derive(Debug, Clone)]
pub struct ServeOptions {
    pub source: ServeSource,
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Load the documentation root named by `source`
pub fn load_root(source: &ServeSource, config: Config) -> Result<DocumentationRoot> {
    match source {
        ServeSource::Document(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let value: serde_json::Value = serde_json::from_str(&content)
                .with_context(|| format!("Invalid JSON in {}", path.display()))?;
            Ok(DocumentationRoot::from_value(value)?)
        }
        ServeSource::Sources(dir) => Ok(Documentor::new(config).build(dir)?.root),
    }
}

/// Execute the serve command
pub async fn execute_serve(options: ServeOptions, config: Config) -> Result<()> {
    let host = options.host.clone().unwrap_or_else(|| config.mock.host.clone());
    let port = options.port.unwrap_or(config.mock.port);
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", host, port))?;

    let root = load_root(&options.source, config)?;
    let responder = MockResponder::new(root)?;

    let examples: usize = responder
        .root()
        .resources
        .documented()
        .map(|r| r.examples.len())
        .sum();
    println!(
        "{} Serving {} resources ({} examples) on http://{}",
        style("→").cyan(),
        responder.root().resources.documented().count(),
        examples,
        addr
    );
    if examples == 0 {
        println!(
            "{} No recorded examples: every request will get 404",
            style("!").yellow()
        );
    }

    serve(Arc::new(responder), addr).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::{Generator, MockGenerator};
    use crate::model::Resource;

    #[test]
    fn test_load_root_from_document() {
        let dir = tempfile::tempdir().unwrap();
        let mut root = DocumentationRoot::new("Shop");
        root.resources.insert(Resource::new("/product", "get"));
        let written = MockGenerator.generate(&root, dir.path()).unwrap();

        let loaded = load_root(&ServeSource::Document(written[0].clone()), Config::default())
            .unwrap();
        assert_eq!(loaded, root);
    }

    #[test]
    fn test_load_root_missing_document() {
        let dir = tempfile::tempdir().unwrap();
        let missing = ServeSource::Document(dir.path().join("index.json"));
        assert!(load_root(&missing, Config::default()).is_err());
    }
}
