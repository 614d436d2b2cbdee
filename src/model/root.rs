//! Documentation root
//!
//! Aggregate of everything a build produces: API metadata, documents and
//! the resource registry.

use serde::Serialize;

use super::document::{documents_from_value, Document};
use super::resource::ResourceRegistry;
use crate::config::Config;
use crate::error::{ApiscribeError, Result};
use crate::examples_store::ExampleStore;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DocumentationRoot {
    pub title: String,
    pub version: Option<String>,
    pub base_uri: Option<String>,
    pub media_type: Option<String>,
    pub protocols: Vec<String>,
    pub documents: Vec<Document>,
    pub resources: ResourceRegistry,
}

impl DocumentationRoot {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Root carrying the metadata of a project configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            title: config.title.clone(),
            version: config.version.clone(),
            base_uri: config.base_uri.clone(),
            media_type: config.media_type.clone(),
            protocols: config.protocols.clone(),
            ..Default::default()
        }
    }

    pub fn to_value(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Rebuild a root from the JSON written by the JSON or mock generator.
    ///
    /// Elements of `documents` or `resources` with the wrong shape are
    /// rejected with [`ApiscribeError::TypeMismatch`].
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let mut object = match value {
            serde_json::Value::Object(object) => object,
            other => return Err(ApiscribeError::type_mismatch("DocumentationRoot", &other)),
        };

        let title = match object.remove("title") {
            Some(serde_json::Value::String(title)) => title,
            Some(serde_json::Value::Null) | None => String::new(),
            Some(other) => return Err(ApiscribeError::type_mismatch("string", &other)),
        };
        let version = optional_string(object.remove("version"))?;
        let base_uri = optional_string(object.remove("base_uri"))?;
        let media_type = optional_string(object.remove("media_type"))?;
        let protocols = match object.remove("protocols") {
            Some(serde_json::Value::Null) | None => Vec::new(),
            Some(value) => serde_json::from_value(value)?,
        };

        let documents =
            documents_from_value(object.remove("documents").unwrap_or_default())?;
        let resources =
            ResourceRegistry::from_value(object.remove("resources").unwrap_or_default())?;

        Ok(Self {
            title,
            version,
            base_uri,
            media_type,
            protocols,
            documents,
            resources,
        })
    }

    /// Path component of `base_uri`, without a trailing slash.
    ///
    /// Accepts absolute URIs and bare paths; `None` when no base URI is set
    /// or its path is `/`.
    pub fn base_path(&self) -> Result<Option<String>> {
        let Some(base_uri) = self.base_uri.as_deref() else {
            return Ok(None);
        };

        let path = match url::Url::parse(base_uri) {
            Ok(url) => url.path().to_string(),
            Err(url::ParseError::RelativeUrlWithoutBase) if base_uri.starts_with('/') => {
                base_uri.to_string()
            }
            Err(_) => return Err(ApiscribeError::InvalidBaseUri(base_uri.to_string())),
        };

        let trimmed = path.trim_end_matches('/');
        Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
    }

    /// Attach every stored example to the resource its request routes to.
    ///
    /// Returns the number of attached examples.
    pub fn load_resource_examples(&mut self, store: &ExampleStore) -> Result<usize> {
        let base_path = self.base_path()?;
        let mut attached = 0;
        for example in store.load_all()? {
            let path = strip_base(&example.request.path, base_path.as_deref());
            let method = example.request.method.clone();
            match self.resources.find_mut(&path, &method) {
                Some(resource) => {
                    resource.append_example(example);
                    attached += 1;
                }
                None => {
                    tracing::warn!(%path, %method, "example does not match any resource, dropped");
                }
            }
        }
        Ok(attached)
    }
}

/// Request path relative to `base`, with one trailing slash removed
pub fn strip_base(path: &str, base: Option<&str>) -> String {
    let relative = match base {
        Some(base) => match path.strip_prefix(base) {
            Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
            _ => path,
        },
        None => path,
    };

    match relative {
        "" => "/".to_string(),
        "/" => relative.to_string(),
        _ => relative.strip_suffix('/').unwrap_or(relative).to_string(),
    }
}

fn optional_string(value: Option<serde_json::Value>) -> Result<Option<String>> {
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(other) => Err(ApiscribeError::type_mismatch("string", &other)),
    }
}
