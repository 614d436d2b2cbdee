//! Resources and the resource registry
//!
//! A [`Resource`] is one documented `(path, method)` pair. The
//! [`ResourceRegistry`] keys resources by `path-method`, synthesizes CORS
//! preflight companions, and routes concrete request paths to templates.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use super::example::ResourceExample;
use super::param::{deserialize_bucket, Param, ParamKind};

/// Access requirements of a resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Security {
    #[serde(default)]
    pub roles: Vec<String>,
}

/// One documented endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub path: String,
    pub method: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub security: Security,
    #[serde(default, deserialize_with = "header_bucket")]
    pub header_params: Vec<Param>,
    #[serde(default, deserialize_with = "url_bucket")]
    pub uri_params: Vec<Param>,
    #[serde(default, deserialize_with = "query_bucket")]
    pub query_params: Vec<Param>,
    #[serde(default, deserialize_with = "form_bucket")]
    pub form_params: Vec<Param>,
    #[serde(default)]
    pub examples: Vec<ResourceExample>,

    /// Set on the `options` resources the registry adds for CORS preflight
    #[serde(skip)]
    pub(crate) cors_companion: bool,
}

fn header_bucket<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Param>, D::Error> {
    deserialize_bucket(d, ParamKind::Header)
}

fn url_bucket<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Param>, D::Error> {
    deserialize_bucket(d, ParamKind::Url)
}

fn query_bucket<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Param>, D::Error> {
    deserialize_bucket(d, ParamKind::Query)
}

fn form_bucket<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Param>, D::Error> {
    deserialize_bucket(d, ParamKind::Form)
}

impl Resource {
    /// Create an empty resource; the method is normalized to lower case
    pub fn new(path: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method: method.into().to_lowercase(),
            tags: Vec::new(),
            display_name: None,
            description: None,
            security: Security::default(),
            header_params: Vec::new(),
            uri_params: Vec::new(),
            query_params: Vec::new(),
            form_params: Vec::new(),
            examples: Vec::new(),
            cors_companion: false,
        }
    }

    fn cors_for(path: &str) -> Self {
        let mut resource = Self::new(path, "options");
        resource.cors_companion = true;
        resource
    }

    /// Registry key, `path-method`
    pub fn key(&self) -> String {
        format!("{}-{}", self.path, self.method)
    }

    /// File-system friendly name, e.g. `user-me-get`
    pub fn filename(&self) -> String {
        let key = self.key();
        key.strip_prefix('/').unwrap_or(&key).replace('/', "-")
    }

    /// True for the `options` resources added for CORS preflight
    pub fn is_cors_companion(&self) -> bool {
        self.cors_companion
    }

    /// Parameters of every bucket: url, query, header, then form
    pub fn all_params(&self) -> impl Iterator<Item = &Param> {
        self.uri_params
            .iter()
            .chain(&self.query_params)
            .chain(&self.header_params)
            .chain(&self.form_params)
    }

    pub fn params(&self, kind: ParamKind) -> &[Param] {
        match kind {
            ParamKind::Url => &self.uri_params,
            ParamKind::Query => &self.query_params,
            ParamKind::Form => &self.form_params,
            ParamKind::Header => &self.header_params,
        }
    }

    /// Append parameters to the bucket matching each one's kind
    pub fn set_params<I: IntoIterator<Item = Param>>(&mut self, params: I) {
        for param in params {
            match param.kind {
                ParamKind::Url => self.uri_params.push(param),
                ParamKind::Query => self.query_params.push(param),
                ParamKind::Form => self.form_params.push(param),
                ParamKind::Header => self.header_params.push(param),
            }
        }
    }

    pub fn append_example(&mut self, example: ResourceExample) {
        self.examples.push(example);
    }

    /// Parameter names declared more than once within one bucket
    pub fn duplicate_param_names(&self) -> Vec<String> {
        let mut duplicates = Vec::new();
        for kind in [
            ParamKind::Url,
            ParamKind::Query,
            ParamKind::Header,
            ParamKind::Form,
        ] {
            let mut seen = std::collections::HashSet::new();
            for param in self.params(kind) {
                if !seen.insert(param.name.as_str()) && !duplicates.contains(&param.name) {
                    duplicates.push(param.name.clone());
                }
            }
        }
        duplicates
    }

    pub fn to_value(&self) -> crate::Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Build a resource from its serialized form
    pub fn from_value(value: serde_json::Value) -> crate::Result<Self> {
        let is_resource = value
            .as_object()
            .is_some_and(|o| o.get("path").is_some_and(|p| p.is_string()) && o.contains_key("method"));
        if !is_resource {
            return Err(crate::ApiscribeError::type_mismatch("Resource", &value));
        }
        let mut resource: Resource = serde_json::from_value(value)?;
        resource.method = resource.method.to_lowercase();
        Ok(resource)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method.to_uppercase(), self.path)
    }
}

/// Resources grouped by path, then by method
pub type ResourceTree<'a> = IndexMap<&'a str, IndexMap<&'a str, &'a Resource>>;

/// Keyed collection of resources with template routing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceRegistry {
    resources: IndexMap<String, Resource>,
}

fn is_placeholder(segment: &str) -> bool {
    segment.starts_with(':') || (segment.starts_with('{') && segment.ends_with('}'))
}

fn segments(path: &str) -> Vec<&str> {
    path.strip_prefix('/').unwrap_or(path).split('/').collect()
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a resource, replacing any entry with the same key.
    ///
    /// Also adds an empty `options` resource at the same path unless one
    /// is already registered.
    pub fn insert(&mut self, resource: Resource) {
        let path = resource.path.clone();
        let needs_cors = resource.method != "options";
        tracing::debug!(key = %resource.key(), "registering resource");
        self.resources.insert(resource.key(), resource);

        if needs_cors {
            let companion = Resource::cors_for(&path);
            self.resources.entry(companion.key()).or_insert(companion);
        }
    }

    pub fn get(&self, key: &str) -> Option<&Resource> {
        self.resources.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Resource> {
        self.resources.get_mut(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.resources.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Resource> {
        self.resources.values()
    }

    /// Resources that were documented, excluding CORS companions
    pub fn documented(&self) -> impl Iterator<Item = &Resource> {
        self.iter().filter(|r| !r.cors_companion)
    }

    /// Route a concrete path to a registered template.
    ///
    /// Segments match verbatim or against `:name` / `{name}` placeholders.
    /// When several templates match, the first registered wins.
    pub fn find(&self, path: &str, method: &str) -> Option<&Resource> {
        self.position(path, method)
            .and_then(|i| self.resources.get_index(i))
            .map(|(_, r)| r)
    }

    /// Mutable variant of [`ResourceRegistry::find`]
    pub fn find_mut(&mut self, path: &str, method: &str) -> Option<&mut Resource> {
        self.position(path, method)
            .and_then(|i| self.resources.get_index_mut(i))
            .map(|(_, r)| r)
    }

    fn position(&self, path: &str, method: &str) -> Option<usize> {
        let path = if path.len() > 1 {
            path.strip_suffix('/').unwrap_or(path)
        } else {
            path
        };
        let method = method.to_lowercase();
        let wanted = segments(path);

        let mut candidates: Vec<(usize, Vec<&str>)> = self
            .resources
            .values()
            .enumerate()
            .filter(|(_, r)| r.method == method)
            .map(|(i, r)| (i, segments(&r.path)))
            .filter(|(_, s)| s.len() == wanted.len())
            .collect();

        for (index, segment) in wanted.iter().enumerate() {
            candidates.retain(|(_, s)| s[index] == *segment || is_placeholder(s[index]));
            if candidates.is_empty() {
                return None;
            }
        }

        candidates.first().map(|(i, _)| *i)
    }

    /// Resources grouped by path then method
    pub fn tree(&self) -> ResourceTree<'_> {
        let mut tree: ResourceTree<'_> = IndexMap::new();
        for resource in self.resources.values() {
            tree.entry(resource.path.as_str())
                .or_default()
                .insert(resource.method.as_str(), resource);
        }
        tree
    }

    /// Documented resources that have no recorded example
    pub fn without_examples(&self) -> Vec<&Resource> {
        self.documented()
            .filter(|r| r.examples.is_empty())
            .collect()
    }

    /// Build a registry from a list (or single object) of serialized resources
    pub fn from_value(value: serde_json::Value) -> crate::Result<Self> {
        let items = match value {
            serde_json::Value::Array(items) => items,
            serde_json::Value::Null => Vec::new(),
            single @ serde_json::Value::Object(_) => vec![single],
            other => return Err(crate::ApiscribeError::type_mismatch("Resource", &other)),
        };

        let mut registry = Self::new();
        for item in items {
            registry.insert(Resource::from_value(item)?);
        }
        Ok(registry)
    }
}

impl Serialize for ResourceRegistry {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.documented())
    }
}

impl Extend<Resource> for ResourceRegistry {
    fn extend<I: IntoIterator<Item = Resource>>(&mut self, iter: I) {
        for resource in iter {
            self.insert(resource);
        }
    }
}

impl FromIterator<Resource> for ResourceRegistry {
    fn from_iter<I: IntoIterator<Item = Resource>>(iter: I) -> Self {
        let mut registry = Self::new();
        registry.extend(iter);
        registry
    }
}
