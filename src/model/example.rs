//! Recorded examples
//!
//! Request/response pairs captured while exercising an API. They feed both
//! the generated documentation and the mock server.

use std::fmt;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::headers::CaseInsensitiveMap;

/// Body encodings recognised from a `Content-Type` header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyFormat {
    Json,
    Yaml,
    Xml,
}

impl BodyFormat {
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let mime = content_type.split(';').next().unwrap_or("").trim();
        match mime.to_ascii_lowercase().as_str() {
            "application/json" => Some(BodyFormat::Json),
            "application/x-yaml" => Some(BodyFormat::Yaml),
            "application/xml" => Some(BodyFormat::Xml),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BodyFormat::Json => "json",
            BodyFormat::Yaml => "yaml",
            BodyFormat::Xml => "xml",
        }
    }
}

/// Query string or form value: one value or a repeated key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryValue {
    Single(String),
    Multiple(Vec<String>),
}

impl QueryValue {
    /// Add another occurrence of the same key
    pub fn push(&mut self, value: String) {
        match self {
            QueryValue::Single(first) => {
                *self = QueryValue::Multiple(vec![std::mem::take(first), value]);
            }
            QueryValue::Multiple(values) => values.push(value),
        }
    }
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryValue::Single(v) => write!(f, "{}", v),
            QueryValue::Multiple(vs) => write!(f, "{}", vs.join(", ")),
        }
    }
}

/// Ordered key/value parameters of a query string or form body
pub type ParamMap = IndexMap<String, QueryValue>;

/// Decode `application/x-www-form-urlencoded` text, keeping blank values
/// and folding repeated keys into [`QueryValue::Multiple`].
pub fn parse_urlencoded(input: &str) -> ParamMap {
    let mut map = ParamMap::new();
    for (key, value) in url::form_urlencoded::parse(input.as_bytes()) {
        match map.get_mut(&*key) {
            Some(existing) => existing.push(value.into_owned()),
            None => {
                map.insert(key.into_owned(), QueryValue::Single(value.into_owned()));
            }
        }
    }
    map
}

fn body_format_of(headers: &CaseInsensitiveMap) -> Option<BodyFormat> {
    headers
        .get("content-type")
        .and_then(|ct| BodyFormat::from_content_type(ct))
}

fn empty_as_none<T>(map: T, is_empty: impl Fn(&T) -> bool) -> Option<T> {
    if is_empty(&map) {
        None
    } else {
        Some(map)
    }
}

/// Recorded request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RequestRecord", into = "RequestRecord")]
pub struct ExampleRequest {
    pub path: String,
    pub method: String,
    pub headers: CaseInsensitiveMap,
    pub query_strings: ParamMap,
    pub form_params: Option<ParamMap>,
    pub body: Option<String>,
}

impl ExampleRequest {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method: method.into().to_lowercase(),
            headers: CaseInsensitiveMap::new(),
            query_strings: ParamMap::new(),
            form_params: None,
            body: None,
        }
    }

    pub fn body_format(&self) -> Option<BodyFormat> {
        body_format_of(&self.headers)
    }

    /// JSON-decoded body; `None` for other formats or undecodable bodies
    pub fn formatted_body(&self) -> Option<serde_json::Value> {
        match (self.body_format(), self.body.as_deref()) {
            (Some(BodyFormat::Json), Some(body)) => serde_json::from_str(body).ok(),
            _ => None,
        }
    }

    /// Headers as `Name: value` lines
    pub fn headers_text(&self) -> String {
        headers_text(&self.headers)
    }
}

impl fmt::Display for ExampleRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method.to_uppercase(), self.path)?;
        if !self.query_strings.is_empty() {
            let query: Vec<String> = self
                .query_strings
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            write!(f, "?{}", query.join("&"))?;
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
struct RequestRecord {
    path: String,
    method: String,
    #[serde(default)]
    headers: Option<CaseInsensitiveMap>,
    #[serde(default)]
    query_strings: Option<ParamMap>,
    #[serde(default)]
    form_params: Option<ParamMap>,
    #[serde(default)]
    body_format: Option<BodyFormat>,
    #[serde(default)]
    body: Option<String>,
}

impl From<RequestRecord> for ExampleRequest {
    fn from(record: RequestRecord) -> Self {
        Self {
            path: record.path,
            method: record.method.to_lowercase(),
            headers: record.headers.unwrap_or_default(),
            query_strings: record.query_strings.unwrap_or_default(),
            form_params: record.form_params.filter(|f| !f.is_empty()),
            body: record.body,
        }
    }
}

impl From<ExampleRequest> for RequestRecord {
    fn from(request: ExampleRequest) -> Self {
        let body_format = request.body_format();
        Self {
            path: request.path,
            method: request.method,
            headers: empty_as_none(request.headers, CaseInsensitiveMap::is_empty),
            query_strings: empty_as_none(request.query_strings, ParamMap::is_empty),
            form_params: request.form_params.filter(|f| !f.is_empty()),
            body_format,
            body: request.body,
        }
    }
}

/// Recorded response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ResponseRecord", into = "ResponseRecord")]
pub struct ExampleResponse {
    pub status: u16,
    pub reason: Option<String>,
    pub headers: CaseInsensitiveMap,
    pub body: Option<String>,
}

impl ExampleResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            reason: None,
            headers: CaseInsensitiveMap::new(),
            body: None,
        }
    }

    pub fn body_format(&self) -> Option<BodyFormat> {
        body_format_of(&self.headers)
    }

    pub fn formatted_body(&self) -> Option<serde_json::Value> {
        match (self.body_format(), self.body.as_deref()) {
            (Some(BodyFormat::Json), Some(body)) => serde_json::from_str(body).ok(),
            _ => None,
        }
    }

    /// Pretty-printed JSON body, for documentation
    pub fn body_json(&self) -> Option<String> {
        self.formatted_body()
            .and_then(|v| serde_json::to_string_pretty(&v).ok())
    }

    pub fn headers_text(&self) -> String {
        headers_text(&self.headers)
    }

    /// Status line text, e.g. `200 OK`
    pub fn status_line(&self) -> String {
        match &self.reason {
            Some(reason) => format!("{} {}", self.status, reason),
            None => self.status.to_string(),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct ResponseRecord {
    status: u16,
    #[serde(default)]
    reason: Option<String>,
    #[serde(default)]
    headers: Option<CaseInsensitiveMap>,
    #[serde(default)]
    body_format: Option<BodyFormat>,
    #[serde(default)]
    body: Option<String>,
}

impl From<ResponseRecord> for ExampleResponse {
    fn from(record: ResponseRecord) -> Self {
        Self {
            status: record.status,
            reason: record.reason,
            headers: record.headers.unwrap_or_default(),
            body: record.body,
        }
    }
}

impl From<ExampleResponse> for ResponseRecord {
    fn from(response: ExampleResponse) -> Self {
        let body_format = response.body_format();
        Self {
            status: response.status,
            reason: response.reason,
            headers: empty_as_none(response.headers, CaseInsensitiveMap::is_empty),
            body_format,
            body: response.body,
        }
    }
}

fn headers_text(headers: &CaseInsensitiveMap) -> String {
    headers
        .iter()
        .map(|(k, v)| format!("{}: {}", k, v))
        .collect::<Vec<_>>()
        .join("\n")
}

/// One request/response exchange attached to a resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceExample {
    pub request: ExampleRequest,
    pub response: ExampleResponse,
    /// Whether the example appears in generated documentation
    #[serde(default)]
    pub visible: bool,
}

impl ResourceExample {
    pub fn new(request: ExampleRequest, response: ExampleResponse) -> Self {
        Self {
            request,
            response,
            visible: false,
        }
    }

    /// Write the example as JSON
    pub fn dump<P: AsRef<Path>>(&self, path: P) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Read an example written by [`ResourceExample::dump`]
    pub fn load<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}
