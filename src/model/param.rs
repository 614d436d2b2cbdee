//! Parameters
//!
//! A single documented parameter. All four transport locations share the
//! same fields; [`ParamKind`] records which bucket the parameter belongs to.

use serde::{Deserialize, Deserializer, Serialize};

/// Where a parameter is carried in the request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    /// Path placeholder
    Url,
    /// Query string
    Query,
    /// Request body field
    #[default]
    Form,
    /// Request header
    Header,
}

impl ParamKind {
    /// Bucket name used in serialized resources
    pub fn bucket(&self) -> &'static str {
        match self {
            ParamKind::Url => "uri_params",
            ParamKind::Query => "query_params",
            ParamKind::Form => "form_params",
            ParamKind::Header => "header_params",
        }
    }

    /// Heading used by renderers
    pub fn label(&self) -> &'static str {
        match self {
            ParamKind::Url => "URL parameters",
            ParamKind::Query => "Query parameters",
            ParamKind::Form => "Form parameters",
            ParamKind::Header => "Header parameters",
        }
    }
}

/// Resolved parameter type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Number,
    Integer,
    Boolean,
    Date,
    File,
}

impl ParamType {
    /// Resolve an annotation type token, case-insensitively and with aliases
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_lowercase().as_str() {
            "string" | "str" => Some(ParamType::String),
            "number" | "decimal" | "float" => Some(ParamType::Number),
            "integer" | "int" => Some(ParamType::Integer),
            "boolean" | "bool" => Some(ParamType::Boolean),
            "date" | "datetime" => Some(ParamType::Date),
            "file" | "bytes" | "io" => Some(ParamType::File),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ParamType::String => "string",
            ParamType::Number => "number",
            ParamType::Integer => "integer",
            ParamType::Boolean => "boolean",
            ParamType::Date => "date",
            ParamType::File => "file",
        }
    }
}

/// One documented parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    /// Bucket of the parameter; implied by the list it is serialized in
    #[serde(skip)]
    pub kind: ParamKind,

    pub name: String,

    #[serde(default)]
    pub display_name: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    /// Type token as written in the annotation
    #[serde(default, rename = "type")]
    pub type_name: Option<String>,

    #[serde(default, rename = "enum")]
    pub enum_values: Option<Vec<String>>,

    #[serde(default)]
    pub pattern: Option<String>,

    #[serde(default)]
    pub min_length: Option<u64>,

    #[serde(default)]
    pub max_length: Option<u64>,

    #[serde(default)]
    pub minimum: Option<f64>,

    #[serde(default)]
    pub maximum: Option<f64>,

    #[serde(default)]
    pub example: Option<String>,

    #[serde(default)]
    pub repeat: bool,

    #[serde(default)]
    pub required: bool,

    #[serde(default)]
    pub default: Option<String>,
}

impl Param {
    /// Create a parameter of the given kind.
    ///
    /// URL parameters are required unless stated otherwise.
    pub fn new(kind: ParamKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            display_name: None,
            description: None,
            type_name: None,
            enum_values: None,
            pattern: None,
            min_length: None,
            max_length: None,
            minimum: None,
            maximum: None,
            example: None,
            repeat: false,
            required: kind == ParamKind::Url,
            default: None,
        }
    }

    pub fn url(name: impl Into<String>) -> Self {
        Self::new(ParamKind::Url, name)
    }

    pub fn query(name: impl Into<String>) -> Self {
        Self::new(ParamKind::Query, name)
    }

    pub fn form(name: impl Into<String>) -> Self {
        Self::new(ParamKind::Form, name)
    }

    pub fn header(name: impl Into<String>) -> Self {
        Self::new(ParamKind::Header, name)
    }

    pub fn with_type(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Resolved type; `None` means unspecified (treated as string)
    pub fn param_type(&self) -> Option<ParamType> {
        self.type_name.as_deref().and_then(ParamType::from_token)
    }
}

/// Deserialize one parameter bucket, tagging every entry with its kind
pub(crate) fn deserialize_bucket<'de, D>(
    deserializer: D,
    kind: ParamKind,
) -> Result<Vec<Param>, D::Error>
where
    D: Deserializer<'de>,
{
    let params = Option::<Vec<Param>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(params
        .into_iter()
        .map(|mut p| {
            p.kind = kind;
            p
        })
        .collect())
}
