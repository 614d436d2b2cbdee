//! Error types
//!
//! Library-level failures. Annotation problems are not errors: they are
//! collected as [`crate::parse::Warning`] values so a build can finish.

use thiserror::Error;

/// Errors raised by the library API
#[derive(Debug, Error)]
pub enum ApiscribeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid glob pattern `{pattern}`: {reason}")]
    Glob { pattern: String, reason: String },

    #[error("Invalid base URI `{0}`")]
    InvalidBaseUri(String),

    #[error("Unknown generator type: {0}")]
    UnknownGenerator(String),

    /// A typed collection was handed an element of the wrong entity kind
    #[error("item is not of type {expected} (found {found})")]
    TypeMismatch {
        expected: &'static str,
        found: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, ApiscribeError>;

impl ApiscribeError {
    /// Build a [`ApiscribeError::TypeMismatch`] describing a JSON value
    pub fn type_mismatch(expected: &'static str, found: &serde_json::Value) -> Self {
        let found = match found {
            serde_json::Value::Null => "null",
            serde_json::Value::Bool(_) => "boolean",
            serde_json::Value::Number(_) => "number",
            serde_json::Value::String(_) => "string",
            serde_json::Value::Array(_) => "array",
            serde_json::Value::Object(_) => "object",
        };
        ApiscribeError::TypeMismatch {
            expected,
            found: found.to_string(),
        }
    }
}
