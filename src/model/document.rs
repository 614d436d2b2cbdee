//! Free-form documents rendered alongside resources

use serde::{Deserialize, Serialize};

/// A titled prose document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
}

impl Document {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: Some(content.into()),
        }
    }

    /// Snake-cased title with anything else replaced by `-`
    pub fn filename(&self) -> String {
        let mut name = String::new();
        let mut previous_lower = false;
        for ch in self.title.trim().chars() {
            if ch.is_uppercase() && previous_lower {
                name.push('_');
            }
            previous_lower = ch.is_lowercase() || ch.is_ascii_digit();
            for lower in ch.to_lowercase() {
                name.push(if lower.is_alphanumeric() || lower == '_' {
                    lower
                } else {
                    '-'
                });
            }
        }
        name
    }

    /// Build a document from its serialized form
    pub fn from_value(value: serde_json::Value) -> crate::Result<Self> {
        let is_document = value
            .as_object()
            .is_some_and(|o| o.get("title").is_some_and(|t| t.is_string()));
        if !is_document {
            return Err(crate::ApiscribeError::type_mismatch("Document", &value));
        }
        Ok(serde_json::from_value(value)?)
    }
}

/// Build a document list from a serialized array, rejecting non-documents
pub fn documents_from_value(value: serde_json::Value) -> crate::Result<Vec<Document>> {
    match value {
        serde_json::Value::Null => Ok(Vec::new()),
        serde_json::Value::Array(items) => items.into_iter().map(Document::from_value).collect(),
        other => Err(crate::ApiscribeError::type_mismatch("Document", &other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_filename() {
        assert_eq!(Document::new("Getting Started", "").filename(), "getting-started");
        assert_eq!(Document::new("HowTo", "").filename(), "how_to");
        assert_eq!(Document::new("Rate limits (v2)", "").filename(), "rate-limits--v2-");
    }

    #[test]
    fn test_documents_from_value() {
        let docs = documents_from_value(json!([{"title": "Intro", "content": "Hi"}])).unwrap();
        assert_eq!(docs, vec![Document::new("Intro", "Hi")]);

        let err = documents_from_value(json!([{"path": "/user", "method": "get"}])).unwrap_err();
        assert!(matches!(
            err,
            crate::ApiscribeError::TypeMismatch { expected: "Document", .. }
        ));
    }
}
