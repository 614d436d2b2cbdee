//! Parse warnings
//!
//! Problems found in annotation blocks. They never abort a build; each one
//! is collected for the caller to report.

use std::fmt;

use serde::Serialize;

/// Category of an annotation problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum WarningKind {
    /// A required token (method, path, parameter name) is absent
    MissedParameter,
    /// `@apiUse` names a definition that does not exist
    InvalidDefinition,
    /// A tag that may appear once was repeated
    DuplicateApiName,
}

impl WarningKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningKind::MissedParameter => "missed-parameter",
            WarningKind::InvalidDefinition => "invalid-definition",
            WarningKind::DuplicateApiName => "duplicate-api-name",
        }
    }
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A located annotation problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
    pub filename: String,
    /// 1-based source line
    pub line: usize,
}

impl Warning {
    pub fn new(
        kind: WarningKind,
        message: impl Into<String>,
        filename: impl Into<String>,
        line: usize,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            filename: filename.into(),
            line,
        }
    }

    /// Trace the warning at debug level; callers report it to users
    pub fn log(&self) {
        tracing::debug!(
            file = %self.filename,
            line = self.line,
            kind = %self.kind,
            "{}",
            self.message
        );
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: [{}] {}",
            self.filename, self.line, self.kind, self.message
        )
    }
}
