//! Reusable definitions
//!
//! `@apiDefine` blocks declare named fragments of annotation lines that
//! `@apiUse` splices into resource blocks. They are collected from every
//! source file before any resource block is parsed.

use std::collections::HashMap;

const DEFINE_TAG: &str = "@apiDefine";

/// A named annotation fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    pub name: String,
    pub title: Option<String>,
    pub description: Option<String>,
    /// Annotation lines to splice at every `@apiUse`
    pub content: String,
}

impl Definition {
    /// Parse an `@apiDefine` block.
    ///
    /// The first line holds `@apiDefine name [title] [description...]`;
    /// following lines that start with whitespace extend the description and
    /// every other line belongs to the content. Returns `None` when the
    /// block is not a definition or has no name.
    pub fn parse(block: &str) -> Option<Self> {
        let mut lines = block.trim_start().split('\n');
        let header = lines.next()?;

        let mut words = header.split_whitespace();
        if words.next()? != DEFINE_TAG {
            return None;
        }
        let name = words.next()?.to_string();
        let title = words.next().map(str::to_string);
        let mut description: Vec<String> = vec![words.collect::<Vec<_>>().join(" ")];

        let mut content = String::new();
        for line in lines {
            if line.starts_with([' ', '\t']) {
                description.push(line.trim().to_string());
            } else {
                content.push_str(line);
                content.push('\n');
            }
        }

        let description = description.join("\n").trim().to_string();
        Some(Self {
            name,
            title,
            description: (!description.is_empty()).then_some(description),
            content,
        })
    }
}

/// Definitions keyed by name
#[derive(Debug, Clone, Default)]
pub struct DefinitionTable {
    definitions: HashMap<String, Definition>,
}

impl DefinitionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a definition, replacing any with the same name
    pub fn define(&mut self, definition: Definition) {
        if self.definitions.contains_key(&definition.name) {
            tracing::debug!(name = %definition.name, "redefining apiDefine");
        }
        self.definitions.insert(definition.name.clone(), definition);
    }

    /// Case-sensitive lookup
    pub fn lookup(&self, name: &str) -> Option<&Definition> {
        self.definitions.get(name)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl Extend<Definition> for DefinitionTable {
    fn extend<I: IntoIterator<Item = Definition>>(&mut self, iter: I) {
        for definition in iter {
            self.define(definition);
        }
    }
}
