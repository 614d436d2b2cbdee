//! Annotation parsing
//!
//! Two passes over a closed set of source files. The first collects every
//! `@apiDefine` into a [`DefinitionTable`]; the second parses `@api` blocks
//! against the complete table, so a definition may be used from any file.
//! Files are lexed in parallel within each pass, results keep file order.

pub mod definition;
pub mod resource;
pub mod tokens;
pub mod warning;

use std::path::Path;

use rayon::prelude::*;

pub use definition::{Definition, DefinitionTable};
pub use resource::{parse_block, BlockParse, ParsedResource, RawParam, Tag};
pub use warning::{Warning, WarningKind};

use crate::config::BlockConfig;
use crate::error::Result;
use crate::lexer::blocks;

/// A source file handed to the parser
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Name used in warnings
    pub filename: String,
    pub content: String,
}

impl SourceFile {
    pub fn new(filename: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
        }
    }

    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        Ok(Self::new(path.to_string_lossy(), content))
    }
}

/// Resources and warnings of a parse run
#[derive(Debug, Clone, Default)]
pub struct ParseOutput {
    pub resources: Vec<ParsedResource>,
    pub warnings: Vec<Warning>,
}

/// Two-pass annotation parser
#[derive(Debug, Clone, Default)]
pub struct Parser {
    delimiters: BlockConfig,
}

impl Parser {
    pub fn new(delimiters: BlockConfig) -> Self {
        Self { delimiters }
    }

    /// Definitions declared in a single source text
    pub fn definitions_in(&self, content: &str) -> Vec<Definition> {
        blocks(content, &self.delimiters)
            .filter_map(|block| Definition::parse(&block.text))
            .collect()
    }

    /// First pass: collect definitions from every file.
    ///
    /// Later files override earlier ones on name clashes.
    pub fn collect_definitions(&self, sources: &[SourceFile]) -> DefinitionTable {
        let per_file: Vec<Vec<Definition>> = sources
            .par_iter()
            .map(|source| self.definitions_in(&source.content))
            .collect();

        let mut table = DefinitionTable::new();
        table.extend(per_file.into_iter().flatten());
        tracing::debug!(count = table.len(), "collected definitions");
        table
    }

    /// Parse the `@api` blocks of a single source file
    pub fn parse_source(&self, source: &SourceFile, definitions: &DefinitionTable) -> ParseOutput {
        let mut output = ParseOutput::default();
        for block in blocks(&source.content, &self.delimiters) {
            let BlockParse { resource, warnings } =
                parse_block(&block, &source.filename, definitions);
            output.resources.extend(resource);
            output.warnings.extend(warnings);
        }
        output
    }

    /// Second pass: parse resources from every file against a complete table
    pub fn parse_resources(
        &self,
        sources: &[SourceFile],
        definitions: &DefinitionTable,
    ) -> ParseOutput {
        let per_file: Vec<ParseOutput> = sources
            .par_iter()
            .map(|source| self.parse_source(source, definitions))
            .collect();

        let mut output = ParseOutput::default();
        for file_output in per_file {
            output.resources.extend(file_output.resources);
            output.warnings.extend(file_output.warnings);
        }

        for warning in &output.warnings {
            warning.log();
        }
        output
    }

    /// Run both passes
    pub fn parse(&self, sources: &[SourceFile]) -> ParseOutput {
        let definitions = self.collect_definitions(sources);
        self.parse_resources(sources, &definitions)
    }
}
