#![forbid(unsafe_code)]

//! # apiscribe
//!
//! API documentation extracted from annotated docstrings.
//!
//! Source files are scanned for delimited annotation blocks (`@api`,
//! `@apiParam`, `@apiUse` and friends). Each block describing an endpoint
//! becomes a [`Resource`] in a [`ResourceRegistry`]; the registry is then
//! rendered by a [`Generator`] or replayed by the [`MockResponder`], which
//! answers requests with the best-fitting recorded example.
//!
//! ## Example
//!
//! ```rust,no_run
//! use apiscribe::{Config, Documentor, GeneratorKind};
//!
//! fn main() -> anyhow::Result<()> {
//!     let documentor = Documentor::new(Config::default());
//!     let report = documentor.build("src")?;
//!
//!     for warning in &report.warnings {
//!         eprintln!("{}", warning);
//!     }
//!     documentor.generate(&report, GeneratorKind::Markdown.generator().as_ref(), "docs")?;
//!     Ok(())
//! }
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod examples_store;
pub mod generate;
pub mod index;
pub mod lexer;
pub mod mock;
pub mod model;
pub mod parse;

// Re-exports
pub use config::Config;
pub use error::{ApiscribeError, Result};
pub use examples_store::ExampleStore;
pub use generate::{Generator, GeneratorKind, JsonGenerator, MarkdownGenerator, MockGenerator};
pub use index::{BuildReport, Documentor};
pub use mock::MockResponder;
pub use model::{
    CaseInsensitiveMap, Document, DocumentationRoot, ExampleRequest, ExampleResponse, Param,
    ParamKind, ParamType, Resource, ResourceExample, ResourceRegistry,
};
pub use parse::{DefinitionTable, Parser, SourceFile, Warning, WarningKind};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
