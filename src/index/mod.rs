//! Indexing
//!
//! Source discovery and the documentation build pipeline.

pub mod discover;
pub mod documentor;

pub use discover::find_files;
pub use documentor::{BuildReport, Documentor};
