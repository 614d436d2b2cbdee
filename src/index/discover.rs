//! Source discovery
//!
//! Walks a source tree and keeps the files matching the configured include
//! patterns and none of the exclude patterns. Patterns match paths relative
//! to the walked root.

use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use walkdir::WalkDir;

use crate::error::{ApiscribeError, Result};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

fn compile(patterns: &[String]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|p| {
            Pattern::new(p).map_err(|e| ApiscribeError::Glob {
                pattern: p.clone(),
                reason: e.msg.to_string(),
            })
        })
        .collect()
}

/// Files under `root` selected by the include/exclude globs, sorted by path
pub fn find_files<P: AsRef<Path>>(
    root: P,
    include: &[String],
    exclude: &[String],
) -> Result<Vec<PathBuf>> {
    let root = root.as_ref();
    let include = compile(include)?;
    let exclude = compile(exclude)?;

    let files: Vec<PathBuf> = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            let relative = e
                .path()
                .strip_prefix(root)
                .unwrap_or(e.path())
                .to_string_lossy();

            let included =
                include.is_empty() || include.iter().any(|p| p.matches_with(&relative, MATCH_OPTIONS));
            let excluded = exclude.iter().any(|p| p.matches_with(&relative, MATCH_OPTIONS));
            included && !excluded
        })
        .map(|e| e.into_path())
        .collect();

    tracing::debug!(root = %root.display(), count = files.len(), "discovered source files");
    Ok(files)
}
