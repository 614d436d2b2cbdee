//! Check command
//!
//! Implements `apiscribe check`: run both parse passes and report every
//! annotation warning. Exits with status 1 when any warning was raised.

use std::path::PathBuf;

use anyhow::Result;
use console::style;

use super::output::print_warnings;
use crate::config::Config;
use crate::index::Documentor;

/// Options for the check command
#[derive(Debug, Clone)]
pub struct CheckOptions {
    /// Directory holding the annotated sources
    pub source: PathBuf,
}

/// Execute the check command
pub fn execute_check(options: CheckOptions, config: Config) -> Result<()> {
    let report = Documentor::new(config).scan(&options.source)?;

    if report.warnings.is_empty() {
        println!(
            "{} {} files, {} resources, no warnings",
            style("✓").green(),
            report.files.len(),
            report.root.resources.documented().count()
        );
        return Ok(());
    }

    print_warnings(&report.warnings);
    eprintln!(
        "{} Annotation check failed in {}",
        style("✗").red(),
        options.source.display()
    );
    std::process::exit(1);
}
