//! Init command
//!
//! Implements `apiscribe init`: write a default configuration file.

use std::path::PathBuf;

use anyhow::Result;
use console::style;

use crate::config::{Config, CONFIG_FILE};

/// Options for the init command
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// Config file to create
    pub path: PathBuf,
    /// Force overwrite existing config
    pub force: bool,
}

impl Default for InitOptions {
    fn default() -> Self {
        Self {
            path: PathBuf::from(CONFIG_FILE),
            force: false,
        }
    }
}

/// Execute the init command
pub fn execute_init(options: InitOptions) -> Result<()> {
    if options.path.exists() && !options.force {
        eprintln!(
            "{} Config file already exists. Use --force to overwrite.",
            style("✗").red()
        );
        std::process::exit(1);
    }

    Config::default().save(&options.path)?;
    println!("{} Created {}", style("✓").green(), options.path.display());

    println!("\n{}", style("Next steps:").bold());
    println!("  1. Adjust {} to your project", style("include").cyan());
    println!(
        "  2. Run {} to generate documentation",
        style("apiscribe build <src>").cyan()
    );
    println!(
        "  3. Run {} to start the mock server",
        style("apiscribe serve <src>").cyan()
    );

    Ok(())
}
