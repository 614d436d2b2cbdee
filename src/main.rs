#![forbid(unsafe_code)]
//! apiscribe command line interface

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use apiscribe::commands::{
    execute_build, execute_check, execute_init, execute_serve, BuildOptions, CheckOptions,
    InitOptions, ServeOptions, ServeSource,
};
use apiscribe::config::CONFIG_FILE;
use apiscribe::Config;

#[derive(Parser)]
#[command(name = "apiscribe")]
#[command(about = "API documentation from annotated docstrings, with a mock server")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, global = true, default_value = CONFIG_FILE)]
    config: PathBuf,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },

    /// Generate documentation from annotated sources
    Build {
        /// Directory holding the annotated sources
        #[arg(default_value = ".")]
        source: PathBuf,

        /// Documentation title
        #[arg(short, long)]
        title: Option<String>,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Base URI of the documented API
        #[arg(short, long)]
        base_uri: Option<String>,

        /// Generator: markdown, json or mock
        #[arg(short, long)]
        generator: Option<String>,

        /// Directory holding recorded examples
        #[arg(long)]
        examples: Option<PathBuf>,
    },

    /// Report annotation warnings without writing output
    Check {
        /// Directory holding the annotated sources
        #[arg(default_value = ".")]
        source: PathBuf,
    },

    /// Serve recorded examples as a mock API
    Serve {
        /// Directory holding the annotated sources
        #[arg(default_value = ".", conflicts_with = "from")]
        source: PathBuf,

        /// Serve a generated index.json / index.mock.json instead of building
        #[arg(long)]
        from: Option<PathBuf>,

        /// Listen host
        #[arg(long, env = "APISCRIBE_HOST")]
        host: Option<String>,

        /// Listen port
        #[arg(short, long, env = "APISCRIBE_PORT")]
        port: Option<u16>,
    },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "apiscribe=debug" } else { "apiscribe=warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Load config
    let config = if cli.config.exists() {
        Config::load(&cli.config)?
    } else {
        Config::default()
    };

    match cli.command {
        Commands::Init { force } => {
            let options = InitOptions {
                path: cli.config,
                force,
            };
            execute_init(options)?;
        }

        Commands::Build {
            source,
            title,
            output,
            base_uri,
            generator,
            examples,
        } => {
            let options = BuildOptions {
                source,
                title,
                output,
                base_uri,
                generator,
                examples,
            };
            execute_build(options, config)?;
        }

        Commands::Check { source } => {
            execute_check(CheckOptions { source }, config)?;
        }

        Commands::Serve {
            source,
            from,
            host,
            port,
        } => {
            let source = match from {
                Some(path) => ServeSource::Document(path),
                None => ServeSource::Sources(source),
            };
            let options = ServeOptions { source, host, port };
            execute_serve(options, config).await?;
        }
    }

    Ok(())
}
