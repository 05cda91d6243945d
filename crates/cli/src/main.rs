//! tsgraph CLI - TypeScript declaration linker
//!
//! Links the JSON output of a TypeScript scan into a declaration graph.

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::EnvFilter;
use tsgraph::{link_file, render, LinkOptions, OutputFormat, DEFAULT_SCOPE};

#[derive(Parser)]
#[command(name = "tsgraph")]
#[command(about = "Link TypeScript declarations into a dependency graph")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Link a scan artifact and print the result
    Link {
        /// JSON file produced by the scanner
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Scope token recorded on the scan root node
        #[arg(long, default_value = DEFAULT_SCOPE)]
        scope: String,

        /// Output format, overriding the configuration
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(cli) {
        error!("{err:#}");
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Link {
            input,
            scope,
            format,
        } => {
            let options = LinkOptions {
                config_path: cli.config,
                scope,
                format,
            };
            let outcome = link_file(&input, &options)?;
            println!("{}", render(&outcome, &options.scope)?);
            Ok(())
        }
    }
}

/// Initialize logging system
///
/// `RUST_LOG` takes precedence over `--verbose`.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "tsgraph={level},tsgraph_core={level},tsgraph_linker={level},tsgraph_storage={level}"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
