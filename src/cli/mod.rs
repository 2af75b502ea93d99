//! Command-line interface for corpus-report
//!
//! Provides `authors`, `topics` and `requesters` subcommands.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod authors;
mod requesters;
mod topics;
mod utils;

/// Build author, topic and requester reports from the research document corpus
#[derive(Parser)]
#[command(name = "corpus-report")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (TOML or YAML). Default: discover corpus-report.toml/.yml in the working directory
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the author statistics snapshot (authors_data.json)
    Authors(authors::AuthorsArgs),

    /// Write the topic statistics snapshot with co-occurring pairs (topics_data.json)
    Topics(topics::TopicsArgs),

    /// Render the requester dashboard (requesters.html) from a scraped CSV
    Requesters(requesters::RequestersArgs),
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::from_default_env().add_directive(log_level(cli.verbose).into());
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Authors(args) => authors::run(args, config_path),
        Commands::Topics(args) => topics::run(args, config_path),
        Commands::Requesters(args) => requesters::run(args, config_path),
    }
}

/// Baseline level added to any `RUST_LOG` directives.
fn log_level(verbose: bool) -> Level {
    if verbose {
        Level::DEBUG
    } else {
        Level::WARN
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_log_level_follows_verbose_flag() {
        assert_eq!(log_level(true), Level::DEBUG);
        assert_eq!(log_level(false), Level::WARN);
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }
}
