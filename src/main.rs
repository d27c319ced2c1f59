//! Docs-Parser main entry point
//!
//! This is the command-line interface for the Python documentation parser.

use anyhow::Context;
use clap::Parser;
use docs_parser::config::load_config_or_default;
use docs_parser::modes::{self, Mode, Outcome, RunContext};
use docs_parser::output::{control_output, OutputMode};
use docs_parser::progress::{BarProgress, NoProgress, ProgressReporter};
use docs_parser::{logging, Fetcher, StatusExpectationTable};
use std::path::PathBuf;
use std::process::ExitCode;

/// Docs-Parser: Python documentation and PEP parser
///
/// Collects changelog pages, documentation versions and PEP statuses from
/// the Python sites, or downloads the PDF documentation archive.
#[derive(Parser, Debug)]
#[command(name = "docs-parser")]
#[command(version)]
#[command(about = "Python documentation parser", long_about = None)]
struct Cli {
    /// Parser mode
    #[arg(value_enum)]
    mode: Mode,

    /// Clear the response cache before running
    #[arg(short, long)]
    clear_cache: bool,

    /// Additional output formats
    #[arg(short, long, value_enum)]
    output: Option<OutputMode>,

    /// Path to TOML configuration file
    #[arg(long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config = load_config_or_default(cli.config.as_deref())
        .context("Failed to load configuration")?;

    let log_file = logging::init(&config.paths, &config.logging, cli.verbose, cli.quiet)
        .context("Failed to set up logging")?;

    tracing::info!("Parser started");
    tracing::info!("Command line arguments: {:?}", cli);
    tracing::debug!("Logging to {}", log_file.display());

    let fetcher = Fetcher::from_config(&config.http, &config.paths.cache_path())?;
    if cli.clear_cache {
        fetcher.clear_cache()?;
    }

    let expectations = StatusExpectationTable::standard();
    let progress: Box<dyn ProgressReporter> = if cli.quiet {
        Box::new(NoProgress)
    } else {
        Box::new(BarProgress::new())
    };

    let ctx = RunContext {
        config: &config,
        fetcher: &fetcher,
        expectations: &expectations,
        progress: progress.as_ref(),
    };

    let result = modes::run(cli.mode, &ctx).await;
    if let Ok(Some(table)) = &result {
        control_output(
            table,
            cli.mode.as_str(),
            cli.output.unwrap_or_default(),
            &config.paths.results_path(),
        )?;
    }

    let outcome = modes::outcome(cli.mode, &result);
    if outcome == Outcome::Failure {
        return Ok(outcome.into());
    }

    tracing::info!("All jobs done");
    Ok(outcome.into())
}
