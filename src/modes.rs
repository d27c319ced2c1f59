//! Parser modes and their dispatch

use crate::config::Config;
use crate::extract::{self, Table};
use crate::fetcher::Fetcher;
use crate::progress::ProgressReporter;
use crate::reconcile::{Reconciler, StatusExpectationTable};
use crate::{ErrorKind, ParserError};
use std::fmt;
use std::process::ExitCode;

/// What a run extracts
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Mode {
    /// Changelog pages with their titles and authors
    WhatsNew,
    /// Documentation versions and their support status
    LatestVersions,
    /// Download the A4 PDF documentation archive
    Download,
    /// PEP status counts, cross-checked against the index
    Pep,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WhatsNew => "whats-new",
            Self::LatestVersions => "latest-versions",
            Self::Download => "download",
            Self::Pep => "pep",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a mode needs, shared for the length of one run
pub struct RunContext<'a> {
    pub config: &'a Config,
    pub fetcher: &'a Fetcher,
    pub expectations: &'a StatusExpectationTable,
    pub progress: &'a dyn ProgressReporter,
}

/// Runs exactly one mode
///
/// # Returns
///
/// * `Ok(Some(Table))` - Records for the output sink
/// * `Ok(None)` - The mode produced nothing to render
/// * `Err(ParserError)` - The mode failed; see [`ParserError::kind`]
pub async fn run(mode: Mode, ctx: &RunContext<'_>) -> Result<Option<Table>, ParserError> {
    let sites = &ctx.config.sites;

    match mode {
        Mode::WhatsNew => Ok(Some(
            extract::whats_new(ctx.fetcher, sites, ctx.progress).await?,
        )),
        Mode::LatestVersions => Ok(Some(
            extract::latest_versions(ctx.fetcher, sites, ctx.progress).await?,
        )),
        Mode::Download => {
            extract::download(ctx.fetcher, sites, &ctx.config.paths.downloads_path()).await?;
            Ok(None)
        }
        Mode::Pep => {
            let entries = extract::pep_entries(ctx.fetcher, sites, ctx.progress).await?;
            let reconciliation = Reconciler::new(ctx.expectations).reconcile(&entries);

            let table = reconciliation.aggregate.to_table();
            if table.is_none() {
                tracing::info!("No results");
            }
            Ok(table)
        }
    }
}

/// How a finished run maps onto the process exit status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Success => ExitCode::SUCCESS,
            Outcome::Failure => ExitCode::FAILURE,
        }
    }
}

/// Logs a failed run and classifies it
///
/// A recoverable failure (the mode's own index page did not load) ends the
/// run without output but successfully. Anything else is a failure.
pub fn outcome(mode: Mode, result: &Result<Option<Table>, ParserError>) -> Outcome {
    match result {
        Ok(_) => Outcome::Success,
        Err(e) if e.kind() == ErrorKind::Recoverable => {
            tracing::warn!("Mode {} produced no results: {}", mode, e);
            Outcome::Success
        }
        Err(e) => {
            tracing::error!("Mode {} failed: {}", mode, e);
            Outcome::Failure
        }
    }
}
