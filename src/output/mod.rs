//! Output module for rendering extracted tables
//!
//! This module handles:
//! - Plain console lines (fields separated by spaces)
//! - A bordered, left-aligned console table
//! - Timestamped CSV files in the results directory

mod console;
mod file;

pub use console::{format_plain, format_pretty};
pub use file::{file_name, write_csv};

use crate::extract::Table;
use crate::ParserError;
use std::path::{Path, PathBuf};

/// Where a table is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputMode {
    /// One line per record, fields joined by spaces
    #[default]
    #[value(skip)]
    Plain,
    /// Aligned table on the console
    Pretty,
    /// CSV file in the results directory
    File,
}

/// Renders `table` with the selected output mode
///
/// # Arguments
///
/// * `table` - The records to render
/// * `mode_name` - Name of the parser mode, used for the CSV file name
/// * `output` - The selected output mode
/// * `results_dir` - Directory receiving CSV files
///
/// # Returns
///
/// The written file path for [`OutputMode::File`], `None` otherwise
pub fn control_output(
    table: &Table,
    mode_name: &str,
    output: OutputMode,
    results_dir: &Path,
) -> Result<Option<PathBuf>, ParserError> {
    match output {
        OutputMode::Plain => {
            print!("{}", format_plain(table));
            Ok(None)
        }
        OutputMode::Pretty => {
            print!("{}", format_pretty(table));
            Ok(None)
        }
        OutputMode::File => {
            let path = results_dir.join(file_name(mode_name, chrono::Local::now()));
            write_csv(table, &path)?;
            tracing::info!("Results saved to file: {}", path.display());
            Ok(Some(path))
        }
    }
}
