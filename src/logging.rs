//! Logging setup: console plus a size-rotated log file

use crate::config::{LoggingConfig, PathsConfig};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const DT_FORMAT: &str = "%d.%m.%Y %H:%M:%S";

/// Picks the filter for the requested verbosity
pub fn env_filter(verbose: u8, quiet: bool) -> EnvFilter {
    if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("docs_parser=info,warn"),
            1 => EnvFilter::new("docs_parser=debug,info"),
            2 => EnvFilter::new("docs_parser=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    }
}

/// Shifts `path` to `path.1`, `path.1` to `path.2` and so on when it has
/// grown past `max_bytes`. The file numbered `backups` is dropped.
///
/// # Returns
///
/// `true` when a rotation happened
pub fn rotate_if_needed(path: &Path, max_bytes: u64, backups: u32) -> std::io::Result<bool> {
    let size = match std::fs::metadata(path) {
        Ok(meta) => meta.len(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e),
    };

    if size <= max_bytes {
        return Ok(false);
    }

    if backups == 0 {
        std::fs::remove_file(path)?;
        return Ok(true);
    }

    let oldest = backup_path(path, backups);
    if oldest.exists() {
        std::fs::remove_file(&oldest)?;
    }
    for n in (1..backups).rev() {
        let from = backup_path(path, n);
        if from.exists() {
            std::fs::rename(&from, backup_path(path, n + 1))?;
        }
    }
    std::fs::rename(path, backup_path(path, 1))?;

    Ok(true)
}

fn backup_path(path: &Path, n: u32) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(format!(".{}", n));
    PathBuf::from(name)
}

/// Installs the global subscriber
///
/// Console output goes to stderr so it never mixes with rendered tables on
/// stdout. The log file receives the same events without ANSI colours.
pub fn init(
    paths: &PathsConfig,
    config: &LoggingConfig,
    verbose: u8,
    quiet: bool,
) -> std::io::Result<PathBuf> {
    let log_dir = paths.log_path();
    std::fs::create_dir_all(&log_dir)?;

    let log_file = log_dir.join(&config.file_name);
    rotate_if_needed(&log_file, config.max_bytes, config.backups)?;

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)?;

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_timer(ChronoLocal::new(DT_FORMAT.to_string()))
        .with_target(false);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(Mutex::new(file))
        .with_timer(ChronoLocal::new(DT_FORMAT.to_string()))
        .with_ansi(false)
        .with_target(false);

    tracing_subscriber::registry()
        .with(env_filter(verbose, quiet))
        .with(console_layer)
        .with(file_layer)
        .init();

    Ok(log_file)
}
