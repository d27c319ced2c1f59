//! Docs-Parser: a scraper for the Python documentation and PEP index
//!
//! This crate fetches pages from the Python documentation site and the PEP
//! site, extracts tabular records from their HTML, and cross-checks PEP
//! statuses against the statuses their index category allows.

pub mod config;
pub mod extract;
pub mod fetcher;
pub mod html;
pub mod logging;
pub mod modes;
pub mod output;
pub mod progress;
pub mod reconcile;

use thiserror::Error;

/// Main error type for Docs-Parser operations
#[derive(Debug, Error)]
pub enum ParserError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Unexpected HTTP status {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Tag not found: {query}")]
    TagNotFound { query: String },

    #[error("Page structure not found: {0}")]
    StructureNotFound(String),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// How far an error reaches: the current item, or the whole run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The run for the current mode must stop
    Fatal,
    /// The current item is skipped and the run continues
    Recoverable,
}

impl ParserError {
    /// Classifies the error for call sites that decide between skipping and aborting
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Http { .. } | Self::HttpStatus { .. } => ErrorKind::Recoverable,
            _ => ErrorKind::Fatal,
        }
    }

    pub fn is_recoverable(&self) -> bool {
        self.kind() == ErrorKind::Recoverable
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Response cache errors
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cache lock poisoned")]
    Poisoned,
}

/// Result type alias for Docs-Parser operations
pub type Result<T> = std::result::Result<T, ParserError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for cache operations
pub type CacheResult<T> = std::result::Result<T, CacheError>;

// Re-export commonly used types
pub use config::Config;
pub use extract::{Record, Table};
pub use fetcher::{Fetcher, Page};
pub use modes::Mode;
pub use reconcile::{Reconciler, StatusExpectationTable};
