//! Configuration module for Docs-Parser
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file. Every key has a default, so `Config::default()` is a
//! complete configuration pointing at the public Python sites.
//!
//! # Example
//!
//! ```no_run
//! use docs_parser::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("parser.toml")).unwrap();
//! println!("Documentation root: {}", config.sites.docs_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, HttpConfig, LoggingConfig, PathsConfig, SitesConfig};

// Re-export parser functions
pub use parser::{load_config, load_config_or_default, parse_config};
