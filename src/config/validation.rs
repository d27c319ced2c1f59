use crate::config::types::{Config, HttpConfig, LoggingConfig, PathsConfig, SitesConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_sites_config(&config.sites)?;
    validate_http_config(&config.http)?;
    validate_paths_config(&config.paths)?;
    validate_logging_config(&config.logging)?;
    Ok(())
}

fn validate_sites_config(config: &SitesConfig) -> Result<(), ConfigError> {
    validate_site_root("docs-url", &config.docs_url)?;
    validate_site_root("peps-url", &config.peps_url)?;
    Ok(())
}

/// Site roots are join bases, so they must be http(s) and end in '/'
fn validate_site_root(key: &str, url: &Url) -> Result<(), ConfigError> {
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} must use http or https, got '{}'",
            key, url
        )));
    }

    if !url.path().ends_with('/') {
        return Err(ConfigError::InvalidUrl(format!(
            "{} must end with '/', got '{}'",
            key, url
        )));
    }

    Ok(())
}

fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "timeout-secs must be >= 1".to_string(),
        ));
    }

    if config.connect_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "connect-timeout-secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

fn validate_paths_config(config: &PathsConfig) -> Result<(), ConfigError> {
    for (key, value) in [
        ("base-dir", &config.base_dir),
        ("cache-file", &config.cache_file),
        ("results-dir", &config.results_dir),
        ("downloads-dir", &config.downloads_dir),
        ("log-dir", &config.log_dir),
    ] {
        if value.is_empty() {
            return Err(ConfigError::Validation(format!("{} cannot be empty", key)));
        }
    }

    Ok(())
}

fn validate_logging_config(config: &LoggingConfig) -> Result<(), ConfigError> {
    if config.file_name.is_empty() {
        return Err(ConfigError::Validation(
            "file-name cannot be empty".to_string(),
        ));
    }

    if config.max_bytes == 0 {
        return Err(ConfigError::Validation(
            "max-bytes must be >= 1".to_string(),
        ));
    }

    Ok(())
}
