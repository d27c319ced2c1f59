use serde::Deserialize;
use std::path::PathBuf;
use url::Url;

/// Main configuration structure for Docs-Parser
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sites: SitesConfig,
    pub http: HttpConfig,
    pub paths: PathsConfig,
    pub logging: LoggingConfig,
}

/// Roots of the two scraped sites
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SitesConfig {
    /// Documentation root, relative links are joined against it
    #[serde(rename = "docs-url")]
    pub docs_url: Url,

    /// PEP site root
    #[serde(rename = "peps-url")]
    pub peps_url: Url,
}

impl SitesConfig {
    /// Changelog index of the documentation
    pub fn whats_new_url(&self) -> Result<Url, url::ParseError> {
        self.docs_url.join("whatsnew/")
    }

    /// Page listing downloadable documentation archives
    pub fn download_url(&self) -> Result<Url, url::ParseError> {
        self.docs_url.join("download.html")
    }
}

impl Default for SitesConfig {
    fn default() -> Self {
        Self {
            docs_url: Url::parse("https://docs.python.org/3/").expect("valid default docs URL"),
            peps_url: Url::parse("https://peps.python.org/").expect("valid default PEP URL"),
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Whole-request timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Connection timeout (seconds)
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("docs-parser/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

/// Filesystem locations, all relative to `base_dir` unless absolute
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    #[serde(rename = "base-dir")]
    pub base_dir: String,

    /// SQLite file backing the response cache
    #[serde(rename = "cache-file")]
    pub cache_file: String,

    /// Directory for CSV results
    #[serde(rename = "results-dir")]
    pub results_dir: String,

    /// Directory for downloaded archives
    #[serde(rename = "downloads-dir")]
    pub downloads_dir: String,

    /// Directory for the log file
    #[serde(rename = "log-dir")]
    pub log_dir: String,
}

impl PathsConfig {
    fn resolve(&self, path: &str) -> PathBuf {
        PathBuf::from(&self.base_dir).join(path)
    }

    pub fn cache_path(&self) -> PathBuf {
        self.resolve(&self.cache_file)
    }

    pub fn results_path(&self) -> PathBuf {
        self.resolve(&self.results_dir)
    }

    pub fn downloads_path(&self) -> PathBuf {
        self.resolve(&self.downloads_dir)
    }

    pub fn log_path(&self) -> PathBuf {
        self.resolve(&self.log_dir)
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            base_dir: ".".to_string(),
            cache_file: "parser_cache.sqlite".to_string(),
            results_dir: "results".to_string(),
            downloads_dir: "downloads".to_string(),
            log_dir: "logs".to_string(),
        }
    }
}

/// Log file configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log file name inside the log directory
    #[serde(rename = "file-name")]
    pub file_name: String,

    /// Size above which the log file is rotated at startup
    #[serde(rename = "max-bytes")]
    pub max_bytes: u64,

    /// Number of rotated files kept
    pub backups: u32,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file_name: "parser.log".to_string(),
            max_bytes: 1_000_000,
            backups: 5,
        }
    }
}
