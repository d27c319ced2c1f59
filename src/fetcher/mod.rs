//! HTTP fetcher backed by the response cache
//!
//! This module handles all HTTP requests for the parser, including:
//! - Building the HTTP client with the configured user agent and timeouts
//! - Serving repeat requests from the on-disk response cache
//! - Decoding every body as UTF-8 regardless of the declared charset
//! - Containing network failures as recoverable errors

mod cache;
mod schema;

pub use cache::{CachedResponse, ResponseCache};

use crate::config::HttpConfig;
use crate::{CacheError, CacheResult, ParserError};
use reqwest::Client;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;
use url::Url;

const GET: &str = "GET";

/// A fetched page body together with the URL it came from
#[derive(Debug, Clone)]
pub struct Page {
    pub url: Url,
    pub body: String,
}

/// Cached HTTP fetcher shared by all extractors of a run
pub struct Fetcher {
    client: Client,
    cache: Mutex<ResponseCache>,
}

/// Builds an HTTP client with the configured identification and timeouts
///
/// # Arguments
///
/// * `config` - The HTTP configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

impl Fetcher {
    pub fn new(client: Client, cache: ResponseCache) -> Self {
        Self {
            client,
            cache: Mutex::new(cache),
        }
    }

    /// Builds a fetcher from configuration with its cache opened at `cache_path`
    pub fn from_config(config: &HttpConfig, cache_path: &Path) -> Result<Self, ParserError> {
        let client = build_http_client(config)?;
        let cache = ResponseCache::open(cache_path)?;
        Ok(Self::new(client, cache))
    }

    /// Drops every cached response
    pub fn clear_cache(&self) -> Result<usize, ParserError> {
        let removed = self.with_cache(|cache| cache.clear())?;
        tracing::info!("Cleared {} cached responses", removed);
        Ok(removed)
    }

    /// Number of responses currently cached
    pub fn cached_len(&self) -> Result<u64, ParserError> {
        Ok(self.with_cache(|cache| cache.len())?)
    }

    /// Fetches a page and decodes it as UTF-8
    ///
    /// Failures are logged with the URL here, so callers only decide whether
    /// a missing page skips an item or ends the mode.
    ///
    /// # Returns
    ///
    /// * `Ok(Page)` - The page, from the cache or the network
    /// * `Err(ParserError)` - A recoverable network or HTTP status failure
    pub async fn fetch(&self, url: &Url) -> Result<Page, ParserError> {
        let bytes = self.fetch_bytes(url).await?;
        Ok(Page {
            url: url.clone(),
            body: decode_utf8(&bytes),
        })
    }

    /// Fetches a resource as raw bytes, going through the cache
    pub async fn fetch_bytes(&self, url: &Url) -> Result<Vec<u8>, ParserError> {
        match self.with_cache(|cache| cache.get(GET, url.as_str())) {
            Ok(Some(cached)) => {
                tracing::debug!(
                    "Cache hit for {} (status {}, stored {})",
                    url,
                    cached.status,
                    cached.fetched_at
                );
                return Ok(cached.body);
            }
            Ok(None) => {}
            Err(e) => tracing::warn!("Cache lookup failed for {}: {}", url, e),
        }

        let (status, body) = match self.request(url).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("Failed to load page {}: {}", url, e);
                return Err(e);
            }
        };

        if let Err(e) = self.with_cache(|cache| cache.put(GET, url.as_str(), status, &body)) {
            tracing::warn!("Failed to cache response for {}: {}", url, e);
        }

        Ok(body)
    }

    async fn request(&self, url: &Url) -> Result<(u16, Vec<u8>), ParserError> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| ParserError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ParserError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|source| ParserError::Http {
            url: url.to_string(),
            source,
        })?;

        Ok((status.as_u16(), body.to_vec()))
    }

    fn with_cache<T>(
        &self,
        f: impl FnOnce(&mut ResponseCache) -> CacheResult<T>,
    ) -> CacheResult<T> {
        let mut cache = self.cache.lock().map_err(|_| CacheError::Poisoned)?;
        f(&mut cache)
    }
}

/// Decodes bytes as UTF-8, ignoring whatever charset the server declared
pub fn decode_utf8(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
