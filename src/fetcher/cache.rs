//! SQLite-backed HTTP response cache
//!
//! Responses are keyed by a SHA-256 of the request method and URL. Entries
//! never expire; the only invalidation is [`ResponseCache::clear`].

use crate::fetcher::schema::initialize_schema;
use crate::CacheResult;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use sha2::{Digest, Sha256};
use std::path::Path;

/// A cached response body with its status code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedResponse {
    pub status: u16,
    pub body: Vec<u8>,
    pub fetched_at: String,
}

/// On-disk response cache
pub struct ResponseCache {
    conn: Connection,
}

impl ResponseCache {
    /// Opens or creates the cache database at `path`
    ///
    /// Parent directories are created when missing.
    pub fn open(path: &Path) -> CacheResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
        ",
        )?;
        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory cache
    pub fn in_memory() -> CacheResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Returns the cache key for a request
    pub fn key(method: &str, url: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(method.as_bytes());
        hasher.update(b" ");
        hasher.update(url.as_bytes());
        hex::encode(hasher.finalize())
    }

    pub fn get(&self, method: &str, url: &str) -> CacheResult<Option<CachedResponse>> {
        let response = self
            .conn
            .query_row(
                "SELECT status, body, fetched_at FROM responses WHERE key = ?1",
                params![Self::key(method, url)],
                |row| {
                    Ok(CachedResponse {
                        status: row.get(0)?,
                        body: row.get(1)?,
                        fetched_at: row.get(2)?,
                    })
                },
            )
            .optional()?;

        Ok(response)
    }

    /// Stores a response, replacing any earlier entry for the same request
    pub fn put(&mut self, method: &str, url: &str, status: u16, body: &[u8]) -> CacheResult<()> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT OR REPLACE INTO responses (key, method, url, status, body, fetched_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![Self::key(method, url), method, url, status, body, now],
        )?;
        Ok(())
    }

    /// Removes every cached response, returning how many were dropped
    pub fn clear(&mut self) -> CacheResult<usize> {
        let removed = self.conn.execute("DELETE FROM responses", [])?;
        Ok(removed)
    }

    pub fn len(&self) -> CacheResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM responses", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    pub fn is_empty(&self) -> CacheResult<bool> {
        Ok(self.len()? == 0)
    }
}
