use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for backend response caching
#[derive(Clone, Debug)]
pub struct CacheConfig {
    pub enabled: bool, // false when --no-cache
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl: Duration::from_secs(6 * 60 * 60),
        }
    }
}

/// Get the platform-appropriate cache directory for movie-oracle
pub fn get_cache_path() -> PathBuf {
    dirs::cache_dir()
        .map(|p| p.join("movie-oracle/responses"))
        .unwrap_or_else(|| {
            PathBuf::from(format!(
                "{}/.cache/movie-oracle/responses",
                std::env::var("HOME").unwrap_or_default()
            ))
        })
}

/// Clear the response cache directory
pub fn clear_cache() -> Result<()> {
    let cache_path = get_cache_path();
    match std::fs::remove_dir_all(&cache_path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).context("Failed to remove cache directory"),
    }
}

/// Serializable representation of one cached response
#[derive(serde::Serialize, serde::Deserialize)]
struct CacheEntry {
    fetched_at: DateTime<Utc>,
    body: String,
}

/// Disk-persistent cache for backend responses, keyed by request.
///
/// The backend aggregates slow third-party APIs, so repeated identical
/// requests within the TTL are served from disk. The cache is opaque to
/// everything above the client: records and scores never live here, only
/// raw response bodies.
#[derive(Clone, Debug)]
pub struct ResponseCache {
    config: CacheConfig,
    cache_path: PathBuf,
}

impl ResponseCache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            cache_path: get_cache_path(),
        }
    }

    /// Cache rooted at an explicit directory, used by tests.
    pub fn with_path(config: CacheConfig, cache_path: PathBuf) -> Self {
        Self { config, cache_path }
    }

    /// Look up a fresh cached body. Expired or unreadable entries miss.
    pub fn get(&self, key: &str) -> Option<String> {
        if !self.config.enabled {
            return None;
        }
        let bytes = cacache::read_sync(&self.cache_path, key).ok()?;
        let entry: CacheEntry = serde_json::from_slice(&bytes).ok()?;

        let age = Utc::now().signed_duration_since(entry.fetched_at);
        let ttl = chrono::Duration::from_std(self.config.ttl).ok()?;
        if age > ttl {
            return None;
        }
        Some(entry.body)
    }

    /// Store a response body. Write failures are ignored: a broken cache
    /// must never break a fetch that already succeeded.
    pub fn put(&self, key: &str, body: &str) {
        if !self.config.enabled {
            return;
        }
        let entry = CacheEntry {
            fetched_at: Utc::now(),
            body: body.to_string(),
        };
        if let Ok(serialized) = serde_json::to_vec(&entry) {
            let _ = cacache::write_sync(&self.cache_path, key, &serialized);
        }
    }
}
