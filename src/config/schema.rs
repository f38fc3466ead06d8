use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::backend::CacheConfig;
use crate::scoring::ScoringConfig;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8080";

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    /// Base URL of the Movie Oracle backend.
    #[serde(default)]
    pub backend_url: Option<String>,

    /// Oracle scoring overrides; omitted sections use the canonical
    /// defaults.
    #[serde(default)]
    pub scoring: Option<ScoringConfig>,

    /// Response cache settings.
    #[serde(default)]
    pub cache: Option<CacheSettings>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct CacheSettings {
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Time-to-live for cached backend responses, humantime format
    /// (e.g. "30m", "6h", "2d").
    #[serde(default)]
    pub ttl: Option<String>,
}

impl Config {
    pub fn backend_url(&self) -> &str {
        self.backend_url.as_deref().unwrap_or(DEFAULT_BACKEND_URL)
    }

    /// Resolve the effective cache configuration. `no_cache` (the CLI
    /// flag) wins over anything in the file.
    pub fn cache_config(&self, no_cache: bool) -> Result<CacheConfig> {
        let mut config = CacheConfig::default();
        if let Some(settings) = &self.cache {
            if let Some(enabled) = settings.enabled {
                config.enabled = enabled;
            }
            if let Some(ttl) = &settings.ttl {
                config.ttl = humantime::parse_duration(ttl)
                    .with_context(|| format!("cache.ttl: invalid duration '{}'", ttl))?;
            }
        }
        if no_cache {
            config.enabled = false;
        }
        Ok(config)
    }
}
