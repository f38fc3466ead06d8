use anyhow::{anyhow, Context, Result};
use std::time::Duration;
use tokio_retry::{strategy::ExponentialBackoff, Retry};

use super::cache::ResponseCache;
use super::types::{DiscoverResponse, MovieRecord, SearchResponse};

/// HTTP client for the Movie Oracle aggregation backend.
///
/// The backend does the heavy lifting (TMDb/OMDb aggregation, LLM ranking);
/// this client only issues requests, retries transient failures, and hands
/// raw JSON through the response cache.
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
    cache: ResponseCache,
}

/// Create a backend client for the given base URL
pub fn create_client(base_url: &str, cache: ResponseCache) -> Result<BackendClient> {
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .context("Failed to create HTTP client")?;

    Ok(BackendClient {
        http,
        base_url: base_url.trim_end_matches('/').to_string(),
        cache,
    })
}

impl BackendClient {
    /// Natural-language search. The backend interprets the query with its
    /// reasoning step, so one request can take several seconds on a cache
    /// miss.
    pub async fn search(&self, query: &str) -> Result<SearchResponse> {
        let url = format!("{}/api/search", self.base_url);
        let cache_key = format!("{}#q={}", url, query);

        if let Some(body) = self.cache.get(&cache_key) {
            return parse_body(&body);
        }

        let payload = serde_json::json!({ "query": query });
        let body = Retry::spawn(retry_strategy(), || async {
            let response = self
                .http
                .post(&url)
                .json(&payload)
                .send()
                .await
                .map_err(|e| transport_error(&self.base_url, e))?;
            read_body(response).await
        })
        .await?;

        self.cache.put(&cache_key, &body);
        parse_body(&body)
    }

    /// Curated discover feed: trending, now playing, top rated, upcoming.
    pub async fn discover(&self) -> Result<DiscoverResponse> {
        let body = self.get_cached(&format!("{}/api/discover", self.base_url)).await?;
        parse_body(&body)
    }

    /// Full detail record for one movie.
    pub async fn details(&self, tmdb_id: u64) -> Result<MovieRecord> {
        let body = self
            .get_cached(&format!("{}/api/details/{}", self.base_url, tmdb_id))
            .await?;
        parse_body(&body)
    }

    async fn get_cached(&self, url: &str) -> Result<String> {
        if let Some(body) = self.cache.get(url) {
            return Ok(body);
        }

        let body = Retry::spawn(retry_strategy(), || async {
            let response = self
                .http
                .get(url)
                .send()
                .await
                .map_err(|e| transport_error(&self.base_url, e))?;
            read_body(response).await
        })
        .await?;

        self.cache.put(url, &body);
        Ok(body)
    }
}

// Retry strategy: exponential backoff with 3 attempts
fn retry_strategy() -> impl Iterator<Item = Duration> {
    ExponentialBackoff::from_millis(100)
        .max_delay(Duration::from_secs(5))
        .take(3)
}

fn transport_error(base_url: &str, e: reqwest::Error) -> anyhow::Error {
    if e.is_connect() {
        anyhow!(
            "Could not reach the backend at {}. Is it running? (set backend_url in the config to change it)",
            base_url
        )
    } else if e.is_timeout() {
        anyhow!("Backend request timed out. The upstream movie APIs may be slow right now.")
    } else {
        anyhow!("Backend request failed: {}", e)
    }
}

async fn read_body(response: reqwest::Response) -> Result<String> {
    let status = response.status();
    if status.is_success() {
        return response
            .text()
            .await
            .context("Failed to read backend response body");
    }

    let detail = response.text().await.unwrap_or_default();
    match status.as_u16() {
        400 => Err(anyhow!("Backend rejected the request: {}", detail)),
        404 => Err(anyhow!("Movie not found")),
        502 => Err(anyhow!(
            "Backend upstream error (TMDb/OMDb or the reasoning service): {}",
            detail
        )),
        _ => Err(anyhow!("Backend returned {}: {}", status, detail)),
    }
}

fn parse_body<T: serde::de::DeserializeOwned>(body: &str) -> Result<T> {
    serde_json::from_str(body).context("Failed to parse backend response")
}
