//! Generic aggregator catalog adapter
//!
//! For directory-style catalogs exposing a flat JSON listing endpoint
//! (`GET {base}/tools`). Name and base URL come from configuration, so any
//! number of aggregator instances can be registered as distinct sources.

use serde::Deserialize;
use std::time::Duration;

use aidex_common::config::SourceConfig;

use super::{RateLimiter, Source, SourceError, USER_AGENT};
use crate::models::CandidateRecord;

const RATE_LIMIT_MS: u64 = 500;

/// One listing as returned by an aggregator catalog
#[derive(Debug, Clone, Deserialize)]
pub struct AggregatorEntry {
    pub name: Option<String>,
    pub url: Option<String>,
    pub tagline: Option<String>,
    pub description: Option<String>,
    pub pricing: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub logo: Option<String>,
}

impl From<AggregatorEntry> for CandidateRecord {
    fn from(entry: AggregatorEntry) -> Self {
        CandidateRecord {
            name: entry.name,
            website: entry.url,
            tagline: entry.tagline,
            description: entry.description,
            pricing: entry.pricing,
            tags: entry.tags,
            logo_url: entry.logo,
        }
    }
}

/// Configurable aggregator source adapter
pub struct AggregatorSource {
    config: SourceConfig,
    http_client: reqwest::Client,
    rate_limiter: RateLimiter,
}

impl AggregatorSource {
    pub fn new(config: SourceConfig) -> Result<Self, SourceError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SourceError::Unavailable(e.to_string()))?;

        Ok(Self {
            config,
            http_client,
            rate_limiter: RateLimiter::new(RATE_LIMIT_MS),
        })
    }
}

#[async_trait::async_trait]
impl Source for AggregatorSource {
    fn name(&self) -> &str {
        &self.config.name
    }

    async fn fetch(&self) -> Result<Vec<CandidateRecord>, SourceError> {
        self.rate_limiter.wait().await;

        let url = format!(
            "{}/tools?limit={}",
            self.config.base_url.trim_end_matches('/'),
            self.config.fetch_limit
        );

        tracing::debug!(source = %self.config.name, url = %url, "Querying aggregator catalog");

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| SourceError::Unavailable(e.to_string()))?;

        let status = response.status();

        if status == 429 {
            return Err(SourceError::RateLimited);
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(SourceError::Unavailable(format!(
                "HTTP {}: {}",
                status.as_u16(),
                error_text
            )));
        }

        let entries: Vec<AggregatorEntry> = response
            .json()
            .await
            .map_err(|e| SourceError::Unavailable(format!("Malformed response: {}", e)))?;

        // Cap at fetch_limit even if the endpoint ignores the query param
        let limit = self.config.fetch_limit as usize;

        tracing::info!(
            source = %self.config.name,
            count = entries.len().min(limit),
            "Fetched listings from aggregator"
        );

        Ok(entries
            .into_iter()
            .take(limit)
            .map(CandidateRecord::from)
            .collect())
    }
}
