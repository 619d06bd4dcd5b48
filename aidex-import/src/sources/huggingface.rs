//! Hugging Face Spaces catalog adapter
//!
//! Pulls public Spaces from the Hub API and maps them to candidate tool
//! records. Spaces are hosted demos, so candidates always resolve to a
//! `huggingface.co/spaces/...` website.

use serde::Deserialize;
use std::time::Duration;

use aidex_common::config::SourceConfig;

use super::{RateLimiter, Source, SourceError, USER_AGENT};
use crate::models::CandidateRecord;

const RATE_LIMIT_MS: u64 = 1000; // 1 request per second

/// Hub API space entry (subset of fields we consume)
#[derive(Debug, Clone, Deserialize)]
pub struct HfSpace {
    /// Space id in "owner/name" form
    pub id: String,
    #[serde(rename = "cardData")]
    pub card_data: Option<HfCardData>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Space card metadata
#[derive(Debug, Clone, Deserialize)]
pub struct HfCardData {
    pub title: Option<String>,
    pub short_description: Option<String>,
}

/// Hugging Face Spaces source adapter
pub struct HuggingFaceSource {
    config: SourceConfig,
    http_client: reqwest::Client,
    rate_limiter: RateLimiter,
}

impl HuggingFaceSource {
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

    fn map_space(&self, space: HfSpace) -> CandidateRecord {
        let name = space
            .card_data
            .as_ref()
            .and_then(|c| c.title.clone())
            .or_else(|| space.id.split('/').last().map(str::to_string));

        let website = Some(format!(
            "{}/spaces/{}",
            self.config.base_url.trim_end_matches('/'),
            space.id
        ));

        let tagline = space.card_data.and_then(|c| c.short_description);

        // Hub pipeline/runtime tags are noise for a directory listing
        let tags = space
            .tags
            .into_iter()
            .filter(|t| !t.contains(':'))
            .collect();

        CandidateRecord {
            name,
            website,
            tagline,
            description: None,
            pricing: Some("free".to_string()),
            tags,
            logo_url: None,
        }
    }
}

#[async_trait::async_trait]
impl Source for HuggingFaceSource {
    fn name(&self) -> &str {
        &self.config.name
    }

    async fn fetch(&self) -> Result<Vec<CandidateRecord>, SourceError> {
        self.rate_limiter.wait().await;

        let url = format!(
            "{}/api/spaces?limit={}&full=true",
            self.config.base_url.trim_end_matches('/'),
            self.config.fetch_limit
        );

        tracing::debug!(source = %self.config.name, url = %url, "Querying Hugging Face Hub API");

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

        let spaces: Vec<HfSpace> = response
            .json()
            .await
            .map_err(|e| SourceError::Unavailable(format!("Malformed response: {}", e)))?;

        tracing::info!(
            source = %self.config.name,
            count = spaces.len(),
            "Fetched spaces from Hugging Face Hub"
        );

        Ok(spaces.into_iter().map(|s| self.map_space(s)).collect())
    }
}
