//! External catalog source adapters
//!
//! Each adapter fetches a bounded list of candidate records from one
//! external catalog API. A failing source reports `SourceError` for itself
//! only; the coordinator keeps going with the remaining sources.

pub mod aggregator;
pub mod huggingface;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::Mutex;

use aidex_common::config::SourceConfig;

use crate::models::CandidateRecord;

pub use aggregator::AggregatorSource;
pub use huggingface::HuggingFaceSource;

const USER_AGENT: &str = "aidex/0.1.0 (https://github.com/aidex/aidex)";

/// Source adapter errors
#[derive(Debug, Error)]
pub enum SourceError {
    /// Fetch failed: network error, timeout, or malformed response
    #[error("Source unavailable: {0}")]
    Unavailable(String),

    /// The source rejected the request for rate limiting
    #[error("Rate limit exceeded")]
    RateLimited,
}

/// One named external catalog
#[async_trait]
pub trait Source: Send + Sync {
    /// Source name as recorded on imported tools and log rows
    fn name(&self) -> &str;

    /// Fetch a bounded list of candidates from the source's public API
    async fn fetch(&self) -> Result<Vec<CandidateRecord>, SourceError>;
}

/// Rate limiter enforcing a minimum interval between requests
pub(crate) struct RateLimiter {
    last_request: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl RateLimiter {
    pub(crate) fn new(min_interval_ms: u64) -> Self {
        Self {
            last_request: Mutex::new(None),
            min_interval: Duration::from_millis(min_interval_ms),
        }
    }

    /// Wait if necessary to comply with the rate limit
    pub(crate) async fn wait(&self) {
        let mut last = self.last_request.lock().await;

        if let Some(last_time) = *last {
            let elapsed = last_time.elapsed();
            if elapsed < self.min_interval {
                let wait_time = self.min_interval - elapsed;
                tracing::debug!("Rate limiting: waiting {:?}", wait_time);
                tokio::time::sleep(wait_time).await;
            }
        }

        *last = Some(Instant::now());
    }
}

/// Build adapters from configured sources
///
/// Unknown kinds are skipped with a warning rather than failing startup.
pub fn build_sources(configs: &[SourceConfig]) -> Vec<Arc<dyn Source>> {
    let mut sources: Vec<Arc<dyn Source>> = Vec::new();

    for config in configs {
        match config.kind.as_str() {
            "huggingface" => match HuggingFaceSource::new(config.clone()) {
                Ok(source) => sources.push(Arc::new(source)),
                Err(e) => tracing::error!(source = %config.name, error = %e, "Failed to build source"),
            },
            "aggregator" => match AggregatorSource::new(config.clone()) {
                Ok(source) => sources.push(Arc::new(source)),
                Err(e) => tracing::error!(source = %config.name, error = %e, "Failed to build source"),
            },
            other => {
                tracing::warn!(source = %config.name, kind = %other, "Unknown source kind, skipping");
            }
        }
    }

    sources
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limiter_creation() {
        let limiter = RateLimiter::new(1000);
        assert_eq!(limiter.min_interval, Duration::from_millis(1000));
    }

    #[tokio::test]
    async fn test_rate_limiter_timing() {
        let limiter = RateLimiter::new(200);

        let start = Instant::now();

        // First request - no wait
        limiter.wait().await;
        let first_elapsed = start.elapsed();

        // Second request - should wait ~200ms
        limiter.wait().await;
        let second_elapsed = start.elapsed();

        assert!(first_elapsed < Duration::from_millis(100));
        assert!(second_elapsed >= Duration::from_millis(150));
    }

    #[test]
    fn test_build_sources_skips_unknown_kind() {
        let configs = vec![SourceConfig {
            name: "mystery".to_string(),
            kind: "gopher".to_string(),
            base_url: "https://example.com".to_string(),
            fetch_limit: 10,
            timeout_secs: 5,
        }];

        assert!(build_sources(&configs).is_empty());
    }
}
