//! V2EX hot-topic adapter.
//!
//! The public V2EX API has no search endpoint, so this adapter pulls the
//! fixed hot-topic feed and filters it client-side: a case-insensitive
//! substring match of the keyword against title and body decides inclusion.
//! The batch runner neither knows nor cares about the difference.

use async_trait::async_trait;
use dscout_core::{AppConfig, DemandSignal, Platform};
use serde::Deserialize;

use crate::error::SourceError;
use crate::http::{build_client, check_status, normalize_base_url};
use crate::source::DemandSource;

const DEFAULT_BASE_URL: &str = "https://www.v2ex.com";

#[derive(Debug, Deserialize)]
struct HotTopic {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    replies: u64,
}

pub struct V2exSource {
    client: reqwest::Client,
    base_url: String,
}

impl V2exSource {
    /// Create an adapter pointed at the production V2EX API.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &AppConfig) -> Result<Self, SourceError> {
        Self::with_base_url(config, DEFAULT_BASE_URL)
    }

    /// Create an adapter with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the HTTP client cannot be built.
    pub fn with_base_url(config: &AppConfig, base_url: &str) -> Result<Self, SourceError> {
        Ok(Self {
            client: build_client(config)?,
            base_url: normalize_base_url(base_url),
        })
    }
}

#[async_trait]
impl DemandSource for V2exSource {
    fn platform(&self) -> Platform {
        Platform::V2ex
    }

    async fn fetch(
        &self,
        keyword: &str,
        limit: usize,
    ) -> Result<Vec<DemandSignal>, SourceError> {
        let url = format!("{}/api/topics/hot.json", self.base_url);
        let response = self.client.get(&url).send().await?;
        let response = check_status(Platform::V2ex, response)?;

        let body = response.text().await?;
        let topics: Vec<HotTopic> =
            serde_json::from_str(&body).map_err(|e| SourceError::ParseFailure {
                context: "v2ex hot feed".to_string(),
                source: e,
            })?;

        let signals = filter_topics(topics, keyword, limit);
        tracing::debug!(keyword, count = signals.len(), "v2ex hot feed filtered");
        Ok(signals)
    }
}

/// Keep topics mentioning the keyword (case-insensitive, title or body),
/// drop blank titles, truncate to `limit`. Replies double as the heat proxy —
/// the feed exposes no follower count.
fn filter_topics(topics: Vec<HotTopic>, keyword: &str, limit: usize) -> Vec<DemandSignal> {
    let needle = keyword.to_lowercase();
    topics
        .into_iter()
        .filter(|topic| {
            topic.title.to_lowercase().contains(&needle)
                || topic.content.to_lowercase().contains(&needle)
        })
        .filter_map(|topic| {
            let title = topic.title.trim().to_string();
            if title.is_empty() {
                return None;
            }
            Some(DemandSignal {
                platform: Platform::V2ex,
                title,
                url: topic.url,
                keyword: keyword.to_string(),
                heat_score: topic.replies,
                reply_count: topic.replies,
            })
        })
        .take(limit)
        .collect()
}
