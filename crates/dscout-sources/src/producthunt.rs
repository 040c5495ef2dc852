//! Product Hunt GraphQL adapter.
//!
//! Requires an API token; without one configured, `fetch` reports
//! `Unauthorized` immediately and performs no network I/O, so a missing
//! credential never blocks the batch. The v2 GraphQL API exposes no keyword
//! search over posts, so recent posts are fetched and filtered client-side
//! against name and tagline.

use async_trait::async_trait;
use dscout_core::{AppConfig, DemandSignal, Platform};
use serde::Deserialize;

use crate::error::SourceError;
use crate::http::{build_client, check_status, normalize_base_url};
use crate::source::DemandSource;

const DEFAULT_BASE_URL: &str = "https://api.producthunt.com";

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: PostsData,
}

#[derive(Debug, Deserialize)]
struct PostsData {
    posts: PostsConnection,
}

#[derive(Debug, Deserialize)]
struct PostsConnection {
    #[serde(default)]
    edges: Vec<PostEdge>,
}

#[derive(Debug, Deserialize)]
struct PostEdge {
    node: PostNode,
}

#[derive(Debug, Deserialize)]
struct PostNode {
    name: Option<String>,
    tagline: Option<String>,
    url: Option<String>,
    #[serde(rename = "votesCount", default)]
    votes_count: u64,
    #[serde(rename = "commentsCount", default)]
    comments_count: u64,
}

pub struct ProductHuntSource {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ProductHuntSource {
    /// Create an adapter pointed at the production Product Hunt API.
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
            token: config.producthunt_token.clone(),
        })
    }
}

#[async_trait]
impl DemandSource for ProductHuntSource {
    fn platform(&self) -> Platform {
        Platform::ProductHunt
    }

    async fn fetch(
        &self,
        keyword: &str,
        limit: usize,
    ) -> Result<Vec<DemandSignal>, SourceError> {
        let Some(token) = &self.token else {
            return Err(SourceError::Unauthorized {
                platform: Platform::ProductHunt,
                reason: "no API token configured (set DSCOUT_PRODUCTHUNT_TOKEN)".to_string(),
            });
        };

        let url = format!("{}/v2/api/graphql", self.base_url);
        let query = format!(
            "{{ posts(first: {limit}) {{ edges {{ node {{ \
             name tagline url votesCount commentsCount }} }} }} }}"
        );
        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&serde_json::json!({ "query": query }))
            .send()
            .await?;
        let response = check_status(Platform::ProductHunt, response)?;

        let body = response.text().await?;
        let parsed: GraphQlResponse =
            serde_json::from_str(&body).map_err(|e| SourceError::ParseFailure {
                context: "producthunt posts query".to_string(),
                source: e,
            })?;

        let signals = filter_posts(parsed.data.posts.edges, keyword, limit);
        tracing::debug!(keyword, count = signals.len(), "producthunt posts filtered");
        Ok(signals)
    }
}

/// Keep posts mentioning the keyword in name or tagline (case-insensitive),
/// drop blank names, truncate to `limit`. Votes are the heat proxy, comments
/// the reply count.
fn filter_posts(edges: Vec<PostEdge>, keyword: &str, limit: usize) -> Vec<DemandSignal> {
    let needle = keyword.to_lowercase();
    edges
        .into_iter()
        .map(|edge| edge.node)
        .filter_map(|node| {
            let title = node.name.unwrap_or_default().trim().to_string();
            if title.is_empty() {
                return None;
            }
            let tagline = node.tagline.unwrap_or_default();
            if !title.to_lowercase().contains(&needle)
                && !tagline.to_lowercase().contains(&needle)
            {
                return None;
            }
            Some(DemandSignal {
                platform: Platform::ProductHunt,
                title,
                url: node.url.unwrap_or_default(),
                keyword: keyword.to_string(),
                heat_score: node.votes_count,
                reply_count: node.comments_count,
            })
        })
        .take(limit)
        .collect()
}
