//! Zhihu question search adapter.
//!
//! The only adapter with a true server-side keyword search: `search_v3`
//! accepts the query directly. Zhihu gates this endpoint behind a logged-in
//! session, so 401/403 responses surface as `Unauthorized` rather than
//! `Unavailable` — "source misconfigured" stays distinguishable from "down".

use async_trait::async_trait;
use dscout_core::{AppConfig, DemandSignal, Platform};
use serde::Deserialize;

use crate::error::SourceError;
use crate::http::{build_client, check_status, normalize_base_url};
use crate::source::DemandSource;

const DEFAULT_BASE_URL: &str = "https://www.zhihu.com";

/// One entry of the `search_v3` result list. Only `search_result` items
/// wrapping a `question` object are demand signals; everything else
/// (answers, articles, ads) is skipped.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    #[serde(rename = "type", default)]
    kind: String,
    object: Option<SearchObject>,
}

#[derive(Debug, Deserialize)]
struct SearchObject {
    #[serde(rename = "type", default)]
    kind: String,
    /// Question ids arrive as either a JSON number or a string.
    id: Option<serde_json::Value>,
    title: Option<String>,
    #[serde(default)]
    follower_count: u64,
    #[serde(default)]
    answer_count: u64,
}

pub struct ZhihuSource {
    client: reqwest::Client,
    base_url: String,
}

impl ZhihuSource {
    /// Create an adapter pointed at the production Zhihu API.
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
impl DemandSource for ZhihuSource {
    fn platform(&self) -> Platform {
        Platform::Zhihu
    }

    async fn fetch(
        &self,
        keyword: &str,
        limit: usize,
    ) -> Result<Vec<DemandSignal>, SourceError> {
        let url = format!("{}/api/v4/search_v3", self.base_url);
        let limit_param = limit.to_string();
        let response = self
            .client
            .get(&url)
            .query(&[
                ("t", "general"),
                ("q", keyword),
                ("correction", "1"),
                ("offset", "0"),
                ("limit", limit_param.as_str()),
            ])
            .send()
            .await?;
        let response = check_status(Platform::Zhihu, response)?;

        let body = response.text().await?;
        let parsed: SearchResponse =
            serde_json::from_str(&body).map_err(|e| SourceError::ParseFailure {
                context: format!("zhihu search for \"{keyword}\""),
                source: e,
            })?;

        let signals = normalize(parsed, keyword, limit);
        tracing::debug!(keyword, count = signals.len(), "zhihu search complete");
        Ok(signals)
    }
}

/// Keep question results with a non-empty trimmed title, map the source
/// field names onto the common schema, and truncate to `limit`.
fn normalize(response: SearchResponse, keyword: &str, limit: usize) -> Vec<DemandSignal> {
    response
        .data
        .into_iter()
        .filter(|item| item.kind == "search_result")
        .filter_map(|item| item.object)
        .filter(|object| object.kind == "question")
        .filter_map(|object| {
            let title = object.title.unwrap_or_default().trim().to_string();
            if title.is_empty() {
                return None;
            }
            let url = question_url(object.id.as_ref());
            Some(DemandSignal {
                platform: Platform::Zhihu,
                title,
                url,
                keyword: keyword.to_string(),
                heat_score: object.follower_count,
                reply_count: object.answer_count,
            })
        })
        .take(limit)
        .collect()
}

/// Build the canonical question link; empty when the id is missing.
fn question_url(id: Option<&serde_json::Value>) -> String {
    let id = match id {
        Some(serde_json::Value::String(s)) if !s.is_empty() => s.clone(),
        Some(serde_json::Value::Number(n)) => n.to_string(),
        _ => return String::new(),
    };
    format!("https://www.zhihu.com/question/{id}")
}
