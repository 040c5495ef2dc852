use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A platform dscout knows how to query.
///
/// The declaration order is the stable iteration order used by the batch
/// runner when walking the platform set for each keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Zhihu,
    V2ex,
    ProductHunt,
}

impl Platform {
    /// All registered platforms in stable order.
    pub const ALL: [Platform; 3] = [Platform::Zhihu, Platform::V2ex, Platform::ProductHunt];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Zhihu => "zhihu",
            Platform::V2ex => "v2ex",
            Platform::ProductHunt => "producthunt",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown platform \"{0}\" (expected zhihu, v2ex, or producthunt)")]
pub struct UnknownPlatform(String);

impl std::str::FromStr for Platform {
    type Err = UnknownPlatform;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "zhihu" => Ok(Platform::Zhihu),
            "v2ex" => Ok(Platform::V2ex),
            "producthunt" => Ok(Platform::ProductHunt),
            _ => Err(UnknownPlatform(s.to_string())),
        }
    }
}

/// A single normalized demand signal as returned by a source adapter.
///
/// Adapters fully populate every field; items whose title is empty after
/// trimming never leave the adapter. The discovery timestamp is deliberately
/// absent — it belongs to the batch runner, which stamps it at fetch time
/// (see [`DemandRecord::stamp`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemandSignal {
    pub platform: Platform,
    /// Trimmed, non-empty headline of the question/topic/product.
    pub title: String,
    /// Canonical link; empty when the source has none.
    pub url: String,
    /// The query that produced this signal.
    pub keyword: String,
    /// Source-specific popularity proxy (followers, replies, votes).
    pub heat_score: u64,
    pub reply_count: u64,
}

/// The persisted record shape: a [`DemandSignal`] plus the discovery
/// timestamp. Field declaration order doubles as the export column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemandRecord {
    pub platform: Platform,
    pub title: String,
    pub url: String,
    pub keyword: String,
    pub heat_score: u64,
    pub reply_count: u64,
    #[serde(with = "discovered_at_format")]
    pub discovered_at: DateTime<Utc>,
}

impl DemandRecord {
    /// Export column names, in order.
    pub const COLUMNS: [&'static str; 7] = [
        "platform",
        "title",
        "url",
        "keyword",
        "heat_score",
        "reply_count",
        "discovered_at",
    ];

    /// Promote an adapter signal into a persisted record, stamping the
    /// discovery time supplied by the batch runner.
    #[must_use]
    pub fn stamp(signal: DemandSignal, discovered_at: DateTime<Utc>) -> Self {
        Self {
            platform: signal.platform,
            title: signal.title,
            url: signal.url,
            keyword: signal.keyword,
            heat_score: signal.heat_score,
            reply_count: signal.reply_count,
            discovered_at,
        }
    }
}

/// `discovered_at` serializes as `YYYY-MM-DD HH:MM:SS` (UTC) so spreadsheet
/// consumers see a plain sortable timestamp rather than RFC 3339.
mod discovered_at_format {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{self, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let naive =
            NaiveDateTime::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom)?;
        Ok(naive.and_utc())
    }
}

/// One batch run's worth of input: which keywords to search, on which
/// platforms, and how many results to keep per (keyword, platform) call.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    /// Searched in order; duplicates are allowed and processed independently.
    pub keywords: Vec<String>,
    /// Deduplicated and held in stable [`Platform`] order.
    pub platforms: Vec<Platform>,
    /// Per-call result cap; adapters may return fewer, never more.
    pub limit: usize,
}

impl SearchRequest {
    pub const DEFAULT_LIMIT: usize = 10;

    /// Build a request, normalizing the platform set (dedup + stable order).
    #[must_use]
    pub fn new(keywords: Vec<String>, platforms: &[Platform], limit: usize) -> Self {
        let mut platforms: Vec<Platform> = platforms.to_vec();
        platforms.sort_unstable();
        platforms.dedup();
        Self {
            keywords,
            platforms,
            limit,
        }
    }

    /// Total number of (keyword, platform) pairs this request will attempt.
    #[must_use]
    pub fn pair_count(&self) -> usize {
        self.keywords.len() * self.platforms.len()
    }
}

/// The stock keyword list used when the caller supplies none: generic
/// tool-discovery phrases aimed at surfacing "what tool do people wish
/// existed" threads.
#[must_use]
pub fn default_keywords() -> Vec<String> {
    [
        "有什么好用的工具",
        "效率工具推荐",
        "在线工具",
        "免费工具",
        "开发工具",
        "设计工具",
        "数据处理工具",
        "文件转换工具",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}
