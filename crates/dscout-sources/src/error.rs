use dscout_core::Platform;
use serde::Serialize;
use thiserror::Error;

/// Failure of a single adapter call.
///
/// Every variant maps onto one of the four outcome kinds the batch runner
/// records (see [`SourceError::kind`]); the variants themselves keep enough
/// context for useful log lines.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Network, DNS, TLS, or timeout failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The platform answered with an unexpected (non-throttle, non-auth)
    /// status, typically 5xx.
    #[error("{platform} unavailable: unexpected HTTP status {status}")]
    Unavailable { platform: Platform, status: u16 },

    /// Missing or rejected credentials. Raised without any network call when
    /// a required token is not configured.
    #[error("{platform} unauthorized: {reason}")]
    Unauthorized { platform: Platform, reason: String },

    /// HTTP 429 or a platform-specific throttle signal.
    #[error("rate limited by {platform} (retry after {retry_after_secs}s)")]
    RateLimited {
        platform: Platform,
        retry_after_secs: u64,
    },

    /// The response body does not match the expected shape.
    #[error("malformed payload from {context}: {source}")]
    ParseFailure {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

/// The outcome-log projection of a [`SourceError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceErrorKind {
    Unavailable,
    Unauthorized,
    RateLimited,
    ParseFailure,
}

impl std::fmt::Display for SourceErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SourceErrorKind::Unavailable => "unavailable",
            SourceErrorKind::Unauthorized => "unauthorized",
            SourceErrorKind::RateLimited => "rate_limited",
            SourceErrorKind::ParseFailure => "parse_failure",
        };
        f.write_str(s)
    }
}

impl SourceError {
    /// Collapse this error to the kind recorded in the outcome log.
    #[must_use]
    pub fn kind(&self) -> SourceErrorKind {
        match self {
            SourceError::Http(_) | SourceError::Unavailable { .. } => SourceErrorKind::Unavailable,
            SourceError::Unauthorized { .. } => SourceErrorKind::Unauthorized,
            SourceError::RateLimited { .. } => SourceErrorKind::RateLimited,
            SourceError::ParseFailure { .. } => SourceErrorKind::ParseFailure,
        }
    }
}
