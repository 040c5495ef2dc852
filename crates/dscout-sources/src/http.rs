//! Shared HTTP plumbing for the source adapters.

use std::time::Duration;

use dscout_core::{AppConfig, Platform};
use reqwest::{Client, Response, StatusCode};

use crate::error::SourceError;

/// Fallback `Retry-After` when a 429 response omits the header.
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Build the per-adapter HTTP client: bounded request + connect timeouts so
/// a hung source fails the call rather than stalling the batch.
///
/// # Errors
///
/// Returns [`SourceError::Http`] if the client cannot be constructed.
pub(crate) fn build_client(config: &AppConfig) -> Result<Client, SourceError> {
    let client = Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .connect_timeout(Duration::from_secs(config.request_timeout_secs))
        .user_agent(config.user_agent.clone())
        .build()?;
    Ok(client)
}

/// Map a non-success status to the adapter error taxonomy.
///
/// 429 → `RateLimited` (honoring `Retry-After` when parseable), 401/403 →
/// `Unauthorized`, anything else non-2xx → `Unavailable`. Success statuses
/// pass the response through untouched.
///
/// # Errors
///
/// Returns the mapped [`SourceError`] for any non-2xx status.
pub(crate) fn check_status(platform: Platform, response: Response) -> Result<Response, SourceError> {
    let status = response.status();

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after_secs = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
        return Err(SourceError::RateLimited {
            platform,
            retry_after_secs,
        });
    }

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(SourceError::Unauthorized {
            platform,
            reason: format!("HTTP status {status}"),
        });
    }

    if !status.is_success() {
        return Err(SourceError::Unavailable {
            platform,
            status: status.as_u16(),
        });
    }

    Ok(response)
}

/// Strip trailing slashes so adapters can join paths without doubling them.
pub(crate) fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}
