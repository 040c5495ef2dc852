use std::path::PathBuf;

/// Process-wide configuration consumed by the adapters, the batch runner,
/// and the exporter. Built once from the environment at startup and passed
/// in explicitly — no global client/session state.
#[derive(Clone)]
pub struct AppConfig {
    pub log_level: String,
    /// User-Agent sent by every adapter client.
    pub user_agent: String,
    /// Hard per-request timeout; a hung source fails instead of stalling the batch.
    pub request_timeout_secs: u64,
    /// Minimum delay between two consecutive calls to the same platform.
    pub pace_delay_ms: u64,
    /// Directory the result file is written into.
    pub output_dir: PathBuf,
    /// Bearer token for the Product Hunt GraphQL API. Absence is a
    /// configuration condition (the adapter reports `Unauthorized`), not an
    /// error at load time.
    pub producthunt_token: Option<String>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("log_level", &self.log_level)
            .field("user_agent", &self.user_agent)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("pace_delay_ms", &self.pace_delay_ms)
            .field("output_dir", &self.output_dir)
            .field(
                "producthunt_token",
                &self.producthunt_token.as_ref().map(|_| "[redacted]"),
            )
            .finish()
    }
}
