use std::collections::HashMap;
use std::time::Duration;

use dscout_core::Platform;
use tokio::time::Instant;

/// Enforces a minimum delay between consecutive calls to the same platform.
///
/// Owned and applied by the batch runner around each `fetch` invocation, so
/// adapters stay free of timing side effects. Calls to different platforms
/// never wait on each other; the first call to any platform proceeds
/// immediately.
pub struct Pacer {
    min_delay: Duration,
    last_call: HashMap<Platform, Instant>,
}

impl Pacer {
    #[must_use]
    pub fn new(min_delay: Duration) -> Self {
        Self {
            min_delay,
            last_call: HashMap::new(),
        }
    }

    /// Wait until `min_delay` has elapsed since the previous call to
    /// `platform`, then record the new call time.
    pub async fn pace(&mut self, platform: Platform) {
        self.pace_scaled(platform, 1).await;
    }

    /// Like [`Pacer::pace`] but with the delay multiplied by `factor` —
    /// used for the extended wait before a rate-limit retry.
    pub async fn pace_scaled(&mut self, platform: Platform, factor: u32) {
        if let Some(last) = self.last_call.get(&platform) {
            let ready_at = *last + self.min_delay * factor;
            tokio::time::sleep_until(ready_at).await;
        }
        self.last_call.insert(platform, Instant::now());
    }
}
