use std::time::Duration;

use chrono::Utc;
use dscout_core::{DemandRecord, SearchRequest};
use dscout_sources::{DemandSource, SourceError, SourceErrorKind};
use tokio_util::sync::CancellationToken;

use crate::outcome::{Outcome, PairOutcome, RunResult};
use crate::pacer::Pacer;

/// Multiplier applied to the pacing interval before the single
/// rate-limit retry.
const RATE_LIMIT_RETRY_FACTOR: u32 = 2;

/// Drives one batch run over the keyword × platform matrix.
///
/// Lifecycle per run: Idle (constructed) → Running (inside [`Collector::run`])
/// → Completed (returned). Iteration is keyword-major in request order,
/// platform-minor in the stable order the sources were registered in, each
/// pair attempted exactly once. Adapter calls go through the pacer; a failed
/// call is logged into the outcome log and never halts the run.
pub struct Collector {
    sources: Vec<Box<dyn DemandSource>>,
    pacer: Pacer,
    cancel: CancellationToken,
}

impl Collector {
    #[must_use]
    pub fn new(
        sources: Vec<Box<dyn DemandSource>>,
        pace_delay: Duration,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            sources,
            pacer: Pacer::new(pace_delay),
            cancel,
        }
    }

    /// Run the batch to completion (or until cancelled).
    ///
    /// Cancellation is observed before each pair and during pacing sleeps;
    /// an in-flight fetch always completes, its results are kept, and the
    /// run then returns with `cancelled = true` and a partial outcome log.
    /// `RateLimited` is the one retried failure: a single retry after an
    /// extended pacing delay, after which the failure is final.
    pub async fn run(&mut self, request: &SearchRequest) -> RunResult {
        let started_at = Utc::now();
        let mut records: Vec<DemandRecord> = Vec::new();
        let mut outcomes: Vec<PairOutcome> = Vec::new();
        let mut cancelled = false;

        tracing::info!(
            keywords = request.keywords.len(),
            platforms = self.sources.len(),
            limit = request.limit,
            "starting batch run"
        );

        'run: for keyword in &request.keywords {
            for source in &self.sources {
                let platform = source.platform();

                if self.cancel.is_cancelled() {
                    cancelled = true;
                    break 'run;
                }
                tokio::select! {
                    () = self.cancel.cancelled() => {
                        cancelled = true;
                        break 'run;
                    }
                    () = self.pacer.pace(platform) => {}
                }

                let mut fetched_at = Utc::now();
                let mut result = source.fetch(keyword, request.limit).await;

                let rate_limited_after = match &result {
                    Err(SourceError::RateLimited {
                        retry_after_secs, ..
                    }) => Some(*retry_after_secs),
                    _ => None,
                };
                if let Some(retry_after_secs) = rate_limited_after {
                    tracing::warn!(
                        platform = %platform,
                        keyword = %keyword,
                        retry_after_secs,
                        "rate limited — retrying once after an extended delay"
                    );
                    tokio::select! {
                        () = self.cancel.cancelled() => {
                            outcomes.push(PairOutcome {
                                platform,
                                keyword: keyword.clone(),
                                outcome: Outcome::Failed {
                                    kind: SourceErrorKind::RateLimited,
                                },
                            });
                            cancelled = true;
                            break 'run;
                        }
                        () = self.pacer.pace_scaled(platform, RATE_LIMIT_RETRY_FACTOR) => {}
                    }
                    fetched_at = Utc::now();
                    result = source.fetch(keyword, request.limit).await;
                }

                match result {
                    Ok(signals) => {
                        let count = signals.len();
                        tracing::debug!(
                            platform = %platform,
                            keyword = %keyword,
                            count,
                            "source call succeeded"
                        );
                        records.extend(
                            signals
                                .into_iter()
                                .map(|signal| DemandRecord::stamp(signal, fetched_at)),
                        );
                        outcomes.push(PairOutcome {
                            platform,
                            keyword: keyword.clone(),
                            outcome: Outcome::Success { count },
                        });
                    }
                    Err(e) => {
                        tracing::warn!(
                            platform = %platform,
                            keyword = %keyword,
                            error = %e,
                            "source call failed — continuing with the next pair"
                        );
                        outcomes.push(PairOutcome {
                            platform,
                            keyword: keyword.clone(),
                            outcome: Outcome::Failed { kind: e.kind() },
                        });
                    }
                }
            }
        }

        let finished_at = Utc::now();
        tracing::info!(
            records = records.len(),
            pairs = outcomes.len(),
            cancelled,
            "batch run complete"
        );

        RunResult {
            records,
            outcomes,
            cancelled,
            started_at,
            finished_at,
        }
    }
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;
