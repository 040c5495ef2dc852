use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use dscout_core::{DemandSignal, Platform, SearchRequest};
use tokio_util::sync::CancellationToken;

use super::*;
use crate::outcome::Outcome;

type Scripted = Result<Vec<DemandSignal>, SourceError>;

/// Test source that pops one canned reply per fetch call. Replies beyond
/// the script are empty successes. Optionally cancels a token from inside
/// `fetch`, modeling cancellation arriving while a call is in flight.
struct ScriptedSource {
    platform: Platform,
    script: Mutex<VecDeque<Scripted>>,
    calls: Arc<AtomicUsize>,
    cancel_on_call: Option<CancellationToken>,
}

#[async_trait]
impl DemandSource for ScriptedSource {
    fn platform(&self) -> Platform {
        self.platform
    }

    async fn fetch(
        &self,
        _keyword: &str,
        _limit: usize,
    ) -> Result<Vec<DemandSignal>, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(token) = &self.cancel_on_call {
            token.cancel();
        }
        self.script
            .lock()
            .expect("script mutex")
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

fn signal(platform: Platform, title: &str, keyword: &str) -> DemandSignal {
    DemandSignal {
        platform,
        title: title.to_string(),
        url: format!("https://example.com/{title}"),
        keyword: keyword.to_string(),
        heat_score: 1,
        reply_count: 1,
    }
}

fn scripted(platform: Platform, script: Vec<Scripted>) -> Box<dyn DemandSource> {
    Box::new(ScriptedSource {
        platform,
        script: Mutex::new(script.into()),
        calls: Arc::new(AtomicUsize::new(0)),
        cancel_on_call: None,
    })
}

fn scripted_counted(
    platform: Platform,
    script: Vec<Scripted>,
) -> (Box<dyn DemandSource>, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let source = Box::new(ScriptedSource {
        platform,
        script: Mutex::new(script.into()),
        calls: Arc::clone(&calls),
        cancel_on_call: None,
    });
    (source, calls)
}

fn request(keywords: &[&str], platforms: &[Platform]) -> SearchRequest {
    SearchRequest::new(
        keywords.iter().map(|k| (*k).to_string()).collect(),
        platforms,
        10,
    )
}

fn collector(sources: Vec<Box<dyn DemandSource>>) -> Collector {
    Collector::new(
        sources,
        Duration::from_millis(2000),
        CancellationToken::new(),
    )
}

fn rate_limited(platform: Platform) -> SourceError {
    SourceError::RateLimited {
        platform,
        retry_after_secs: 1,
    }
}

#[tokio::test(start_paused = true)]
async fn single_pair_accumulates_all_returned_records() {
    let sources = vec![scripted(
        Platform::Zhihu,
        vec![Ok(vec![
            signal(Platform::Zhihu, "t1", "foo"),
            signal(Platform::Zhihu, "t2", "foo"),
            signal(Platform::Zhihu, "t3", "foo"),
        ])],
    )];
    let mut collector = collector(sources);

    let result = collector.run(&request(&["foo"], &[Platform::Zhihu])).await;

    assert_eq!(result.records.len(), 3);
    assert!(result
        .records
        .iter()
        .all(|r| r.keyword == "foo" && r.platform == Platform::Zhihu));
    let titles: Vec<&str> = result.records.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, ["t1", "t2", "t3"], "adapter order is preserved");
    assert_eq!(result.outcomes.len(), 1);
    assert_eq!(result.outcomes[0].outcome, Outcome::Success { count: 3 });
    assert!(!result.cancelled);
}

#[tokio::test(start_paused = true)]
async fn records_are_stamped_within_the_run_window() {
    let sources = vec![scripted(
        Platform::V2ex,
        vec![Ok(vec![signal(Platform::V2ex, "t", "k")])],
    )];
    let mut collector = collector(sources);

    let result = collector.run(&request(&["k"], &[Platform::V2ex])).await;

    for record in &result.records {
        assert!(record.discovered_at >= result.started_at);
        assert!(record.discovered_at <= result.finished_at);
    }
}

#[tokio::test(start_paused = true)]
async fn outcome_log_covers_every_pair_in_cartesian_order() {
    let sources = vec![
        scripted(Platform::Zhihu, vec![Ok(Vec::new()), Ok(Vec::new())]),
        scripted(Platform::V2ex, vec![Ok(Vec::new()), Ok(Vec::new())]),
    ];
    let mut collector = collector(sources);
    let request = request(&["kw1", "kw2"], &[Platform::Zhihu, Platform::V2ex]);

    let result = collector.run(&request).await;

    let attempted: Vec<(Platform, &str)> = result
        .outcomes
        .iter()
        .map(|o| (o.platform, o.keyword.as_str()))
        .collect();
    assert_eq!(
        attempted,
        [
            (Platform::Zhihu, "kw1"),
            (Platform::V2ex, "kw1"),
            (Platform::Zhihu, "kw2"),
            (Platform::V2ex, "kw2"),
        ],
        "keyword-major, platform-minor"
    );
}

#[tokio::test(start_paused = true)]
async fn one_failing_pair_never_disturbs_the_others() {
    let sources = vec![
        scripted(
            Platform::Zhihu,
            vec![
                Ok(vec![signal(Platform::Zhihu, "a1", "kw1")]),
                Ok(vec![signal(Platform::Zhihu, "a2", "kw2")]),
            ],
        ),
        scripted(
            Platform::V2ex,
            vec![
                Err(SourceError::Unavailable {
                    platform: Platform::V2ex,
                    status: 503,
                }),
                Ok(vec![signal(Platform::V2ex, "b2", "kw2")]),
            ],
        ),
    ];
    let mut collector = collector(sources);
    let request = request(&["kw1", "kw2"], &[Platform::Zhihu, Platform::V2ex]);

    let result = collector.run(&request).await;

    let titles: Vec<&str> = result.records.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, ["a1", "a2", "b2"]);
    assert_eq!(result.outcomes.len(), 4);
    let failed: Vec<&PairOutcome> = result
        .outcomes
        .iter()
        .filter(|o| matches!(o.outcome, Outcome::Failed { .. }))
        .collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].platform, Platform::V2ex);
    assert_eq!(failed[0].keyword, "kw1");
    assert_eq!(
        failed[0].outcome,
        Outcome::Failed {
            kind: SourceErrorKind::Unavailable
        }
    );
}

#[tokio::test(start_paused = true)]
async fn run_with_every_source_failing_still_completes() {
    let sources = vec![
        scripted(
            Platform::Zhihu,
            vec![
                Err(SourceError::Unauthorized {
                    platform: Platform::Zhihu,
                    reason: "login required".to_string(),
                }),
                Err(SourceError::Unauthorized {
                    platform: Platform::Zhihu,
                    reason: "login required".to_string(),
                }),
            ],
        ),
        scripted(
            Platform::ProductHunt,
            vec![
                Err(SourceError::Unauthorized {
                    platform: Platform::ProductHunt,
                    reason: "no token".to_string(),
                }),
                Err(SourceError::Unauthorized {
                    platform: Platform::ProductHunt,
                    reason: "no token".to_string(),
                }),
            ],
        ),
    ];
    let mut collector = collector(sources);
    let request = request(&["kw1", "kw2"], &[Platform::Zhihu, Platform::ProductHunt]);

    let result = collector.run(&request).await;

    assert!(result.records.is_empty());
    assert_eq!(result.outcomes.len(), 4);
    assert!(result
        .outcomes
        .iter()
        .all(|o| matches!(o.outcome, Outcome::Failed { .. })));
    assert!(!result.cancelled);
}

#[tokio::test(start_paused = true)]
async fn rate_limited_call_is_retried_exactly_once() {
    let (source, calls) = scripted_counted(
        Platform::Zhihu,
        vec![
            Err(rate_limited(Platform::Zhihu)),
            Err(rate_limited(Platform::Zhihu)),
        ],
    );
    let mut collector = collector(vec![source]);

    let result = collector.run(&request(&["kw"], &[Platform::Zhihu])).await;

    assert_eq!(calls.load(Ordering::SeqCst), 2, "one retry, then give up");
    assert_eq!(result.outcomes.len(), 1);
    assert_eq!(
        result.outcomes[0].outcome,
        Outcome::Failed {
            kind: SourceErrorKind::RateLimited
        }
    );
}

#[tokio::test(start_paused = true)]
async fn rate_limited_retry_can_recover() {
    let (source, calls) = scripted_counted(
        Platform::V2ex,
        vec![
            Err(rate_limited(Platform::V2ex)),
            Ok(vec![
                signal(Platform::V2ex, "t1", "kw"),
                signal(Platform::V2ex, "t2", "kw"),
            ]),
        ],
    );
    let mut collector = collector(vec![source]);

    let result = collector.run(&request(&["kw"], &[Platform::V2ex])).await;

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(result.records.len(), 2);
    assert_eq!(result.outcomes[0].outcome, Outcome::Success { count: 2 });
}

#[tokio::test(start_paused = true)]
async fn non_rate_limit_failures_are_not_retried() {
    let (source, calls) = scripted_counted(
        Platform::ProductHunt,
        vec![Err(SourceError::Unauthorized {
            platform: Platform::ProductHunt,
            reason: "no token".to_string(),
        })],
    );
    let mut collector = collector(vec![source]);

    let result = collector
        .run(&request(&["kw"], &[Platform::ProductHunt]))
        .await;

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        result.outcomes[0].outcome,
        Outcome::Failed {
            kind: SourceErrorKind::Unauthorized
        }
    );
}

#[tokio::test(start_paused = true)]
async fn cancellation_finishes_the_in_flight_call_and_keeps_its_records() {
    let token = CancellationToken::new();
    let source = Box::new(ScriptedSource {
        platform: Platform::Zhihu,
        script: Mutex::new(
            vec![Ok(vec![signal(Platform::Zhihu, "kept", "kw1")])].into(),
        ),
        calls: Arc::new(AtomicUsize::new(0)),
        cancel_on_call: Some(token.clone()),
    });
    let mut collector = Collector::new(vec![source], Duration::from_millis(2000), token);
    let request = request(&["kw1", "kw2"], &[Platform::Zhihu]);

    let result = collector.run(&request).await;

    assert!(result.cancelled);
    assert_eq!(result.records.len(), 1, "in-flight results are kept");
    assert_eq!(result.records[0].title, "kept");
    assert_eq!(
        result.outcomes.len(),
        1,
        "outcome log covers only the attempted pair"
    );
    assert!(result.outcomes.len() < request.pair_count());
}
