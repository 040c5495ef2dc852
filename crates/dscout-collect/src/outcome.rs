use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use dscout_core::{DemandRecord, Platform};
use dscout_sources::SourceErrorKind;

/// Result of one (keyword, platform) fetch attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success { count: usize },
    Failed { kind: SourceErrorKind },
}

/// One line of the outcome log: which pair was attempted and how it went.
#[derive(Debug, Clone)]
pub struct PairOutcome {
    pub platform: Platform,
    pub keyword: String,
    pub outcome: Outcome,
}

/// Everything a batch run produced: the accumulated records (insertion
/// order = discovery order) and exactly one outcome per attempted pair.
///
/// Built only by the runner; adapters return values and never touch it.
/// Not mutated after the run hands it to the exporter.
#[derive(Debug)]
pub struct RunResult {
    pub records: Vec<DemandRecord>,
    pub outcomes: Vec<PairOutcome>,
    /// True when the run was cut short by external cancellation; the
    /// outcome log then covers only the attempted pairs.
    pub cancelled: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Per-platform success/failure rollup for run reporting.
///
/// `records == 0` with `failed == 0` means the platform genuinely had
/// nothing for these keywords; failures carry their kinds so a
/// misconfigured source reads differently from an empty one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlatformTally {
    pub succeeded: usize,
    pub failed: usize,
    pub records: usize,
    pub failure_kinds: BTreeMap<SourceErrorKind, usize>,
}

impl RunResult {
    /// Roll the outcome log up into per-platform tallies, in stable
    /// platform order.
    #[must_use]
    pub fn tally(&self) -> BTreeMap<Platform, PlatformTally> {
        let mut tallies: BTreeMap<Platform, PlatformTally> = BTreeMap::new();
        for pair in &self.outcomes {
            let tally = tallies.entry(pair.platform).or_default();
            match pair.outcome {
                Outcome::Success { count } => {
                    tally.succeeded += 1;
                    tally.records += count;
                }
                Outcome::Failed { kind } => {
                    tally.failed += 1;
                    *tally.failure_kinds.entry(kind).or_default() += 1;
                }
            }
        }
        tallies
    }
}
