//! Deduplication engines.
//!
//! Every engine follows the same run shape: validate, index candidates,
//! compare candidate pairs, group accepted pairs. Runs own their caches, so
//! one engine value can serve any number of independent runs.

mod exact;
mod fuzzy;
mod hash_join;

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use canonical::TableId;
use tracing::{info, warn};

pub use self::exact::ExactDeduplicator;
pub use self::fuzzy::FuzzyDeduplicator;
pub use self::hash_join::HashJoinDeduplicator;

use crate::config::EngineKind;
use crate::error::DedupError;
use crate::grouping::{GroupingStrategy, group_pairs};
use crate::metrics::{DedupMetrics, DedupStage, StageTimer};
use crate::stats::{DedupReport, PairOutcomes};

/// A duplicate-detection engine over a corpus of `Input` tables.
pub trait Deduplicator {
    type Input;

    /// Find every group of duplicate tables in `tables`.
    ///
    /// An empty corpus yields an empty report.
    fn deduplicate(&self, tables: &[Self::Input]) -> Result<DedupReport, DedupError>;
}

/// Reject corpora that reuse a table id; every later lookup is keyed by id.
pub(crate) fn ensure_unique_ids(
    engine: EngineKind,
    ids: impl IntoIterator<Item = TableId>,
) -> Result<(), DedupError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            let err = DedupError::DuplicateTableId(id);
            warn!(engine = %engine, error = %err, "dedup_failure");
            return Err(err);
        }
    }
    Ok(())
}

pub(crate) fn log_invalid_config(engine: EngineKind, err: &DedupError) {
    warn!(engine = %engine, error = %err, "dedup_failure");
}

/// Group the collected outcomes and close out the run.
pub(crate) fn finish_run(
    engine: EngineKind,
    metrics: Option<&Arc<dyn DedupMetrics>>,
    grouping: GroupingStrategy,
    outcomes: PairOutcomes,
    start: Instant,
) -> DedupReport {
    let timer = StageTimer::start(metrics, engine, DedupStage::Group);
    let groups = group_pairs(&outcomes.accepted, grouping);
    let elapsed_micros = timer.finish();
    tracing::debug!(
        groups = groups.len(),
        grouping = %grouping,
        elapsed_micros,
        "groups_built"
    );

    let stats = outcomes.stats();
    let elapsed = start.elapsed();
    if let Some(recorder) = metrics {
        recorder.record_run(engine, elapsed, &stats);
    }
    info!(
        true_positives = stats.true_positives,
        false_positives = stats.false_positives,
        precision = stats.precision(),
        groups = groups.len(),
        elapsed_micros = elapsed.as_micros(),
        "dedup_complete"
    );

    DedupReport {
        groups,
        stats,
        accepted_pairs: outcomes.accepted,
        rejected_pairs: outcomes.rejected,
    }
}

/// Close out a run over an empty corpus.
pub(crate) fn empty_run(
    engine: EngineKind,
    metrics: Option<&Arc<dyn DedupMetrics>>,
    start: Instant,
) -> DedupReport {
    info!("empty_input");
    let report = DedupReport::default();
    if let Some(recorder) = metrics {
        recorder.record_run(engine, start.elapsed(), &report.stats);
    }
    report
}
