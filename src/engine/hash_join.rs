use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use canonical::{KeyedTable, TableId};
use index::ColumnIndex;
use matcher::{RunContext, compare_keyed_tables};
use tracing::{Level, debug};

use super::{Deduplicator, empty_run, ensure_unique_ids, finish_run};
use crate::config::{EngineKind, HashJoinConfig};
use crate::error::DedupError;
use crate::metrics::{DedupMetrics, DedupStage, StageTimer};
use crate::stats::{DedupReport, PairOutcomes};

const ENGINE: EngineKind = EngineKind::HashJoin;

/// Super-key hash-join engine.
///
/// Tables are bucketed only by column count; within a pair, rows are joined
/// on equal super-keys before the row-correspondence check. Tables are
/// compared as supplied, without canonicalization.
#[derive(Clone, Default)]
pub struct HashJoinDeduplicator {
    config: HashJoinConfig,
    metrics: Option<Arc<dyn DedupMetrics>>,
}

impl HashJoinDeduplicator {
    pub fn new(config: HashJoinConfig) -> Self {
        Self {
            config,
            metrics: None,
        }
    }

    /// Report stage and run timings to `metrics`.
    pub fn with_metrics(mut self, metrics: Arc<dyn DedupMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn config(&self) -> &HashJoinConfig {
        &self.config
    }

    /// Run the engine over `tables`.
    pub fn deduplicate(&self, tables: &[KeyedTable]) -> Result<DedupReport, DedupError> {
        let cfg = &self.config;
        let metrics = self.metrics.as_ref();
        let start = Instant::now();
        let span = tracing::span!(
            Level::INFO,
            "dedup.hash_join",
            tables = tables.len(),
            duplicate_rows_allowed = cfg.duplicate_rows_allowed
        );
        let _guard = span.enter();

        ensure_unique_ids(ENGINE, tables.iter().map(KeyedTable::id))?;
        if tables.is_empty() {
            return Ok(empty_run(ENGINE, metrics, start));
        }

        let timer = StageTimer::start(metrics, ENGINE, DedupStage::Index);
        let index = ColumnIndex::from_tables(tables.iter().map(KeyedTable::table));
        let elapsed_micros = timer.finish();
        debug!(
            buckets = index.len(),
            candidate_buckets = index.candidate_buckets().count(),
            candidate_pairs = index.candidate_buckets().map(|bucket| bucket.pair_count()).sum::<usize>(),
            elapsed_micros,
            "index_built"
        );

        let by_id: HashMap<TableId, &KeyedTable> =
            tables.iter().map(|table| (table.id(), table)).collect();
        let timer = StageTimer::start(metrics, ENGINE, DedupStage::Compare);
        let mut ctx = RunContext::new();
        let mut outcomes = PairOutcomes::default();
        for (low, high) in index.pairs() {
            let (Some(a), Some(b)) = (by_id.get(&low), by_id.get(&high)) else {
                continue;
            };
            let accepted = compare_keyed_tables(&mut ctx, a, b, cfg.duplicate_rows_allowed);
            outcomes.push((low, high), accepted);
        }
        let elapsed_micros = timer.finish();
        debug!(
            accepted = outcomes.accepted.len(),
            rejected = outcomes.rejected.len(),
            cached_rows = ctx.cached_rows(),
            elapsed_micros,
            "pairs_compared"
        );

        Ok(finish_run(ENGINE, metrics, cfg.grouping, outcomes, start))
    }
}

impl Deduplicator for HashJoinDeduplicator {
    type Input = KeyedTable;

    fn deduplicate(&self, tables: &[KeyedTable]) -> Result<DedupReport, DedupError> {
        HashJoinDeduplicator::deduplicate(self, tables)
    }
}
