use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use canonical::{CanonicalTable, RawTable, TableId, canonicalize, canonicalize_all};
use index::{Bucket, ExactIndex};
use matcher::{RunContext, compare_tables};
use perceptual::fingerprint_tables;
use rayon::prelude::*;
use tracing::{Level, debug};

use super::{Deduplicator, empty_run, ensure_unique_ids, finish_run};
use crate::config::{EngineKind, ExactConfig};
use crate::error::DedupError;
use crate::metrics::{DedupMetrics, DedupStage, StageTimer};
use crate::stats::{DedupReport, PairOutcomes};

const ENGINE: EngineKind = EngineKind::Exact;

/// Exact-duplicate engine: canonicalize, hash, bucket, then confirm every
/// bucketed pair with the row-correspondence matcher.
///
/// Tables in different buckets are never compared, so a hash that splits
/// true duplicates loses them. With a similarity hash the buckets are exact
/// SimHash values, not Hamming neighbourhoods.
#[derive(Clone, Default)]
pub struct ExactDeduplicator {
    config: ExactConfig,
    metrics: Option<Arc<dyn DedupMetrics>>,
}

impl ExactDeduplicator {
    pub fn new(config: ExactConfig) -> Self {
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

    pub fn config(&self) -> &ExactConfig {
        &self.config
    }

    /// Run the engine over `tables`.
    pub fn deduplicate(&self, tables: &[RawTable]) -> Result<DedupReport, DedupError> {
        let cfg = &self.config;
        let metrics = self.metrics.as_ref();
        let start = Instant::now();
        let span = tracing::span!(
            Level::INFO,
            "dedup.exact",
            tables = tables.len(),
            serialization = %cfg.serialization,
            hash = %cfg.hash,
            use_parallel = cfg.use_parallel
        );
        let _guard = span.enter();

        ensure_unique_ids(ENGINE, tables.iter().map(|table| table.id))?;
        if tables.is_empty() {
            return Ok(empty_run(ENGINE, metrics, start));
        }

        let timer = StageTimer::start(metrics, ENGINE, DedupStage::Index);
        let canonical: Vec<CanonicalTable> = if cfg.use_parallel {
            tables.par_iter().map(canonicalize).collect()
        } else {
            canonicalize_all(tables)
        };
        let fingerprints = fingerprint_tables(
            &canonical,
            cfg.serialization.serializer(),
            cfg.hash.hasher(),
            cfg.use_parallel,
        );
        let index = ExactIndex::from_fingerprints(&fingerprints);
        let candidate_buckets: Vec<&Bucket<u128>> = index.candidate_buckets().collect();
        let elapsed_micros = timer.finish();
        debug!(
            buckets = index.len(),
            candidate_buckets = candidate_buckets.len(),
            candidate_pairs = candidate_buckets.iter().map(|bucket| bucket.pair_count()).sum::<usize>(),
            elapsed_micros,
            "index_built"
        );

        let by_id: HashMap<TableId, &RawTable> =
            tables.iter().map(|table| (table.id, table)).collect();
        let timer = StageTimer::start(metrics, ENGINE, DedupStage::Compare);
        let outcomes = if cfg.use_parallel {
            // A table sits in exactly one bucket, so per-bucket caches never overlap.
            candidate_buckets
                .par_iter()
                .map(|bucket| compare_bucket(&mut RunContext::new(), bucket, &by_id))
                .collect::<Vec<_>>()
                .into_iter()
                .fold(PairOutcomes::default(), |mut all, bucket| {
                    all.extend(bucket);
                    all
                })
        } else {
            let mut ctx = RunContext::new();
            let mut all = PairOutcomes::default();
            for bucket in &candidate_buckets {
                all.extend(compare_bucket(&mut ctx, bucket, &by_id));
            }
            all
        };
        let elapsed_micros = timer.finish();
        debug!(
            accepted = outcomes.accepted.len(),
            rejected = outcomes.rejected.len(),
            elapsed_micros,
            "pairs_compared"
        );

        Ok(finish_run(ENGINE, metrics, cfg.grouping, outcomes, start))
    }
}

impl Deduplicator for ExactDeduplicator {
    type Input = RawTable;

    fn deduplicate(&self, tables: &[RawTable]) -> Result<DedupReport, DedupError> {
        ExactDeduplicator::deduplicate(self, tables)
    }
}

/// Compare every pair of one bucket against the raw tables.
fn compare_bucket(
    ctx: &mut RunContext,
    bucket: &Bucket<u128>,
    tables: &HashMap<TableId, &RawTable>,
) -> PairOutcomes {
    let mut outcomes = PairOutcomes::default();
    for (low, high) in bucket.pairs() {
        let (Some(a), Some(b)) = (tables.get(&low), tables.get(&high)) else {
            continue;
        };
        outcomes.push((low, high), compare_tables(ctx, a, b));
    }
    outcomes
}
