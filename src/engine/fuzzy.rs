use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use canonical::{CanonicalTable, RawTable, TableId, canonicalize_all};
use index::FuzzyIndex;
use matcher::similarity_score;
use perceptual::{HashAlgorithm, fingerprint_tables};
use tracing::{Level, debug};

use super::{Deduplicator, empty_run, ensure_unique_ids, finish_run, log_invalid_config};
use crate::config::{EngineKind, FuzzyConfig};
use crate::error::DedupError;
use crate::metrics::{DedupMetrics, DedupStage, StageTimer};
use crate::stats::{DedupReport, PairOutcomes};

const ENGINE: EngineKind = EngineKind::Fuzzy;

/// Near-duplicate engine.
///
/// Every unordered pair whose SimHash-128 fingerprints lie within
/// `bit_tolerance` bits is scored by mean cell similarity over the canonical
/// tables; pairs at or above `threshold` are duplicates. Pairs dropped by the
/// Hamming filter are not counted in the diagnostics.
#[derive(Clone, Default)]
pub struct FuzzyDeduplicator {
    config: FuzzyConfig,
    metrics: Option<Arc<dyn DedupMetrics>>,
}

impl FuzzyDeduplicator {
    pub fn new(config: FuzzyConfig) -> Self {
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

    pub fn config(&self) -> &FuzzyConfig {
        &self.config
    }

    /// Run the engine over `tables`.
    ///
    /// Fails with [`DedupError::InvalidConfig`] before touching any table when
    /// the threshold lies outside `[0, 1]`.
    pub fn deduplicate(&self, tables: &[RawTable]) -> Result<DedupReport, DedupError> {
        let cfg = &self.config;
        let metrics = self.metrics.as_ref();
        let start = Instant::now();
        let span = tracing::span!(
            Level::INFO,
            "dedup.fuzzy",
            tables = tables.len(),
            serialization = %cfg.serialization,
            bit_tolerance = cfg.bit_tolerance,
            similarity = %cfg.similarity,
            threshold = cfg.threshold
        );
        let _guard = span.enter();

        if let Err(err) = cfg.validate() {
            log_invalid_config(ENGINE, &err);
            return Err(err);
        }
        ensure_unique_ids(ENGINE, tables.iter().map(|table| table.id))?;
        if tables.is_empty() {
            return Ok(empty_run(ENGINE, metrics, start));
        }

        let timer = StageTimer::start(metrics, ENGINE, DedupStage::Index);
        let canonical = canonicalize_all(tables);
        let fingerprints = fingerprint_tables(
            &canonical,
            cfg.serialization.serializer(),
            HashAlgorithm::SimHash128.hasher(),
            false,
        );
        let index = FuzzyIndex::new(fingerprints);
        let elapsed_micros = timer.finish();
        debug!(tables = index.len(), elapsed_micros, "index_built");

        let by_id: HashMap<TableId, &CanonicalTable> =
            canonical.iter().map(|table| (table.id, table)).collect();
        let scorer = cfg.similarity.scorer();
        let timer = StageTimer::start(metrics, ENGINE, DedupStage::Compare);
        let mut outcomes = PairOutcomes::default();
        for (low, high) in index.candidates(cfg.bit_tolerance) {
            let (Some(a), Some(b)) = (by_id.get(&low), by_id.get(&high)) else {
                continue;
            };
            let score = similarity_score(a, b, scorer);
            outcomes.push((low, high), score >= cfg.threshold);
        }
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

impl Deduplicator for FuzzyDeduplicator {
    type Input = RawTable;

    fn deduplicate(&self, tables: &[RawTable]) -> Result<DedupReport, DedupError> {
        FuzzyDeduplicator::deduplicate(self, tables)
    }
}
