//! Observer hooks for deduplication runs.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::EngineKind;
use crate::stats::DedupStats;

/// Stages every engine passes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DedupStage {
    /// Canonicalize, fingerprint and bucket.
    Index,
    /// Pairwise comparison of bucketed candidates.
    Compare,
    /// Folding accepted pairs into groups.
    Group,
}

impl DedupStage {
    pub fn as_str(self) -> &'static str {
        match self {
            DedupStage::Index => "index",
            DedupStage::Compare => "compare",
            DedupStage::Group => "group",
        }
    }
}

/// Metrics observer for deduplication runs.
///
/// Attached per engine with `with_metrics`; there is no global recorder.
pub trait DedupMetrics: Send + Sync {
    fn record_stage(&self, engine: EngineKind, stage: DedupStage, elapsed: Duration);
    fn record_run(&self, engine: EngineKind, elapsed: Duration, stats: &DedupStats);
}

/// Times one stage and reports it to an optional recorder.
pub(crate) struct StageTimer<'a> {
    recorder: Option<&'a Arc<dyn DedupMetrics>>,
    engine: EngineKind,
    stage: DedupStage,
    start: Instant,
}

impl<'a> StageTimer<'a> {
    pub(crate) fn start(
        recorder: Option<&'a Arc<dyn DedupMetrics>>,
        engine: EngineKind,
        stage: DedupStage,
    ) -> Self {
        Self {
            recorder,
            engine,
            stage,
            start: Instant::now(),
        }
    }

    /// Report the stage and return its duration in microseconds for logging.
    pub(crate) fn finish(self) -> u128 {
        let elapsed = self.start.elapsed();
        if let Some(recorder) = self.recorder {
            recorder.record_stage(self.engine, self.stage, elapsed);
        }
        elapsed.as_micros()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use super::*;

    /// Recorder that keeps every event for assertions.
    #[derive(Default)]
    pub(crate) struct RecordingMetrics {
        pub(crate) stages: Mutex<Vec<(EngineKind, DedupStage)>>,
        pub(crate) runs: Mutex<Vec<(EngineKind, DedupStats)>>,
    }

    impl DedupMetrics for RecordingMetrics {
        fn record_stage(&self, engine: EngineKind, stage: DedupStage, _elapsed: Duration) {
            self.stages
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .push((engine, stage));
        }

        fn record_run(&self, engine: EngineKind, _elapsed: Duration, stats: &DedupStats) {
            self.runs
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .push((engine, *stats));
        }
    }
}
