//! Read-copy status board.
//!
//! The writer publishes a fresh snapshot after each tick and each
//! reassessment; readers clone it under a short read lock and never touch
//! the pipeline mutex.

use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use augur_core::models::{
    LearningStats, PerformanceStats, PredictionRecord, ReassessmentEvent, ReassessmentStats,
};
use augur_core::Pattern;
use augur_observability::{PipelineMetrics, TrackedDegradation};
use augur_signals::SignalStats;

use crate::pipeline::Pipeline;
use crate::SNAPSHOT_RECENT_VALIDATIONS;

/// Everything the query API can answer, as of `updated_at`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub active_patterns: Vec<Pattern>,
    pub pending: Vec<PredictionRecord>,
    /// Newest first.
    pub recent_validations: Vec<PredictionRecord>,
    pub performance: PerformanceStats,
    pub learning: LearningStats,
    pub signals: SignalStats,
    pub reassessment: ReassessmentStats,
    /// Newest first.
    pub recent_reassessments: Vec<ReassessmentEvent>,
    pub metrics: PipelineMetrics,
    pub degradations: Vec<TrackedDegradation>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default)]
pub struct StatusBoard {
    inner: Arc<RwLock<StatusSnapshot>>,
}

impl StatusBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refresh the pipeline-owned fields.
    pub fn publish_pipeline(&self, pipeline: &Pipeline, now: DateTime<Utc>) {
        let learner = pipeline.learner();
        let validator = pipeline.validator();
        let active_patterns = learner.active_patterns();
        let pending = validator.pending().to_vec();
        let recent_validations = validator.recent_validations(SNAPSHOT_RECENT_VALIDATIONS);
        let performance = validator.stats();
        let learning = learner.stats();
        let signals = pipeline.combiner().stats();
        let metrics = pipeline.metrics().clone();
        let degradations = pipeline.degradation().events().to_vec();

        self.update(|snapshot| {
            snapshot.active_patterns = active_patterns;
            snapshot.pending = pending;
            snapshot.recent_validations = recent_validations;
            snapshot.performance = performance;
            snapshot.learning = learning;
            snapshot.signals = signals;
            snapshot.metrics = metrics;
            snapshot.degradations = degradations;
            snapshot.updated_at = Some(now);
        });
    }

    /// Refresh the reassessor-owned fields.
    pub fn publish_reassessment(&self, stats: ReassessmentStats, recent: Vec<ReassessmentEvent>) {
        self.update(|snapshot| {
            snapshot.reassessment = stats;
            snapshot.recent_reassessments = recent;
        });
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        self.read(Clone::clone)
    }

    /// Borrow the current snapshot for the duration of `f`.
    pub fn read<R>(&self, f: impl FnOnce(&StatusSnapshot) -> R) -> R {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    fn update(&self, f: impl FnOnce(&mut StatusSnapshot)) {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard);
    }
}
