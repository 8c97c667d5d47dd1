//! Pipeline: the single-writer state behind the runtime's mutex.
//!
//! One tick, in order:
//! 1. Resolve pending predictions against the outcome's category.
//! 2. Learn from the outcome and credit the resolved predictions.
//! 3. Feed the resolutions into the per-kind signal thresholds.
//! 4. Predict, then offer the prediction to the signal combiner.
//! 5. Collect the events that may warrant reassessment.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use augur_core::models::{CombinedPrediction, DegradationEvent, ValidationResult};
use augur_core::traits::{IPredictionStore, ISignalSink};
use augur_core::{AugurConfig, Category, Outcome, Pattern};
use augur_learning::{AdaptiveLearner, TickReport};
use augur_observability::{
    signal_span, tick_span, validation_span, DegradationTracker, PipelineMetrics,
};
use augur_reassessment::PatternIds;
use augur_signals::{SignalCombiner, SignalDecision};
use augur_validation::PredictionValidator;

use crate::event_bus::PipelineEvent;

const PREDICTION_STORE: &str = "prediction_store";

/// Everything one tick produced.
#[derive(Debug, Clone)]
pub struct TickSummary {
    pub results: Vec<ValidationResult>,
    pub report: TickReport,
    pub prediction: CombinedPrediction,
    pub decision: SignalDecision,
    pub events: Vec<PipelineEvent>,
}

pub struct Pipeline {
    learner: AdaptiveLearner,
    validator: PredictionValidator,
    combiner: SignalCombiner,
    sink: Arc<dyn ISignalSink>,
    metrics: PipelineMetrics,
    degradation: DegradationTracker,
    /// Events raised outside a tick, published once the lock is released.
    deferred: Vec<PipelineEvent>,
}

impl Pipeline {
    /// In-memory pipeline.
    pub fn new(config: &AugurConfig, sink: Arc<dyn ISignalSink>) -> Self {
        Self::from_parts(
            AdaptiveLearner::new(config),
            PredictionValidator::new(config.validation.clone()),
            SignalCombiner::new(config.signals.clone()),
            sink,
        )
    }

    /// Pipeline whose validator persists to `store` and restores from it.
    pub fn with_store(
        config: &AugurConfig,
        sink: Arc<dyn ISignalSink>,
        store: Arc<dyn IPredictionStore>,
    ) -> Self {
        let mut pipeline = Self::from_parts(
            AdaptiveLearner::new(config),
            PredictionValidator::with_store(config.validation.clone(), store),
            SignalCombiner::new(config.signals.clone()),
            sink,
        );
        pipeline.sync_degradation(Utc::now());
        pipeline
    }

    pub fn from_parts(
        learner: AdaptiveLearner,
        validator: PredictionValidator,
        combiner: SignalCombiner,
        sink: Arc<dyn ISignalSink>,
    ) -> Self {
        Self {
            learner,
            validator,
            combiner,
            sink,
            metrics: PipelineMetrics::new(),
            degradation: DegradationTracker::new(),
            deferred: Vec::new(),
        }
    }

    /// Process one outcome.
    pub fn tick(&mut self, outcome: Outcome, now: DateTime<Utc>) -> TickSummary {
        let _span = tick_span!(outcome.value(), outcome.category()).entered();
        let category = outcome.category();

        let results = self.validate(category, now);
        let report = self.learner.ingest(outcome, &results, now);
        self.combiner.observe_validations(&results);

        let prediction = self.learner.predict();
        let decision = {
            let _signal = signal_span!(prediction.category, prediction.confidence).entered();
            self.combiner
                .offer(&prediction, &mut self.validator, self.sink.as_ref(), now)
        };

        let mut events: Vec<PipelineEvent> =
            results.iter().cloned().map(PipelineEvent::Validated).collect();
        events.extend(report.new_sequences().map(|id| PipelineEvent::SequenceStarted {
            pattern_id: id.to_string(),
            at: now,
        }));
        if !report.broken.is_empty() {
            events.push(PipelineEvent::PatternsBroken {
                pattern_ids: report.broken.clone(),
                at: now,
            });
        }
        if let Some(drop) = self.validator.check_performance_drop() {
            events.push(PipelineEvent::PerformanceDropped {
                previous: drop.previous,
                current: drop.current,
                at: now,
            });
        }

        self.metrics.record_outcome();
        self.metrics.record_detector_failures(report.failures.len());
        self.metrics
            .record_patterns(report.created.len(), report.broken.len());
        match &decision {
            SignalDecision::Emitted { delivered, .. } => self.metrics.record_signal(*delivered),
            SignalDecision::Suppressed(reason) => self.metrics.record_suppression(reason.label()),
        }
        self.sync_degradation(now);

        TickSummary {
            results,
            report,
            prediction,
            decision,
            events,
        }
    }

    /// Build the outcome at the boundary; a malformed one is dropped and counted.
    pub fn tick_raw(
        &mut self,
        value: i64,
        category: Category,
        now: DateTime<Utc>,
    ) -> Option<TickSummary> {
        match Outcome::new(value, category, now) {
            Ok(outcome) => Some(self.tick(outcome, now)),
            Err(e) => {
                self.metrics.record_invalid_outcome();
                warn!(value, category = %category, error = %e, "invalid outcome dropped");
                None
            }
        }
    }

    /// Expire pendings older than the validation timeout.
    pub fn expire_stale(&mut self, now: DateTime<Utc>) -> Vec<ValidationResult> {
        let results = self.validator.expire_stale(now);
        for result in &results {
            self.metrics.record_validation(result.status);
        }
        self.sync_degradation(now);
        results
    }

    /// Queue events for the runtime to publish after the current run.
    pub fn defer_events(&mut self, events: impl IntoIterator<Item = PipelineEvent>) {
        self.deferred.extend(events);
    }

    pub fn take_deferred_events(&mut self) -> Vec<PipelineEvent> {
        std::mem::take(&mut self.deferred)
    }

    fn validate(&mut self, category: Category, now: DateTime<Utc>) -> Vec<ValidationResult> {
        let _span = validation_span!(self.validator.pending_count()).entered();
        let results = self.validator.validate(category, now);
        for result in &results {
            self.metrics.record_validation(result.status);
        }
        results
    }

    /// Mirror the validator's persistence state into the degradation tracker.
    fn sync_degradation(&mut self, now: DateTime<Utc>) {
        match self.validator.degradation() {
            Some(event) => {
                self.degradation.record(event.clone());
            }
            None => {
                if self.degradation.is_degraded(PREDICTION_STORE) {
                    self.degradation.mark_recovered(PREDICTION_STORE, now);
                }
            }
        }
    }

    /// Record a failure outside the validator (archive, storage open).
    pub fn record_degradation(&mut self, component: &str, failure: String, now: DateTime<Utc>) {
        self.degradation.record(DegradationEvent {
            component: component.to_string(),
            failure,
            fallback_used: "in_memory".to_string(),
            timestamp: now,
        });
    }

    /// Seed the pattern store from an archive snapshot.
    pub fn restore_patterns(&mut self, patterns: Vec<Pattern>) -> usize {
        let restored = self.learner.store_mut().restore(patterns);
        debug!(restored, "patterns restored from archive");
        restored
    }

    pub fn learner(&self) -> &AdaptiveLearner {
        &self.learner
    }

    pub fn learner_mut(&mut self) -> &mut AdaptiveLearner {
        &mut self.learner
    }

    pub fn validator(&self) -> &PredictionValidator {
        &self.validator
    }

    pub fn combiner(&self) -> &SignalCombiner {
        &self.combiner
    }

    pub fn metrics(&self) -> &PipelineMetrics {
        &self.metrics
    }

    pub fn metrics_mut(&mut self) -> &mut PipelineMetrics {
        &mut self.metrics
    }

    pub fn degradation(&self) -> &DegradationTracker {
        &self.degradation
    }
}

impl PatternIds for Pipeline {
    fn pattern_ids(&self) -> Vec<String> {
        self.learner.store().ids()
    }
}
