//! PredictionValidator: lifecycle owner for emitted predictions.
//!
//! A record is resolved by the first outcome handed to [`validate`] after its
//! creation, or expires once `validation_timeout` elapses. Terminal records
//! move to a bounded history and are never touched again.
//!
//! [`validate`]: PredictionValidator::validate

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use augur_core::config::ValidationConfig;
use augur_core::models::{
    DegradationEvent, PerformanceStats, PredictionRecord, PredictionStatus, RejectionReason,
    ValidationResult,
};
use augur_core::traits::IPredictionStore;
use augur_core::Category;

use crate::gate;
use crate::performance::{PerformanceDrop, PerformanceMonitor};
use crate::request::NewPrediction;

#[derive(Debug, Clone, Copy, Default)]
struct Counters {
    total: u64,
    correct: u64,
    incorrect: u64,
    expired: u64,
    rejected: u64,
}

pub struct PredictionValidator {
    config: ValidationConfig,
    /// Oldest first.
    pending: Vec<PredictionRecord>,
    /// Newest last, capped at `history_limit`.
    history: VecDeque<PredictionRecord>,
    /// Latest compared results for adaptive conservatism.
    recent: VecDeque<bool>,
    monitor: PerformanceMonitor,
    counters: Counters,
    store: Option<Arc<dyn IPredictionStore>>,
    degradation: Option<DegradationEvent>,
}

impl PredictionValidator {
    /// In-memory validator.
    pub fn new(config: ValidationConfig) -> Self {
        Self {
            monitor: PerformanceMonitor::new(config.drop_window, config.drop_threshold),
            recent: VecDeque::with_capacity(config.recent_window),
            config,
            pending: Vec::new(),
            history: VecDeque::new(),
            counters: Counters::default(),
            store: None,
            degradation: None,
        }
    }

    /// Validator backed by a persistent store. Pending records are restored;
    /// if the store is unavailable the validator starts degraded, in memory.
    pub fn with_store(config: ValidationConfig, store: Arc<dyn IPredictionStore>) -> Self {
        let mut validator = Self::new(config);
        match store.load_pending() {
            Ok(pending) => {
                if !pending.is_empty() {
                    info!(count = pending.len(), "restored pending predictions");
                }
                validator.pending = pending;
            }
            Err(e) => validator.enter_degraded(&e.to_string()),
        }
        match store.load_recent(validator.config.history_limit) {
            Ok(recent) => {
                // Store returns newest first.
                for record in recent.into_iter().rev() {
                    validator.history.push_back(record);
                }
            }
            Err(e) => validator.enter_degraded(&e.to_string()),
        }
        validator.store = Some(store);
        validator
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Accept a prediction as `Pending`, or say why not.
    pub fn add_prediction(
        &mut self,
        request: NewPrediction,
        now: DateTime<Utc>,
    ) -> Result<String, RejectionReason> {
        if request.confidence < self.config.min_confidence_threshold {
            self.counters.rejected += 1;
            let reason = RejectionReason::LowConfidence {
                confidence: request.confidence,
                threshold: self.config.min_confidence_threshold,
            };
            debug!(reason = %reason, "prediction rejected");
            return Err(reason);
        }
        if self.pending.len() >= self.config.max_pending_predictions {
            self.counters.rejected += 1;
            let reason = RejectionReason::TooManyPending {
                pending: self.pending.len(),
                max: self.config.max_pending_predictions,
            };
            debug!(reason = %reason, "prediction rejected");
            return Err(reason);
        }

        let record = PredictionRecord {
            id: uuid::Uuid::new_v4().to_string(),
            predicted: request.category,
            confidence: request.confidence,
            pattern_id: request.pattern_id,
            pattern_kind: request.pattern_kind,
            reasoning: request.reasoning,
            created_at: now,
            status: PredictionStatus::Pending,
            actual: None,
            validated_at: None,
        };
        info!(
            prediction_id = %record.id,
            category = %record.predicted,
            confidence = record.confidence,
            "prediction added"
        );
        self.persist(&record);
        let id = record.id.clone();
        self.pending.push(record);
        self.counters.total += 1;
        Ok(id)
    }

    /// Resolve every pending record against the outcome that just arrived.
    ///
    /// Records past the timeout expire instead of being compared. Each record
    /// is resolved exactly once; a second call finds nothing pending.
    pub fn validate(&mut self, actual: Category, now: DateTime<Utc>) -> Vec<ValidationResult> {
        let timeout = self.config.validation_timeout();
        let pending = std::mem::take(&mut self.pending);
        let mut results = Vec::with_capacity(pending.len());

        for mut record in pending {
            if now - record.created_at > timeout {
                record.status = PredictionStatus::Expired;
            } else {
                record.actual = Some(actual);
                record.status = if record.predicted == actual {
                    PredictionStatus::Correct
                } else {
                    PredictionStatus::Incorrect
                };
            }
            results.push(self.finalize(record, now));
        }
        results
    }

    /// Expire pending records older than the timeout without an outcome.
    pub fn expire_stale(&mut self, now: DateTime<Utc>) -> Vec<ValidationResult> {
        let timeout = self.config.validation_timeout();
        let (stale, fresh): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|r| now - r.created_at > timeout);
        self.pending = fresh;
        stale
            .into_iter()
            .map(|mut record| {
                record.status = PredictionStatus::Expired;
                self.finalize(record, now)
            })
            .collect()
    }

    /// Gate for new alerts: room for another pending record, the confidence
    /// floor, and a raised bar while recent accuracy is poor.
    pub fn should_alert(&self, confidence: f64) -> bool {
        if self.pending.len() >= self.config.max_pending_predictions {
            return false;
        }
        gate::clears_bar(&self.config, &self.recent, confidence)
    }

    /// Accuracy drop between consecutive windows, reported once per slump.
    pub fn check_performance_drop(&mut self) -> Option<PerformanceDrop> {
        self.monitor.check()
    }

    pub fn pending(&self) -> &[PredictionRecord] {
        &self.pending
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Latest terminal records, newest first.
    pub fn recent_validations(&self, limit: usize) -> Vec<PredictionRecord> {
        self.history.iter().rev().take(limit).cloned().collect()
    }

    pub fn stats(&self) -> PerformanceStats {
        let compared = self.counters.correct + self.counters.incorrect;
        PerformanceStats {
            total: self.counters.total,
            pending: self.pending.len(),
            correct: self.counters.correct,
            incorrect: self.counters.incorrect,
            expired: self.counters.expired,
            rejected: self.counters.rejected,
            accuracy: if compared == 0 {
                0.0
            } else {
                self.counters.correct as f64 / compared as f64
            },
            recent_accuracy: gate::recent_accuracy(&self.recent),
            min_confidence_threshold: self.config.min_confidence_threshold,
            max_pending: self.config.max_pending_predictions,
            persistence_degraded: self.degradation.is_some(),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.degradation.is_some()
    }

    pub fn degradation(&self) -> Option<&DegradationEvent> {
        self.degradation.as_ref()
    }

    /// Record a terminal transition: counters, history, persistence.
    fn finalize(&mut self, mut record: PredictionRecord, now: DateTime<Utc>) -> ValidationResult {
        record.validated_at = Some(now);
        match record.status {
            PredictionStatus::Correct => self.counters.correct += 1,
            PredictionStatus::Incorrect => self.counters.incorrect += 1,
            PredictionStatus::Expired => self.counters.expired += 1,
            PredictionStatus::Pending => {}
        }
        if matches!(
            record.status,
            PredictionStatus::Correct | PredictionStatus::Incorrect
        ) {
            let correct = record.status == PredictionStatus::Correct;
            if self.recent.len() == self.config.recent_window.max(1) {
                self.recent.pop_front();
            }
            self.recent.push_back(correct);
            self.monitor.record(correct);
        }

        let result = ValidationResult::from_record(&record, now);
        info!(
            prediction_id = %record.id,
            status = record.status.as_str(),
            predicted = %record.predicted,
            delay_ms = result.validation_delay_ms,
            "prediction resolved"
        );

        self.persist(&record);
        self.history.push_back(record);
        while self.history.len() > self.config.history_limit {
            self.history.pop_front();
        }
        result
    }

    fn persist(&mut self, record: &PredictionRecord) {
        let Some(store) = self.store.clone() else {
            return;
        };
        match store.save(record) {
            Ok(()) => {
                if self.degradation.take().is_some() {
                    info!("prediction store recovered");
                }
            }
            Err(e) => self.enter_degraded(&e.to_string()),
        }
    }

    fn enter_degraded(&mut self, failure: &str) {
        if self.degradation.is_none() {
            warn!(failure, "prediction store unavailable, continuing in memory");
        }
        self.degradation = Some(DegradationEvent {
            component: "prediction_store".to_string(),
            failure: failure.to_string(),
            fallback_used: "in_memory".to_string(),
            timestamp: Utc::now(),
        });
    }
}
