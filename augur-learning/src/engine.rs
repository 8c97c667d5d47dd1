//! AdaptiveLearner: the per-outcome learning pipeline.
//!
//! Each tick:
//! 1. Append the outcome to the rolling history.
//! 2. Run every detector over the detection window; upsert each candidate.
//! 3. Decay all patterns, then prune.
//! 4. Fold resolved predictions into the producing patterns' track records.
//!
//! [`AdaptiveLearner::predict`] then merges the active patterns into one forecast.

use std::collections::{HashMap, HashSet};
use std::time::Instant;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use augur_core::config::{AugurConfig, DetectorConfig, LearnerConfig};
use augur_core::models::{CombinedPrediction, LearningStats, ValidationResult};
use augur_core::{Outcome, Pattern, PatternKind, PatternPayload};
use augur_detectors::{DetectorFailureReport, DetectorSet, RunMode};
use augur_patterns::{PatternStore, PruneReport, Upsert};

use crate::combine::combine;
use crate::history::OutcomeHistory;

/// What one tick changed.
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    /// Patterns created this tick, with their kind.
    pub created: Vec<(String, PatternKind)>,
    pub refreshed: usize,
    pub ignored: usize,
    pub pruned: PruneReport,
    /// Patterns that were active before the tick and were pruned by it.
    pub broken: Vec<String>,
    pub failures: Vec<DetectorFailureReport>,
    /// Validation results folded into a pattern's track record.
    pub recorded: usize,
}

impl TickReport {
    /// Ids of Sequence patterns that first appeared this tick.
    pub fn new_sequences(&self) -> impl Iterator<Item = &str> {
        self.created
            .iter()
            .filter(|(_, kind)| *kind == PatternKind::Sequence)
            .map(|(id, _)| id.as_str())
    }
}

/// What a relearn pass changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelearnReport {
    pub created: usize,
    pub refreshed: usize,
    /// Candidates whose pattern the latest tick already refreshed.
    pub already_fresh: usize,
    /// Detectors skipped because the deadline passed.
    pub skipped_detectors: Vec<String>,
}

impl RelearnReport {
    pub fn timed_out(&self) -> bool {
        !self.skipped_detectors.is_empty()
    }
}

/// Owns the pattern store, the detector set, and the rolling history.
pub struct AdaptiveLearner {
    config: LearnerConfig,
    break_length: usize,
    store: PatternStore,
    detectors: DetectorSet,
    history: OutcomeHistory,
    /// Pattern keys upserted since the latest outcome.
    fresh_keys: HashSet<String>,
    confidence_threshold: f64,
    total_predictions: u64,
    correct_predictions: u64,
}

impl AdaptiveLearner {
    /// Build the full pipeline from configuration.
    pub fn new(config: &AugurConfig) -> Self {
        Self::with_parts(
            config.learner.clone(),
            &config.detectors,
            PatternStore::new(config.patterns.clone()),
            DetectorSet::from_config(&config.detectors, &config.patterns, &config.rules),
        )
    }

    /// Assemble from explicit parts (custom detector line-ups, tests).
    pub fn with_parts(
        config: LearnerConfig,
        detector_config: &DetectorConfig,
        store: PatternStore,
        detectors: DetectorSet,
    ) -> Self {
        Self {
            history: OutcomeHistory::new(config.history_size),
            fresh_keys: HashSet::new(),
            confidence_threshold: config.confidence_threshold,
            break_length: detector_config.alternation_break_length,
            config,
            store,
            detectors,
            total_predictions: 0,
            correct_predictions: 0,
        }
    }

    /// Process one outcome. `resolved` holds the validation results this
    /// outcome produced; compared ones are credited to their pattern.
    pub fn ingest(
        &mut self,
        outcome: Outcome,
        resolved: &[ValidationResult],
        now: DateTime<Utc>,
    ) -> TickReport {
        let mut report = TickReport::default();
        let active_before: Vec<String> = self
            .store
            .active_patterns(self.confidence_threshold)
            .into_iter()
            .map(|p| p.id)
            .collect();

        // Rule ids must be read before prune can remove the pattern.
        let rule_ids: HashMap<String, String> = resolved
            .iter()
            .filter_map(|r| match self.store.get(&r.pattern_id).map(|p| &p.payload) {
                Some(PatternPayload::UserDefined { rule_id, .. }) => {
                    Some((r.pattern_id.clone(), rule_id.clone()))
                }
                _ => None,
            })
            .collect();

        // Step 1: history
        debug!(value = outcome.value(), category = %outcome.category(), "outcome ingested");
        self.history.push(outcome);

        // Step 2: detect + upsert
        let window = self.history.recent(self.config.detection_window);
        let run = self.detectors.run(&window, now);
        self.fresh_keys.clear();
        for candidate in &run.candidates {
            self.fresh_keys.insert(candidate.key());
            match self.store.upsert(candidate, now) {
                Upsert::Created(id) => report.created.push((id, candidate.kind())),
                Upsert::Refreshed(_) => report.refreshed += 1,
                Upsert::Ignored => report.ignored += 1,
            }
        }
        report.failures = run.failures;

        // Step 3: decay + prune
        self.store.decay_default();
        report.pruned = self.store.prune_default(now);
        report.broken = report
            .pruned
            .removed()
            .filter(|id| active_before.contains(id))
            .cloned()
            .collect();

        // Step 4: credit resolved predictions
        for result in resolved.iter().filter(|r| r.was_compared()) {
            let correct = result.is_correct();
            self.total_predictions += 1;
            if correct {
                self.correct_predictions += 1;
            }
            if let Some(rule_id) = rule_ids.get(&result.pattern_id) {
                self.detectors.record_rule_outcome(rule_id, correct);
            }
            match self.store.record_outcome(&result.pattern_id, correct, now) {
                Ok(()) => report.recorded += 1,
                Err(e) => debug!(error = %e, "resolved prediction has no live pattern"),
            }
        }

        if !report.created.is_empty() || !report.broken.is_empty() {
            info!(
                created = report.created.len(),
                broken = report.broken.len(),
                patterns = self.store.len(),
                "learning tick"
            );
        }
        report
    }

    /// Combined forecast for the next outcome. Never fails: with no active
    /// pattern the neutral prediction is returned.
    pub fn predict(&self) -> CombinedPrediction {
        let active = self.store.active_patterns(self.confidence_threshold);
        combine(&active, self.history.last(), self.break_length)
    }

    /// Re-run detection over the latest `relearn_window` outcomes.
    ///
    /// Rule cooldowns are left alone, and patterns the latest tick already
    /// refreshed are not reinforced twice. Detectors still pending when
    /// `deadline` passes are skipped.
    pub fn relearn(&mut self, now: DateTime<Utc>, deadline: Option<Instant>) -> RelearnReport {
        let mut report = RelearnReport::default();
        let window = self.history.recent(self.config.relearn_window);
        if window.is_empty() {
            return report;
        }
        let run = self
            .detectors
            .run_with(&window, now, RunMode::Replay, deadline);
        for candidate in &run.candidates {
            let key = candidate.key();
            if self.fresh_keys.contains(&key) && self.store.id_for_key(&key).is_some() {
                report.already_fresh += 1;
                continue;
            }
            self.fresh_keys.insert(key);
            match self.store.upsert(candidate, now) {
                Upsert::Created(_) => report.created += 1,
                Upsert::Refreshed(_) => report.refreshed += 1,
                Upsert::Ignored => {}
            }
        }
        report.skipped_detectors = run.skipped;
        debug!(
            created = report.created,
            refreshed = report.refreshed,
            already_fresh = report.already_fresh,
            window = window.len(),
            "relearned from recent outcomes"
        );
        report
    }

    /// Drop tested patterns whose success rate fell below `low_performer_rate`.
    pub fn prune_low_performers(&mut self) -> Vec<String> {
        let floor = self.config.low_performer_rate;
        let removed = self
            .store
            .remove_where(|p| p.total_predictions > 0 && p.success_rate < floor);
        if !removed.is_empty() {
            info!(count = removed.len(), "low-performing patterns removed");
        }
        removed
    }

    /// Raise the voting threshold by one step (more conservative).
    pub fn tighten(&mut self) -> f64 {
        self.set_threshold(self.confidence_threshold + self.config.threshold_step)
    }

    /// Lower the voting threshold by one step (more permissive).
    pub fn loosen(&mut self) -> f64 {
        self.set_threshold(self.confidence_threshold - self.config.threshold_step)
    }

    fn set_threshold(&mut self, value: f64) -> f64 {
        self.confidence_threshold = value.clamp(self.config.min_threshold, self.config.max_threshold);
        self.confidence_threshold
    }

    pub fn confidence_threshold(&self) -> f64 {
        self.confidence_threshold
    }

    pub fn active_patterns(&self) -> Vec<Pattern> {
        self.store.active_patterns(self.confidence_threshold)
    }

    pub fn store(&self) -> &PatternStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut PatternStore {
        &mut self.store
    }

    pub fn detectors(&self) -> &DetectorSet {
        &self.detectors
    }

    pub fn detectors_mut(&mut self) -> &mut DetectorSet {
        &mut self.detectors
    }

    pub fn history(&self) -> &OutcomeHistory {
        &self.history
    }

    pub fn stats(&self) -> LearningStats {
        LearningStats {
            total_patterns: self.store.len(),
            active_patterns: self.store.active_patterns(self.confidence_threshold).len(),
            patterns_by_kind: self.store.count_by_kind(),
            total_predictions: self.total_predictions,
            correct_predictions: self.correct_predictions,
            accuracy: if self.total_predictions == 0 {
                0.0
            } else {
                self.correct_predictions as f64 / self.total_predictions as f64
            },
            history_len: self.history.len(),
            confidence_threshold: self.confidence_threshold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_moves_within_bounds() {
        let config = AugurConfig::default();
        let mut learner = AdaptiveLearner::new(&config);
        let start = learner.confidence_threshold();
        assert!(learner.tighten() > start);
        for _ in 0..100 {
            learner.tighten();
        }
        assert_eq!(learner.confidence_threshold(), config.learner.max_threshold);
        for _ in 0..100 {
            learner.loosen();
        }
        assert_eq!(learner.confidence_threshold(), config.learner.min_threshold);
    }

    #[test]
    fn empty_learner_predicts_neutral() {
        let learner = AdaptiveLearner::new(&AugurConfig::default());
        assert!(learner.predict().is_default);
    }
}
