//! Pipeline counters.
//!
//! [`PipelineMetrics`] is a plain value owned by the pipeline and copied
//! into each status snapshot; nothing here is global.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use augur_core::models::PredictionStatus;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineMetrics {
    pub outcomes_ingested: u64,
    pub invalid_outcomes: u64,
    pub detector_failures: u64,
    pub patterns_created: u64,
    pub patterns_broken: u64,
    pub signals_emitted: u64,
    pub signals_undelivered: u64,
    /// Keyed by suppression label.
    pub signals_suppressed: BTreeMap<String, u64>,
    pub predictions_rejected: u64,
    /// Keyed by final status (`correct`, `incorrect`, `expired`).
    pub validations: BTreeMap<String, u64>,
    pub reassessments_run: u64,
    pub reassessments_skipped: u64,
    pub reassessments_timed_out: u64,
}

impl PipelineMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_outcome(&mut self) {
        self.outcomes_ingested += 1;
    }

    pub fn record_invalid_outcome(&mut self) {
        self.invalid_outcomes += 1;
    }

    pub fn record_detector_failures(&mut self, count: usize) {
        self.detector_failures += count as u64;
    }

    pub fn record_patterns(&mut self, created: usize, broken: usize) {
        self.patterns_created += created as u64;
        self.patterns_broken += broken as u64;
    }

    pub fn record_signal(&mut self, delivered: bool) {
        self.signals_emitted += 1;
        if !delivered {
            self.signals_undelivered += 1;
        }
    }

    pub fn record_suppression(&mut self, label: &str) {
        *self.signals_suppressed.entry(label.to_string()).or_insert(0) += 1;
        if label == "rejected" {
            self.predictions_rejected += 1;
        }
    }

    pub fn record_validation(&mut self, status: PredictionStatus) {
        *self.validations.entry(status.as_str().to_string()).or_insert(0) += 1;
    }

    /// `ran` is false for cooldown and busy skips.
    pub fn record_reassessment(&mut self, ran: bool, timed_out: bool) {
        if !ran {
            self.reassessments_skipped += 1;
            return;
        }
        self.reassessments_run += 1;
        if timed_out {
            self.reassessments_timed_out += 1;
        }
    }

    pub fn total_suppressed(&self) -> u64 {
        self.signals_suppressed.values().sum()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
