use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde_json::Value;

use augur_core::models::{PredictionStatus, ReassessmentTrigger, ValidationResult};

use crate::deadline::Deadline;

/// Why a reassessment is being asked for, and with what context.
#[derive(Debug, Clone, PartialEq)]
pub struct ReassessmentRequest {
    pub trigger: ReassessmentTrigger,
    pub context: BTreeMap<String, Value>,
    pub requested_at: DateTime<Utc>,
    /// Set by the reassessor when the run starts.
    pub deadline: Option<Deadline>,
}

impl ReassessmentRequest {
    pub fn new(trigger: ReassessmentTrigger, requested_at: DateTime<Utc>) -> Self {
        Self {
            trigger,
            context: BTreeMap::new(),
            requested_at,
            deadline: None,
        }
    }

    pub fn with_deadline(mut self, deadline: Deadline) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Instant by which long-running callback work should stop.
    pub fn deadline_at(&self) -> Option<std::time::Instant> {
        self.deadline.map(|d| d.at())
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.context.insert(key.to_string(), value.into());
        self
    }

    /// `PredictionValidated` with `result`, `predicted`, `actual`, `pattern_id`.
    pub fn validated(result: &ValidationResult) -> Self {
        Self::new(ReassessmentTrigger::PredictionValidated, result.validated_at)
            .with("result", result.status.as_str())
            .with("predicted", result.predicted.as_str())
            .with(
                "actual",
                result
                    .actual
                    .map_or(Value::Null, |c| Value::from(c.as_str())),
            )
            .with("pattern_id", result.pattern_id.as_str())
            .with("prediction_id", result.prediction_id.as_str())
    }

    pub fn new_sequence(pattern_id: &str, at: DateTime<Utc>) -> Self {
        Self::new(ReassessmentTrigger::NewSequenceStarted, at).with("pattern_id", pattern_id)
    }

    pub fn pattern_broken(pattern_ids: &[String], at: DateTime<Utc>) -> Self {
        Self::new(ReassessmentTrigger::PatternBroken, at).with("pattern_ids", pattern_ids.to_vec())
    }

    pub fn performance_drop(previous: f64, current: f64, at: DateTime<Utc>) -> Self {
        Self::new(ReassessmentTrigger::PerformanceDrop, at)
            .with("previous_accuracy", previous)
            .with("current_accuracy", current)
    }

    pub fn time_based(at: DateTime<Utc>) -> Self {
        Self::new(ReassessmentTrigger::TimeBased, at)
    }

    /// The validation status carried by a `PredictionValidated` request.
    pub fn validation_status(&self) -> Option<PredictionStatus> {
        self.context
            .get("result")
            .and_then(Value::as_str)
            .and_then(PredictionStatus::parse)
    }

    /// True for triggers that suggest the learner is overconfident.
    pub fn signals_trouble(&self) -> bool {
        match self.trigger {
            ReassessmentTrigger::PatternBroken | ReassessmentTrigger::PerformanceDrop => true,
            ReassessmentTrigger::PredictionValidated => {
                self.validation_status() == Some(PredictionStatus::Incorrect)
            }
            ReassessmentTrigger::NewSequenceStarted | ReassessmentTrigger::TimeBased => false,
        }
    }
}
