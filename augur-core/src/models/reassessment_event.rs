use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What caused a reassessment run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReassessmentTrigger {
    PredictionValidated,
    PatternBroken,
    NewSequenceStarted,
    PerformanceDrop,
    TimeBased,
}

impl ReassessmentTrigger {
    pub fn as_str(self) -> &'static str {
        match self {
            ReassessmentTrigger::PredictionValidated => "prediction_validated",
            ReassessmentTrigger::PatternBroken => "pattern_broken",
            ReassessmentTrigger::NewSequenceStarted => "new_sequence_started",
            ReassessmentTrigger::PerformanceDrop => "performance_drop",
            ReassessmentTrigger::TimeBased => "time_based",
        }
    }
}

impl fmt::Display for ReassessmentTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Audit record of one reassessment run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReassessmentEvent {
    pub id: String,
    pub trigger: ReassessmentTrigger,
    pub timestamp: DateTime<Utc>,
    pub context: BTreeMap<String, serde_json::Value>,
    pub patterns_before: Vec<String>,
    pub patterns_after: Vec<String>,
    pub duration_ms: u64,
    /// Callbacks that returned an error or panicked.
    pub failed_callbacks: Vec<String>,
    /// Set when the run was cut short by the duration budget.
    pub timed_out: bool,
}

impl ReassessmentEvent {
    pub fn removed_patterns(&self) -> Vec<&str> {
        self.patterns_before
            .iter()
            .filter(|id| !self.patterns_after.contains(id))
            .map(String::as_str)
            .collect()
    }
}
