use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::pattern::PatternKind;

/// Snapshot of what the learner currently knows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LearningStats {
    pub total_patterns: usize,
    pub active_patterns: usize,
    pub patterns_by_kind: BTreeMap<PatternKind, usize>,
    pub total_predictions: u64,
    pub correct_predictions: u64,
    pub accuracy: f64,
    pub history_len: usize,
    pub confidence_threshold: f64,
}
