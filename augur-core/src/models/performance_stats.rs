use serde::{Deserialize, Serialize};

/// Validator counters. `accuracy` is `correct / (correct + incorrect)`;
/// expired predictions are not counted against it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceStats {
    pub total: u64,
    pub pending: usize,
    pub correct: u64,
    pub incorrect: u64,
    pub expired: u64,
    pub rejected: u64,
    pub accuracy: f64,
    pub recent_accuracy: Option<f64>,
    pub min_confidence_threshold: f64,
    pub max_pending: usize,
    pub persistence_degraded: bool,
}
