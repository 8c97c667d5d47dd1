use serde::{Deserialize, Serialize};

use super::defaults;

/// Prediction validator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub min_confidence_threshold: f64,
    pub max_pending_predictions: usize,
    /// Pending predictions older than this expire (seconds).
    pub validation_timeout_secs: u64,
    /// Number of latest validations considered "recent".
    pub recent_window: usize,
    /// Recent validations needed before adaptive conservatism applies.
    pub recent_min_samples: usize,
    /// Recent accuracy below this raises the alert bar.
    pub low_accuracy_mark: f64,
    /// Confidence required while recent accuracy is low.
    pub conservative_confidence: f64,
    /// Validated records kept in memory.
    pub history_limit: usize,
    /// Window size for performance-drop detection.
    pub drop_window: usize,
    /// Accuracy loss between consecutive windows that counts as a drop.
    pub drop_threshold: f64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_confidence_threshold: defaults::DEFAULT_MIN_CONFIDENCE_THRESHOLD,
            max_pending_predictions: defaults::DEFAULT_MAX_PENDING_PREDICTIONS,
            validation_timeout_secs: defaults::DEFAULT_VALIDATION_TIMEOUT_SECS,
            recent_window: defaults::DEFAULT_RECENT_WINDOW,
            recent_min_samples: defaults::DEFAULT_RECENT_MIN_SAMPLES,
            low_accuracy_mark: defaults::DEFAULT_LOW_ACCURACY_MARK,
            conservative_confidence: defaults::DEFAULT_CONSERVATIVE_CONFIDENCE,
            history_limit: defaults::DEFAULT_VALIDATION_HISTORY_LIMIT,
            drop_window: defaults::DEFAULT_DROP_WINDOW,
            drop_threshold: defaults::DEFAULT_DROP_THRESHOLD,
        }
    }
}

impl ValidationConfig {
    pub fn validation_timeout(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.validation_timeout_secs as i64)
    }
}
