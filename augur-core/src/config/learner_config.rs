use serde::{Deserialize, Serialize};

use super::defaults;

/// Adaptive learner configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LearnerConfig {
    /// Capacity of the rolling outcome history.
    pub history_size: usize,
    /// Most recent outcomes handed to detectors each tick.
    pub detection_window: usize,
    /// Patterns below this confidence do not vote in the combined prediction.
    pub confidence_threshold: f64,
    /// Adjustment applied by reassessment when tightening or loosening.
    pub threshold_step: f64,
    pub min_threshold: f64,
    pub max_threshold: f64,
    /// Outcomes re-scanned when relearning after a reassessment.
    pub relearn_window: usize,
    /// Tested patterns below this success rate are dropped on reassessment.
    pub low_performer_rate: f64,
}

impl Default for LearnerConfig {
    fn default() -> Self {
        Self {
            history_size: defaults::DEFAULT_HISTORY_SIZE,
            detection_window: defaults::DEFAULT_DETECTION_WINDOW,
            confidence_threshold: defaults::DEFAULT_LEARNER_CONFIDENCE_THRESHOLD,
            threshold_step: defaults::DEFAULT_LEARNER_THRESHOLD_STEP,
            min_threshold: defaults::DEFAULT_LEARNER_MIN_THRESHOLD,
            max_threshold: defaults::DEFAULT_LEARNER_MAX_THRESHOLD,
            relearn_window: defaults::DEFAULT_RELEARN_WINDOW,
            low_performer_rate: defaults::DEFAULT_LOW_PERFORMER_RATE,
        }
    }
}
