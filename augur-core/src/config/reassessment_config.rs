use serde::{Deserialize, Serialize};

use super::defaults;

/// Pattern reassessor configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReassessmentConfig {
    /// Minimum gap between two runs (seconds).
    pub cooldown_secs: u64,
    /// Period of the time-based trigger (seconds).
    pub interval_secs: u64,
    /// Budget for one run; remaining callbacks are skipped once exceeded.
    pub max_duration_ms: u64,
    /// Capacity of the event ring buffer.
    pub history_size: usize,
    /// Period of the stale-prediction sweep (seconds).
    pub housekeeping_interval_secs: u64,
}

impl Default for ReassessmentConfig {
    fn default() -> Self {
        Self {
            cooldown_secs: defaults::DEFAULT_REASSESSMENT_COOLDOWN_SECS,
            interval_secs: defaults::DEFAULT_REASSESSMENT_INTERVAL_SECS,
            max_duration_ms: defaults::DEFAULT_REASSESSMENT_MAX_DURATION_MS,
            history_size: defaults::DEFAULT_REASSESSMENT_HISTORY_SIZE,
            housekeeping_interval_secs: defaults::DEFAULT_HOUSEKEEPING_INTERVAL_SECS,
        }
    }
}

impl ReassessmentConfig {
    pub fn cooldown(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.cooldown_secs as i64)
    }

    pub fn max_duration(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.max_duration_ms)
    }
}
