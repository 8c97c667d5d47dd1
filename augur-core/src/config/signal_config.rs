use serde::{Deserialize, Serialize};

use super::defaults;

/// Signal combiner configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalConfig {
    /// Same-category signals closer than this are suppressed (seconds).
    pub inter_signal_cooldown_secs: u64,
    /// Suppress while any prediction is still pending.
    pub single_outstanding: bool,
    /// Starting per-kind confidence threshold.
    pub initial_threshold: f64,
    pub threshold_step: f64,
    pub min_floor: f64,
    pub max_ceiling: f64,
    /// Validations per kind kept for accuracy tracking.
    pub accuracy_window: usize,
    /// Validations a kind needs before its threshold adapts.
    pub min_samples: usize,
    /// Kind accuracy below this raises its threshold.
    pub raise_below: f64,
    /// Kind accuracy above this lowers its threshold.
    pub lower_above: f64,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            inter_signal_cooldown_secs: defaults::DEFAULT_INTER_SIGNAL_COOLDOWN_SECS,
            single_outstanding: true,
            initial_threshold: defaults::DEFAULT_SIGNAL_INITIAL_THRESHOLD,
            threshold_step: defaults::DEFAULT_SIGNAL_THRESHOLD_STEP,
            min_floor: defaults::DEFAULT_SIGNAL_MIN_FLOOR,
            max_ceiling: defaults::DEFAULT_SIGNAL_MAX_CEILING,
            accuracy_window: defaults::DEFAULT_SIGNAL_ACCURACY_WINDOW,
            min_samples: defaults::DEFAULT_SIGNAL_MIN_SAMPLES,
            raise_below: defaults::DEFAULT_SIGNAL_RAISE_BELOW,
            lower_above: defaults::DEFAULT_SIGNAL_LOWER_ABOVE,
        }
    }
}

impl SignalConfig {
    pub fn inter_signal_cooldown(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.inter_signal_cooldown_secs as i64)
    }
}
