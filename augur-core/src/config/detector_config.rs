use serde::{Deserialize, Serialize};

use super::defaults;

/// Tuning for the built-in detectors.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    // Sequence
    pub min_run_length: usize,
    pub sequence_base_confidence: f64,
    /// Confidence added per outcome of run length.
    pub sequence_step: f64,
    pub sequence_cap: f64,

    // Alternation
    pub min_alternation_length: usize,
    /// At or beyond this length the alternation is expected to break.
    pub alternation_break_length: usize,
    pub alternation_base_confidence: f64,
    pub alternation_step: f64,
    pub alternation_cap: f64,

    // Frequency / hot-cold
    pub frequency_window: usize,
    pub frequency_min_samples: usize,
    /// A category is hot above `0.5 + margin` of the window.
    pub frequency_margin: f64,
    pub frequency_cap: f64,
    /// A category is cold below `expected × cold_ratio`.
    pub cold_ratio: f64,

    // Interaction
    pub interaction_min_samples: usize,
    /// Minimum conditional probability `P(to | from)`.
    pub interaction_probability: f64,
    pub interaction_cap: f64,

    /// Default per-rule cooldown for user-defined rules (seconds).
    pub rule_cooldown_secs: u64,

    /// Consecutive failures after which a detector is skipped until the
    /// next reassessment resets it. Zero disables quarantine.
    pub quarantine_after: u32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            min_run_length: defaults::DEFAULT_MIN_RUN_LENGTH,
            sequence_base_confidence: defaults::DEFAULT_SEQUENCE_BASE_CONFIDENCE,
            sequence_step: defaults::DEFAULT_SEQUENCE_STEP,
            sequence_cap: defaults::DEFAULT_SEQUENCE_CAP,
            min_alternation_length: defaults::DEFAULT_MIN_ALTERNATION_LENGTH,
            alternation_break_length: defaults::DEFAULT_ALTERNATION_BREAK_LENGTH,
            alternation_base_confidence: defaults::DEFAULT_ALTERNATION_BASE_CONFIDENCE,
            alternation_step: defaults::DEFAULT_ALTERNATION_STEP,
            alternation_cap: defaults::DEFAULT_ALTERNATION_CAP,
            frequency_window: defaults::DEFAULT_FREQUENCY_WINDOW,
            frequency_min_samples: defaults::DEFAULT_FREQUENCY_MIN_SAMPLES,
            frequency_margin: defaults::DEFAULT_FREQUENCY_MARGIN,
            frequency_cap: defaults::DEFAULT_FREQUENCY_CAP,
            cold_ratio: defaults::DEFAULT_COLD_RATIO,
            interaction_min_samples: defaults::DEFAULT_INTERACTION_MIN_SAMPLES,
            interaction_probability: defaults::DEFAULT_INTERACTION_PROBABILITY,
            interaction_cap: defaults::DEFAULT_INTERACTION_CAP,
            rule_cooldown_secs: defaults::DEFAULT_RULE_COOLDOWN_SECS,
            quarantine_after: defaults::DEFAULT_QUARANTINE_AFTER,
        }
    }
}

impl DetectorConfig {
    pub fn rule_cooldown(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.rule_cooldown_secs as i64)
    }
}
