use serde::{Deserialize, Serialize};

use super::defaults;

/// Pattern store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternConfig {
    /// Observations a candidate needs before it becomes a pattern.
    pub min_pattern_frequency: u32,
    /// Multiplier applied to every pattern's confidence once per tick.
    pub decay_factor: f64,
    /// Patterns below this confidence are pruned.
    pub confidence_floor: f64,
    /// Untested patterns not updated for this long are pruned (seconds).
    pub stale_after_secs: u64,
    /// Upper bound for reinforced confidence.
    pub confidence_cap: f64,
    /// Weight of `log10(frequency + 1)` added on reinforcement.
    pub frequency_boost: f64,
    /// Hard ceiling on stored patterns; the lowest-ranked are evicted.
    pub max_patterns: usize,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            min_pattern_frequency: defaults::DEFAULT_MIN_PATTERN_FREQUENCY,
            decay_factor: defaults::DEFAULT_DECAY_FACTOR,
            confidence_floor: defaults::DEFAULT_CONFIDENCE_FLOOR,
            stale_after_secs: defaults::DEFAULT_STALE_AFTER_SECS,
            confidence_cap: defaults::DEFAULT_CONFIDENCE_CAP,
            frequency_boost: defaults::DEFAULT_FREQUENCY_BOOST,
            max_patterns: defaults::DEFAULT_MAX_PATTERNS,
        }
    }
}

impl PatternConfig {
    pub fn stale_after(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.stale_after_secs as i64)
    }
}
