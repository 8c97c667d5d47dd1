use std::collections::{BTreeMap, VecDeque};

use tracing::debug;

use augur_core::config::SignalConfig;
use augur_core::models::ValidationResult;
use augur_core::PatternKind;

#[derive(Debug, Clone)]
struct KindState {
    threshold: f64,
    recent: VecDeque<bool>,
}

/// Per-kind confidence thresholds that move with each kind's recent accuracy.
///
/// After every compared validation the kind's window is updated; once it
/// holds `min_samples` entries, accuracy above `lower_above` lowers the
/// threshold by one step and accuracy below `raise_below` raises it.
/// Thresholds stay within `[min_floor, max_ceiling]`.
#[derive(Debug, Clone)]
pub struct AdaptiveThresholds {
    config: SignalConfig,
    kinds: BTreeMap<PatternKind, KindState>,
}

impl AdaptiveThresholds {
    pub fn new(config: SignalConfig) -> Self {
        Self {
            config,
            kinds: BTreeMap::new(),
        }
    }

    pub fn threshold(&self, kind: PatternKind) -> f64 {
        self.kinds
            .get(&kind)
            .map_or_else(|| self.initial(), |s| s.threshold)
    }

    /// Recent accuracy for `kind`, if it has any compared validations.
    pub fn accuracy(&self, kind: PatternKind) -> Option<f64> {
        let state = self.kinds.get(&kind)?;
        if state.recent.is_empty() {
            return None;
        }
        let correct = state.recent.iter().filter(|c| **c).count();
        Some(correct as f64 / state.recent.len() as f64)
    }

    /// Fold one compared validation into `kind`'s window; returns the new threshold.
    pub fn observe(&mut self, kind: PatternKind, correct: bool) -> f64 {
        let initial = self.initial();
        let window = self.config.accuracy_window.max(1);
        let state = self.kinds.entry(kind).or_insert_with(|| KindState {
            threshold: initial,
            recent: VecDeque::with_capacity(window),
        });
        if state.recent.len() == window {
            state.recent.pop_front();
        }
        state.recent.push_back(correct);

        if state.recent.len() >= self.config.min_samples {
            let correct = state.recent.iter().filter(|c| **c).count();
            let accuracy = correct as f64 / state.recent.len() as f64;
            let before = state.threshold;
            if accuracy > self.config.lower_above {
                state.threshold -= self.config.threshold_step;
            } else if accuracy < self.config.raise_below {
                state.threshold += self.config.threshold_step;
            }
            state.threshold = state
                .threshold
                .clamp(self.config.min_floor, self.config.max_ceiling);
            if state.threshold != before {
                debug!(
                    kind = %kind,
                    accuracy,
                    threshold = state.threshold,
                    "kind threshold adjusted"
                );
            }
        }
        state.threshold
    }

    /// Observe every compared result that names its pattern kind.
    pub fn observe_validations(&mut self, results: &[ValidationResult]) {
        for result in results.iter().filter(|r| r.was_compared()) {
            if let Some(kind) = result.pattern_kind {
                self.observe(kind, result.is_correct());
            }
        }
    }

    pub fn snapshot(&self) -> BTreeMap<PatternKind, f64> {
        PatternKind::ALL
            .iter()
            .map(|k| (*k, self.threshold(*k)))
            .collect()
    }

    fn initial(&self) -> f64 {
        self.config
            .initial_threshold
            .clamp(self.config.min_floor, self.config.max_ceiling)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accurate_kind_becomes_permissive() {
        let mut thresholds = AdaptiveThresholds::new(SignalConfig::default());
        let start = thresholds.threshold(PatternKind::Sequence);
        for _ in 0..3 {
            thresholds.observe(PatternKind::Sequence, true);
        }
        assert!(thresholds.threshold(PatternKind::Sequence) < start);
        assert_eq!(thresholds.threshold(PatternKind::Alternation), start);
    }

    #[test]
    fn inaccurate_kind_becomes_conservative_and_clamps() {
        let config = SignalConfig::default();
        let ceiling = config.max_ceiling;
        let mut thresholds = AdaptiveThresholds::new(config);
        for _ in 0..200 {
            thresholds.observe(PatternKind::Frequency, false);
        }
        assert_eq!(thresholds.threshold(PatternKind::Frequency), ceiling);
        assert_eq!(thresholds.accuracy(PatternKind::Frequency), Some(0.0));
    }

    #[test]
    fn too_few_samples_leave_threshold_alone() {
        let mut thresholds = AdaptiveThresholds::new(SignalConfig::default());
        let start = thresholds.threshold(PatternKind::Interaction);
        thresholds.observe(PatternKind::Interaction, false);
        thresholds.observe(PatternKind::Interaction, false);
        assert_eq!(thresholds.threshold(PatternKind::Interaction), start);
    }
}
