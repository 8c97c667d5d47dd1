//! Adaptive conservatism: the alert bar rises while recent accuracy is poor.

use std::collections::VecDeque;

use augur_core::config::ValidationConfig;

/// Accuracy over the recorded window, or `None` when it is empty.
pub fn recent_accuracy(recent: &VecDeque<bool>) -> Option<f64> {
    if recent.is_empty() {
        return None;
    }
    let correct = recent.iter().filter(|c| **c).count();
    Some(correct as f64 / recent.len() as f64)
}

/// True when enough recent validations exist and their accuracy is below
/// the low-water mark.
pub fn is_conservative(config: &ValidationConfig, recent: &VecDeque<bool>) -> bool {
    recent.len() >= config.recent_min_samples
        && recent_accuracy(recent).is_some_and(|acc| acc < config.low_accuracy_mark)
}

/// Whether a prediction at `confidence` clears the current bar.
pub fn clears_bar(config: &ValidationConfig, recent: &VecDeque<bool>, confidence: f64) -> bool {
    if confidence < config.min_confidence_threshold {
        return false;
    }
    if is_conservative(config, recent) {
        return confidence > config.conservative_confidence;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(results: &[bool]) -> VecDeque<bool> {
        results.iter().copied().collect()
    }

    #[test]
    fn floor_applies_without_history() {
        let config = ValidationConfig::default();
        assert!(clears_bar(&config, &window(&[]), 0.65));
        assert!(!clears_bar(&config, &window(&[]), 0.55));
    }

    #[test]
    fn poor_recent_accuracy_raises_the_bar() {
        let config = ValidationConfig::default();
        let poor = window(&[false, false, false, true]);
        assert!(is_conservative(&config, &poor));
        assert!(!clears_bar(&config, &poor, 0.75));
        assert!(clears_bar(&config, &poor, 0.85));
    }

    #[test]
    fn too_few_samples_stay_permissive() {
        let config = ValidationConfig::default();
        let short = window(&[false, false]);
        assert!(!is_conservative(&config, &short));
        assert!(clears_bar(&config, &short, 0.65));
    }
}
