use augur_core::config::SignalConfig;
use augur_core::PatternKind;
use augur_signals::AdaptiveThresholds;
use proptest::prelude::*;

fn kind() -> impl Strategy<Value = PatternKind> {
    prop::sample::select(PatternKind::ALL.to_vec())
}

proptest! {
    #[test]
    fn thresholds_stay_clamped(observations in prop::collection::vec((kind(), any::<bool>()), 0..200)) {
        let config = SignalConfig::default();
        let (floor, ceiling) = (config.min_floor, config.max_ceiling);
        let mut thresholds = AdaptiveThresholds::new(config);
        for (kind, correct) in observations {
            let threshold = thresholds.observe(kind, correct);
            prop_assert!(threshold >= floor && threshold <= ceiling);
        }
        for threshold in thresholds.snapshot().values() {
            prop_assert!(*threshold >= floor && *threshold <= ceiling);
        }
    }

    #[test]
    fn all_correct_never_raises(n in 0usize..50) {
        let config = SignalConfig::default();
        let start = config.initial_threshold;
        let mut thresholds = AdaptiveThresholds::new(config);
        for _ in 0..n {
            thresholds.observe(PatternKind::Sequence, true);
        }
        prop_assert!(thresholds.threshold(PatternKind::Sequence) <= start);
    }
}
