use augur_core::config::{AugurConfig, DetectorConfig, LearnerConfig};
use augur_core::errors::AugurResult;
use augur_core::models::{PredictionStatus, ValidationResult};
use augur_core::traits::IDetector;
use augur_core::{Category, Outcome, PatternCandidate, PatternKind};
use augur_detectors::{DetectorSet, SequenceDetector};
use augur_learning::AdaptiveLearner;
use augur_patterns::PatternStore;
use chrono::Duration;
use std::time::{Duration as StdDuration, Instant};
use test_fixtures::{base_time, stream};

fn feed(learner: &mut AdaptiveLearner, outcomes: Vec<Outcome>) {
    for outcome in outcomes {
        let now = outcome.timestamp();
        learner.ingest(outcome, &[], now);
    }
}

fn resolved(pattern_id: &str, predicted: Category, actual: Category) -> ValidationResult {
    ValidationResult {
        prediction_id: "pred-1".into(),
        pattern_id: pattern_id.into(),
        pattern_kind: Some(PatternKind::Sequence),
        predicted,
        actual: Some(actual),
        status: if predicted == actual {
            PredictionStatus::Correct
        } else {
            PredictionStatus::Incorrect
        },
        confidence: 0.8,
        validation_delay_ms: 1000,
        validated_at: base_time(),
    }
}

#[test]
fn long_run_predicts_reversion() {
    let mut config = AugurConfig::default();
    config.detectors.min_run_length = 6;
    let mut learner = AdaptiveLearner::new(&config);

    feed(&mut learner, stream("AAAAAA"));

    let prediction = learner.predict();
    assert!(!prediction.is_default);
    assert_eq!(prediction.category, Category::B);
    assert!(prediction.confidence >= config.validation.min_confidence_threshold);
    assert_eq!(prediction.pattern_kind, Some(PatternKind::Sequence));
}

#[test]
fn alternation_prediction_continues_the_pair() {
    let mut learner = AdaptiveLearner::new(&AugurConfig::default());
    feed(&mut learner, stream("ABABABAB"));
    let prediction = learner.predict();
    assert_eq!(prediction.pattern_kind, Some(PatternKind::Alternation));
    assert_eq!(prediction.category, Category::A);

    let mut learner = AdaptiveLearner::new(&AugurConfig::default());
    feed(&mut learner, stream("ABABABA"));
    assert_eq!(learner.predict().category, Category::B);
}

#[test]
fn cold_learner_returns_default_prediction() {
    let mut learner = AdaptiveLearner::new(&AugurConfig::default());
    feed(&mut learner, stream("AB"));
    let prediction = learner.predict();
    assert!(prediction.is_default);
    assert!(prediction.reasoning.starts_with("default"));
}

#[test]
fn resolved_predictions_update_pattern_track_record() {
    let mut learner = AdaptiveLearner::new(&AugurConfig::default());
    feed(&mut learner, stream("AAAA"));
    let pattern_id = learner.predict().pattern_id;

    let outcome = stream("B").remove(0);
    let report = learner.ingest(
        outcome,
        &[resolved(&pattern_id, Category::A, Category::B)],
        base_time() + Duration::seconds(10),
    );
    assert_eq!(report.recorded, 1);

    let pattern = learner.store().get(&pattern_id).unwrap();
    assert_eq!(pattern.total_predictions, 1);
    assert_eq!(pattern.correct_predictions, 0);
    assert_eq!(pattern.success_rate, 0.0);

    let stats = learner.stats();
    assert_eq!(stats.total_predictions, 1);
    assert_eq!(stats.accuracy, 0.0);
}

#[test]
fn history_is_bounded() {
    let config = AugurConfig {
        learner: LearnerConfig {
            history_size: 5,
            ..LearnerConfig::default()
        },
        ..AugurConfig::default()
    };
    let mut learner = AdaptiveLearner::new(&config);
    feed(&mut learner, stream("ABCABCABC"));
    assert_eq!(learner.history().len(), 5);
}

#[test]
fn new_sequence_is_reported_once() {
    let mut learner = AdaptiveLearner::new(&AugurConfig::default());
    let mut created = 0;
    for outcome in stream("BBBBB") {
        let now = outcome.timestamp();
        let report = learner.ingest(outcome, &[], now);
        created += report.new_sequences().count();
    }
    assert_eq!(created, 1);
}

#[test]
fn decayed_patterns_are_reported_broken() {
    let mut config = AugurConfig::default();
    config.patterns.decay_factor = 0.5;
    config.learner.confidence_threshold = 0.1;
    let mut learner = AdaptiveLearner::new(&config);
    feed(&mut learner, stream("AAA"));
    assert_eq!(learner.active_patterns().len(), 1);

    // Run broken: the sequence is no longer refreshed and halves each tick.
    let mut broken = Vec::new();
    for outcome in stream("BCBCBC") {
        let now = outcome.timestamp();
        broken.extend(learner.ingest(outcome, &[], now).broken);
    }
    assert_eq!(broken.len(), 1);
}

struct Panicking;

impl IDetector for Panicking {
    fn name(&self) -> &str {
        "panicking"
    }
    fn kind(&self) -> PatternKind {
        PatternKind::Frequency
    }
    fn detect(&self, _window: &[Outcome]) -> AugurResult<Vec<PatternCandidate>> {
        panic!("detector bug")
    }
}

#[test]
fn panicking_detector_does_not_stop_learning() {
    let detector_config = DetectorConfig::default();
    let detectors = DetectorSet::empty(&detector_config)
        .with_detector(Box::new(Panicking))
        .with_detector(Box::new(SequenceDetector::new(&detector_config)));
    let mut learner = AdaptiveLearner::with_parts(
        LearnerConfig::default(),
        &detector_config,
        PatternStore::default(),
        detectors,
    );

    let mut failures = 0;
    for outcome in stream("AAAA") {
        let now = outcome.timestamp();
        failures += learner.ingest(outcome, &[], now).failures.len();
    }
    assert_eq!(failures, 4);
    assert_eq!(learner.predict().category, Category::B);
}

#[test]
fn low_performers_are_pruned_and_relearned() {
    let mut learner = AdaptiveLearner::new(&AugurConfig::default());
    feed(&mut learner, stream("AAAA"));
    let id = learner.predict().pattern_id;
    for _ in 0..5 {
        learner
            .store_mut()
            .record_outcome(&id, false, base_time())
            .unwrap();
    }

    let removed = learner.prune_low_performers();
    assert_eq!(removed, vec![id]);
    assert!(learner.store().is_empty());

    // The run is still in the history, so relearning rediscovers it.
    assert_eq!(learner.relearn(base_time(), None).created, 1);
}

struct Slow(StdDuration);

impl IDetector for Slow {
    fn name(&self) -> &str {
        "slow"
    }
    fn kind(&self) -> PatternKind {
        PatternKind::Frequency
    }
    fn detect(&self, _window: &[Outcome]) -> AugurResult<Vec<PatternCandidate>> {
        std::thread::sleep(self.0);
        Ok(Vec::new())
    }
}

fn learner_with_slow_detector(delay: StdDuration) -> AdaptiveLearner {
    let detector_config = DetectorConfig::default();
    let detectors = DetectorSet::empty(&detector_config)
        .with_detector(Box::new(Slow(delay)))
        .with_detector(Box::new(SequenceDetector::new(&detector_config)));
    AdaptiveLearner::with_parts(
        LearnerConfig::default(),
        &detector_config,
        PatternStore::default(),
        detectors,
    )
}

#[test]
fn relearn_stops_at_the_deadline() {
    let mut learner = learner_with_slow_detector(StdDuration::from_millis(120));
    feed(&mut learner, stream("AAAA"));
    let patterns = learner.store().ids();

    let started = Instant::now();
    let report = learner.relearn(base_time(), Some(started + StdDuration::from_millis(30)));
    // The slow detector was already running; everything after it was skipped.
    assert!(report.timed_out());
    assert_eq!(report.skipped_detectors, vec!["sequence", "user_rules"]);
    assert!(started.elapsed() < StdDuration::from_secs(1));
    assert_eq!(learner.store().ids(), patterns);

    let expired = learner.relearn(base_time(), Some(Instant::now()));
    assert_eq!(expired.skipped_detectors, vec!["slow", "sequence", "user_rules"]);
    assert_eq!(expired.created + expired.refreshed, 0);
}

#[test]
fn relearn_without_deadline_runs_everything() {
    let mut learner = learner_with_slow_detector(StdDuration::from_millis(1));
    feed(&mut learner, stream("AAAA"));
    let report = learner.relearn(base_time(), None);
    assert!(!report.timed_out());
}

#[test]
fn relearn_does_not_reinforce_the_latest_tick_twice() {
    let mut learner = AdaptiveLearner::new(&AugurConfig::default());
    feed(&mut learner, stream("AAAA"));
    let id = learner.predict().pattern_id;
    let before = learner.store().get(&id).unwrap().clone();

    let report = learner.relearn(base_time(), None);
    assert_eq!(report.already_fresh, 1);
    assert_eq!(report.refreshed, 0);
    assert_eq!(report.created, 0);
    let after = learner.store().get(&id).unwrap();
    assert_eq!(after.frequency, before.frequency);
    assert_eq!(after.confidence, before.confidence);

    // The next outcome refreshes it again through the normal tick.
    let next = test_fixtures::outcome_at(Category::A, base_time() + Duration::seconds(4));
    learner.ingest(next, &[], base_time() + Duration::seconds(4));
    assert_eq!(
        learner.store().get(&id).unwrap().frequency,
        before.frequency + 1
    );
}
