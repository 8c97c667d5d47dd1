use std::sync::Mutex;

use augur_core::config::{SignalConfig, ValidationConfig};
use augur_core::errors::{AugurError, AugurResult};
use augur_core::models::{CombinedPrediction, PredictionStatus, Signal};
use augur_core::traits::ISignalSink;
use augur_core::{Category, PatternKind};
use augur_signals::{SignalCombiner, SignalDecision, Suppression};
use augur_validation::PredictionValidator;
use chrono::Duration;
use test_fixtures::base_time;

#[derive(Default)]
struct Collect {
    signals: Mutex<Vec<Signal>>,
}

impl ISignalSink for Collect {
    fn emit(&self, signal: &Signal) -> AugurResult<()> {
        self.signals.lock().unwrap().push(signal.clone());
        Ok(())
    }
}

impl Collect {
    fn count(&self) -> usize {
        self.signals.lock().unwrap().len()
    }
}

struct Offline;

impl ISignalSink for Offline {
    fn emit(&self, _signal: &Signal) -> AugurResult<()> {
        Err(AugurError::DegradedMode {
            component: "sink".into(),
            fallback: "none".into(),
        })
    }
}

fn prediction(category: Category, confidence: f64, kind: PatternKind) -> CombinedPrediction {
    CombinedPrediction {
        category,
        confidence,
        reasoning: format!("{kind} suggests {category}"),
        pattern_id: format!("{}-1", kind.prefix()),
        pattern_kind: Some(kind),
        contributing: vec![format!("{}-1", kind.prefix())],
        scores: Vec::new(),
        is_default: false,
    }
}

#[test]
fn accepted_prediction_is_registered_and_emitted() {
    let mut combiner = SignalCombiner::new(SignalConfig::default());
    let mut validator = PredictionValidator::new(ValidationConfig::default());
    let sink = Collect::default();
    let now = base_time();

    let decision = combiner.offer(
        &prediction(Category::B, 0.84, PatternKind::Sequence),
        &mut validator,
        &sink,
        now,
    );
    let SignalDecision::Emitted { signal, delivered } = decision else {
        panic!("expected emission, got {decision:?}");
    };
    assert!(delivered);
    assert_eq!(signal.category, Category::B);
    assert_eq!(signal.pattern_id, "seq-1");
    assert_eq!(signal.timestamp, now);
    assert_eq!(validator.pending()[0].id, signal.prediction_id);
    assert_eq!(validator.pending()[0].status, PredictionStatus::Pending);
    assert_eq!(sink.count(), 1);
}

#[test]
fn same_category_inside_cooldown_is_suppressed() {
    let config = SignalConfig::default();
    let cooldown = config.inter_signal_cooldown();
    let mut combiner = SignalCombiner::new(config);
    let mut validator = PredictionValidator::new(ValidationConfig::default());
    let sink = Collect::default();
    let t0 = base_time();

    assert!(combiner
        .offer(&prediction(Category::A, 0.8, PatternKind::Sequence), &mut validator, &sink, t0)
        .is_emitted());
    // Resolve it so only the cooldown stands in the way.
    validator.validate(Category::A, t0 + Duration::seconds(1));

    let second = combiner.offer(
        &prediction(Category::A, 0.8, PatternKind::Sequence),
        &mut validator,
        &sink,
        t0 + Duration::seconds(2),
    );
    assert!(matches!(
        second.suppression(),
        Some(Suppression::Duplicate {
            category: Category::A,
            ..
        })
    ));
    assert_eq!(sink.count(), 1);

    // A different category is not a duplicate.
    assert!(combiner
        .offer(
            &prediction(Category::B, 0.8, PatternKind::Sequence),
            &mut validator,
            &sink,
            t0 + Duration::seconds(3),
        )
        .is_emitted());
    validator.validate(Category::B, t0 + Duration::seconds(4));

    // And the same category is allowed again once the cooldown has passed.
    assert!(combiner
        .offer(
            &prediction(Category::A, 0.8, PatternKind::Sequence),
            &mut validator,
            &sink,
            t0 + cooldown + Duration::seconds(1),
        )
        .is_emitted());
    assert_eq!(sink.count(), 3);
    assert_eq!(combiner.stats().suppressed["duplicate"], 1);
}

#[test]
fn outstanding_prediction_blocks_new_signals() {
    let mut combiner = SignalCombiner::new(SignalConfig::default());
    let mut validator = PredictionValidator::new(ValidationConfig {
        max_pending_predictions: 3,
        ..ValidationConfig::default()
    });
    let sink = Collect::default();
    let t0 = base_time();

    combiner.offer(&prediction(Category::A, 0.8, PatternKind::Sequence), &mut validator, &sink, t0);
    let decision = combiner.offer(
        &prediction(Category::B, 0.8, PatternKind::Alternation),
        &mut validator,
        &sink,
        t0 + Duration::seconds(1),
    );
    assert_eq!(
        decision.suppression(),
        Some(&Suppression::Outstanding { pending: 1 })
    );
    assert_eq!(validator.pending_count(), 1);
}

#[test]
fn neutral_prediction_is_never_signalled() {
    let mut combiner = SignalCombiner::new(SignalConfig::default());
    let mut validator = PredictionValidator::new(ValidationConfig::default());
    let sink = Collect::default();
    let decision = combiner.offer(
        &CombinedPrediction::neutral(),
        &mut validator,
        &sink,
        base_time(),
    );
    assert_eq!(decision.suppression(), Some(&Suppression::DefaultPrediction));
    assert_eq!(sink.count(), 0);
    assert_eq!(validator.stats().rejected, 0);
}

#[test]
fn kind_threshold_follows_accuracy() {
    let mut combiner = SignalCombiner::new(SignalConfig::default());
    let mut validator = PredictionValidator::new(ValidationConfig::default());
    let sink = Collect::default();
    let mut now = base_time();

    // Three misses from alternation patterns raise that kind's bar.
    for _ in 0..3 {
        combiner.offer(
            &prediction(Category::A, 0.95, PatternKind::Alternation),
            &mut validator,
            &sink,
            now,
        );
        now += Duration::seconds(60);
        let results = validator.validate(Category::B, now);
        combiner.observe_validations(&results);
    }
    let raised = combiner.thresholds().threshold(PatternKind::Alternation);
    assert!(raised > SignalConfig::default().initial_threshold);

    let decision = combiner.offer(
        &prediction(Category::C, raised - 0.01, PatternKind::Alternation),
        &mut validator,
        &sink,
        now,
    );
    assert!(matches!(
        decision.suppression(),
        Some(Suppression::BelowKindThreshold {
            kind: PatternKind::Alternation,
            ..
        })
    ));
    // Other kinds are unaffected.
    assert_eq!(
        combiner.thresholds().threshold(PatternKind::Sequence),
        SignalConfig::default().initial_threshold
    );
}

#[test]
fn poor_recent_accuracy_raises_the_alert_bar() {
    let mut combiner = SignalCombiner::new(SignalConfig {
        inter_signal_cooldown_secs: 0,
        ..SignalConfig::default()
    });
    let mut validator = PredictionValidator::new(ValidationConfig::default());
    let sink = Collect::default();
    let mut now = base_time();

    for _ in 0..3 {
        combiner.offer(
            &prediction(Category::A, 0.95, PatternKind::UserDefined),
            &mut validator,
            &sink,
            now,
        );
        now += Duration::seconds(1);
        validator.validate(Category::C, now);
    }
    let decision = combiner.offer(
        &prediction(Category::B, 0.75, PatternKind::Frequency),
        &mut validator,
        &sink,
        now,
    );
    assert_eq!(
        decision.suppression(),
        Some(&Suppression::AlertBar { confidence: 0.75 })
    );
}

#[test]
fn sink_failure_keeps_the_prediction_pending() {
    let mut combiner = SignalCombiner::new(SignalConfig::default());
    let mut validator = PredictionValidator::new(ValidationConfig::default());
    let decision = combiner.offer(
        &prediction(Category::B, 0.8, PatternKind::Sequence),
        &mut validator,
        &Offline,
        base_time(),
    );
    assert!(matches!(
        decision,
        SignalDecision::Emitted {
            delivered: false,
            ..
        }
    ));
    assert_eq!(validator.pending_count(), 1);
    assert_eq!(combiner.stats().undelivered, 1);
}
