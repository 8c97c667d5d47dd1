use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration as StdDuration, Instant};

use augur_core::config::ReassessmentConfig;
use augur_core::errors::{AugurError, AugurResult};
use augur_core::traits::IDetector;
use augur_core::models::{PredictionStatus, ReassessmentTrigger};
use augur_core::{AugurConfig, Category, Outcome, PatternCandidate, PatternKind};
use augur_observability::RecoveryStatus;
use augur_detectors::{DetectorSet, SequenceDetector};
use augur_learning::AdaptiveLearner;
use augur_patterns::PatternStore;
use augur_reassessment::{from_fn, PatternReassessor, ReassessmentOutcome, ReassessmentRequest};
use augur_runtime::{
    default_callbacks, AugurRuntime, Pipeline, PipelineEvent, RecordingSink, TickSummary,
};
use augur_signals::{SignalCombiner, SignalDecision, Suppression};
use augur_validation::PredictionValidator;
use chrono::{DateTime, Duration, Utc};
use test_fixtures::{base_time, load_scenario, stream};

fn long_run_config() -> AugurConfig {
    let mut config = AugurConfig::default();
    config.detectors.min_run_length = 6;
    config
}

fn runtime(config: AugurConfig) -> (AugurRuntime, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::new());
    (AugurRuntime::new(config, sink.clone()), sink)
}

/// Feed a category string, returning every tick's summary.
fn feed(runtime: &AugurRuntime, text: &str, start: DateTime<Utc>) -> Vec<TickSummary> {
    test_fixtures::stream_from(text, start)
        .into_iter()
        .map(|o| {
            let now = o.timestamp();
            runtime.process_outcome_at(o, now)
        })
        .collect()
}

#[test]
fn long_run_emits_reversion_signal() {
    let (runtime, sink) = runtime(long_run_config());
    let ticks = feed(&runtime, "AAAAAA", base_time());

    for tick in &ticks[..5] {
        assert_eq!(
            tick.decision.suppression(),
            Some(&Suppression::DefaultPrediction)
        );
    }
    let last = ticks.last().unwrap();
    let SignalDecision::Emitted { signal, delivered } = &last.decision else {
        panic!("expected a signal, got {:?}", last.decision);
    };
    assert!(delivered);
    assert_eq!(signal.category, Category::B);
    assert!(signal.confidence >= runtime.config().validation.min_confidence_threshold);
    assert_eq!(last.prediction.pattern_kind, Some(PatternKind::Sequence));

    let pending = runtime.get_pending_predictions();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].predicted, Category::B);
    assert_eq!(pending[0].status, PredictionStatus::Pending);
    assert_eq!(sink.len(), 1);
    assert_eq!(runtime.get_metrics().signals_emitted, 1);
}

#[test]
fn alternation_continues_the_pair() {
    let (runtime, _sink) = runtime(AugurConfig::default());
    let ticks = feed(&runtime, "ABABABAB", base_time());
    let last = ticks.last().unwrap();
    assert_eq!(last.prediction.pattern_kind, Some(PatternKind::Alternation));
    assert_eq!(last.prediction.category, Category::A);
}

#[test]
fn wrong_call_is_incorrect_and_triggers_reassessment() {
    let (runtime, sink) = runtime(long_run_config());
    let ticks = feed(&runtime, "AAAAAA", base_time());
    let pattern_id = ticks.last().unwrap().prediction.pattern_id.clone();

    // The call was B; the run goes on.
    let t7 = base_time() + Duration::seconds(6);
    let tick = feed(&runtime, "A", t7).remove(0);
    assert_eq!(tick.results.len(), 1);
    assert_eq!(tick.results[0].status, PredictionStatus::Incorrect);
    assert_eq!(tick.results[0].actual, Some(Category::A));

    let pattern = runtime
        .get_active_patterns()
        .into_iter()
        .find(|p| p.id == pattern_id)
        .expect("sequence pattern still active");
    assert_eq!(pattern.total_predictions, 1);
    assert_eq!(pattern.correct_predictions, 0);
    assert_eq!(pattern.success_rate, 0.0);

    // Same category again inside the inter-signal cooldown: no second emit.
    assert!(matches!(
        tick.decision.suppression(),
        Some(Suppression::Duplicate {
            category: Category::B,
            ..
        })
    ));
    assert_eq!(sink.len(), 1);

    let validated = tick
        .events
        .iter()
        .find(|e| matches!(e, PipelineEvent::Validated(_)))
        .expect("validation event");
    let outcome = runtime.dispatch(validated, t7);
    let ReassessmentOutcome::Completed(event) = outcome else {
        panic!("expected a completed run, got {outcome:?}");
    };
    assert_eq!(event.trigger, ReassessmentTrigger::PredictionValidated);
    assert_eq!(event.context["result"], "incorrect");
    assert!(event.failed_callbacks.is_empty());
    // The zero-success pattern was pruned by the learner policy.
    assert!(event.removed_patterns().contains(&pattern_id.as_str()));

    // A second trigger inside the cooldown is skipped.
    assert_eq!(
        runtime.dispatch(validated, t7 + Duration::seconds(1)),
        ReassessmentOutcome::SkippedCooldown
    );
    let stats = runtime.get_reassessment_stats();
    assert_eq!(stats.total, 1);
    assert_eq!(stats.skipped_cooldown, 1);
    assert_eq!(runtime.get_recent_reassessments(5)[0].id, event.id);
    assert_eq!(runtime.get_metrics().reassessments_run, 1);
}

#[test]
fn silent_stream_expires_the_pending_call() {
    let (runtime, _sink) = runtime(long_run_config());
    feed(&runtime, "AAAAAA", base_time());
    let created = runtime.get_pending_predictions()[0].created_at;
    let timeout = runtime.config().validation.validation_timeout_secs as i64;

    assert!(runtime
        .expire_stale(created + Duration::seconds(timeout - 1))
        .is_empty());

    let results = runtime.expire_stale(created + Duration::seconds(timeout + 1));
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].status, PredictionStatus::Expired);
    assert_eq!(results[0].actual, None);
    assert!(runtime.get_pending_predictions().is_empty());

    let recent = runtime.get_recent_validations(10);
    assert_eq!(recent[0].status, PredictionStatus::Expired);
    let performance = runtime.get_performance_stats();
    assert_eq!(performance.expired, 1);
    assert_eq!(performance.correct + performance.incorrect, 0);

    let request = PipelineEvent::Validated(results[0].clone()).reassessment_request();
    assert_eq!(request.validation_status(), Some(PredictionStatus::Expired));
    assert!(!request.signals_trouble());
}

#[test]
fn invalid_readings_are_dropped_and_counted() {
    let (runtime, _sink) = runtime(AugurConfig::default());
    let now = base_time();
    assert!(runtime.process_raw(20, Category::B, now).is_none());
    assert!(runtime.process_raw(0, Category::A, now).is_none());
    assert!(runtime.process_raw(9, Category::B, now).is_some());

    let metrics = runtime.get_metrics();
    assert_eq!(metrics.invalid_outcomes, 2);
    assert_eq!(metrics.outcomes_ingested, 1);
    assert_eq!(runtime.get_learning_stats().history_len, 1);
}

#[test]
fn cold_runtime_answers_with_empty_snapshots() {
    let (runtime, _sink) = runtime(AugurConfig::default());
    assert!(runtime.get_active_patterns().is_empty());
    assert!(runtime.get_pending_predictions().is_empty());
    assert!(runtime.get_recent_validations(10).is_empty());
    assert!(runtime.get_recent_reassessments(10).is_empty());
    assert_eq!(runtime.get_performance_stats().total, 0);
    let stats = runtime.get_reassessment_stats();
    assert_eq!(stats.total, 0);
    assert!(!stats.is_reassessing);
    assert_eq!(stats.registered_callbacks, 3);
}

#[test]
fn failing_callback_does_not_stop_the_run() {
    let (runtime, _sink) = runtime(AugurConfig::default());
    runtime.register_callback(from_fn("flaky", |_: &mut Pipeline, _| {
        Err(AugurError::ConfigError("flaky".into()))
    }));
    let now = base_time();
    let outcome = runtime.reassess(ReassessmentRequest::time_based(now), now);
    let event = outcome.event().expect("run completed");
    assert_eq!(event.failed_callbacks, vec!["flaky".to_string()]);
    assert_eq!(event.trigger, ReassessmentTrigger::TimeBased);
}

#[test]
fn persistent_runtime_restores_calls_and_patterns() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = long_run_config();
    config.storage.enabled = true;
    config.storage.db_path = dir.path().join("augur.db").to_string_lossy().into_owned();

    {
        let (runtime, _sink) = runtime(config.clone());
        feed(&runtime, "AAAAAA", base_time());
        assert_eq!(runtime.get_pending_predictions().len(), 1);
        runtime.shutdown().unwrap();
    }

    let (restarted, _sink) = runtime(config);
    let pending = restarted.get_pending_predictions();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].predicted, Category::B);
    assert!(restarted.get_learning_stats().total_patterns >= 1);
    assert!(restarted.get_degradations().is_empty());
}

#[test]
fn unreachable_database_degrades_to_memory() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = long_run_config();
    config.storage.enabled = true;
    config.storage.db_path = dir
        .path()
        .join("missing")
        .join("augur.db")
        .to_string_lossy()
        .into_owned();

    let (runtime, sink) = runtime(config);
    feed(&runtime, "AAAAAA", base_time());
    assert_eq!(sink.len(), 1);

    let degradations = runtime.get_degradations();
    assert_eq!(degradations.len(), 1);
    assert_eq!(degradations[0].event.component, "storage");
    assert_eq!(degradations[0].recovery_status, RecoveryStatus::Active);
    assert!(runtime.shutdown().is_ok());
}

#[test]
fn stream_fixture_is_used_in_order() {
    let (runtime, _sink) = runtime(AugurConfig::default());
    for outcome in stream("ABCABC") {
        let now = outcome.timestamp();
        runtime.process_outcome_at(outcome, now);
    }
    assert_eq!(runtime.get_learning_stats().history_len, 6);
    assert_eq!(runtime.get_metrics().outcomes_ingested, 6);
}

#[test]
fn noisy_feed_keeps_invariants() {
    let (runtime, _sink) = runtime(AugurConfig::default());
    let scenario = load_scenario("noisy_feed");
    let mut rejected = 0;
    for parsed in scenario.outcomes() {
        match parsed {
            Ok(outcome) => {
                let now = outcome.timestamp();
                runtime.process_outcome_at(outcome, now);
            }
            Err(AugurError::InvalidOutcome { .. }) => rejected += 1,
            Err(other) => panic!("unexpected error {other}"),
        }
    }
    assert_eq!(rejected, 2);
    assert_eq!(runtime.get_metrics().outcomes_ingested, 20);
    assert!(
        runtime.get_pending_predictions().len() <= runtime.config().validation.max_pending_predictions
    );
    for pattern in runtime.get_active_patterns() {
        assert!((0.0..=1.0).contains(&pattern.confidence.value()));
        assert!(pattern.correct_predictions <= pattern.total_predictions);
    }
}

#[test]
fn housekeeping_expiries_are_published() {
    let (runtime, _sink) = runtime(long_run_config());
    feed(&runtime, "AAAAAA", base_time());
    let created = runtime.get_pending_predictions()[0].created_at;
    let late = created
        + Duration::seconds(runtime.config().validation.validation_timeout_secs as i64 + 1);

    let mut events = runtime.event_bus().subscribe();
    let outcome = runtime.reassess(ReassessmentRequest::time_based(late), late);
    assert!(outcome.ran());
    assert!(runtime.get_pending_predictions().is_empty());

    let Some(Ok(PipelineEvent::Validated(result))) = events.try_recv() else {
        panic!("expected the expiry on the bus");
    };
    assert_eq!(result.status, PredictionStatus::Expired);
    assert!(events.try_recv().is_none());
}

/// Sleeps on every call once armed.
struct Stalling {
    armed: Arc<AtomicBool>,
    delay: StdDuration,
}

impl IDetector for Stalling {
    fn name(&self) -> &str {
        "stalling"
    }
    fn kind(&self) -> PatternKind {
        PatternKind::Frequency
    }
    fn detect(&self, _window: &[Outcome]) -> AugurResult<Vec<PatternCandidate>> {
        if self.armed.load(Ordering::SeqCst) {
            std::thread::sleep(self.delay);
        }
        Ok(Vec::new())
    }
}

#[test]
fn slow_relearn_ends_the_run_at_the_deadline() {
    let config = long_run_config();
    let armed = Arc::new(AtomicBool::new(false));
    let detectors = DetectorSet::empty(&config.detectors)
        .with_detector(Box::new(Stalling {
            armed: Arc::clone(&armed),
            delay: StdDuration::from_millis(150),
        }))
        .with_detector(Box::new(SequenceDetector::new(&config.detectors)));
    let learner = AdaptiveLearner::with_parts(
        config.learner.clone(),
        &config.detectors,
        PatternStore::new(config.patterns.clone()),
        detectors,
    );
    let mut pipeline = Pipeline::from_parts(
        learner,
        PredictionValidator::new(config.validation.clone()),
        SignalCombiner::new(config.signals.clone()),
        Arc::new(RecordingSink::new()),
    );
    for outcome in stream("AAAAAA") {
        let now = outcome.timestamp();
        pipeline.tick(outcome, now);
    }

    let mut reassessor = PatternReassessor::new(ReassessmentConfig {
        max_duration_ms: 50,
        ..ReassessmentConfig::default()
    });
    for callback in default_callbacks() {
        reassessor.register(callback);
    }

    armed.store(true, Ordering::SeqCst);
    let started = Instant::now();
    let now = base_time() + Duration::seconds(10);
    let outcome = reassessor.reassess(&mut pipeline, ReassessmentRequest::time_based(now), now);
    let elapsed = started.elapsed();

    let ReassessmentOutcome::TimedOut(event) = outcome else {
        panic!("expected a timeout, got {outcome:?}");
    };
    assert!(event.timed_out);
    assert!(event.failed_callbacks.is_empty());
    // One stalled detector, not the whole line-up.
    assert!(elapsed < StdDuration::from_millis(1000), "took {elapsed:?}");
    assert_eq!(reassessor.stats(now).timed_out, 1);
}

#[test]
fn pipeline_events_serialize_with_a_type_tag() {
    let event = PipelineEvent::SequenceStarted {
        pattern_id: "seq-1".into(),
        at: base_time(),
    };
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["type"], "sequence_started");
    assert_eq!(json["pattern_id"], "seq-1");
}
