use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration as StdDuration;

use augur_core::config::ReassessmentConfig;
use augur_core::errors::AugurError;
use augur_core::models::{PredictionStatus, ReassessmentTrigger, ValidationResult};
use augur_core::Category;
use augur_reassessment::{
    from_fn, PatternIds, PatternReassessor, ReassessmentCallback, ReassessmentOutcome,
    ReassessmentRequest,
};
use chrono::Duration;
use test_fixtures::base_time;

#[derive(Default)]
struct Board {
    ids: Vec<String>,
    threshold: f64,
}

impl PatternIds for Board {
    fn pattern_ids(&self) -> Vec<String> {
        let mut ids = self.ids.clone();
        ids.sort();
        ids
    }
}

fn board() -> Board {
    Board {
        ids: vec!["alt-1".into(), "seq-1".into(), "seq-2".into()],
        threshold: 0.5,
    }
}

fn incorrect_result() -> ValidationResult {
    ValidationResult {
        prediction_id: "pred-1".into(),
        pattern_id: "seq-1".into(),
        pattern_kind: None,
        predicted: Category::A,
        actual: Some(Category::B),
        status: PredictionStatus::Incorrect,
        confidence: 0.8,
        validation_delay_ms: 1000,
        validated_at: base_time(),
    }
}

fn dropping_callback(id: &'static str) -> Box<dyn ReassessmentCallback<Board>> {
    from_fn("drop", move |board: &mut Board, _| {
        board.ids.retain(|i| i != id);
        Ok(())
    })
}

#[test]
fn incorrect_validation_records_an_event() {
    let mut reassessor = PatternReassessor::<Board>::new(ReassessmentConfig::default());
    reassessor.register(from_fn(
        "tighten",
        |board: &mut Board, req: &ReassessmentRequest| {
            if req.signals_trouble() {
                board.threshold += 0.02;
            }
            Ok(())
        },
    ));
    reassessor.register(dropping_callback("seq-1"));

    let mut subject = board();
    let now = base_time();
    let outcome = reassessor.reassess(
        &mut subject,
        ReassessmentRequest::validated(&incorrect_result()),
        now,
    );

    let ReassessmentOutcome::Completed(event) = outcome else {
        panic!("expected a completed run, got {outcome:?}");
    };
    assert_eq!(event.trigger, ReassessmentTrigger::PredictionValidated);
    assert_eq!(event.context["result"], "incorrect");
    assert_eq!(event.patterns_before.len(), 3);
    assert_eq!(event.patterns_after, vec!["alt-1".to_string(), "seq-2".to_string()]);
    assert_eq!(event.removed_patterns(), vec!["seq-1"]);
    assert!(event.failed_callbacks.is_empty());
    assert!((subject.threshold - 0.52).abs() < 1e-9);

    let recent = reassessor.recent(5);
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].id, event.id);
}

#[test]
fn cooldown_skips_then_allows() {
    let config = ReassessmentConfig::default();
    let cooldown = config.cooldown();
    let mut reassessor = PatternReassessor::<Board>::new(config);
    let mut subject = board();
    let t0 = base_time();

    assert!(reassessor
        .reassess(&mut subject, ReassessmentRequest::time_based(t0), t0)
        .ran());
    let soon = t0 + cooldown - Duration::seconds(1);
    assert_eq!(
        reassessor.reassess(&mut subject, ReassessmentRequest::time_based(soon), soon),
        ReassessmentOutcome::SkippedCooldown
    );
    let later = t0 + cooldown;
    assert!(reassessor
        .reassess(&mut subject, ReassessmentRequest::time_based(later), later)
        .ran());

    let stats = reassessor.stats(later);
    assert_eq!(stats.total, 2);
    assert_eq!(stats.skipped_cooldown, 1);
    assert_eq!(stats.last_reassessment, Some(later));
}

#[test]
fn failing_callbacks_do_not_stop_the_rest() {
    let ran = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&ran);

    let mut reassessor = PatternReassessor::<Board>::new(ReassessmentConfig::default())
        .with_callback(from_fn(
            "erroring",
            |_: &mut Board, _| {
                Err(AugurError::ConfigError("bad state".into()))
            },
        ))
        .with_callback(from_fn(
            "panicking",
            |_: &mut Board, _| panic!("callback blew up"),
        ))
        .with_callback(from_fn(
            "counting",
            move |_: &mut Board, _| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            },
        ));

    let now = base_time();
    let outcome = reassessor.reassess(&mut board(), ReassessmentRequest::time_based(now), now);
    let event = outcome.event().unwrap();
    assert_eq!(
        event.failed_callbacks,
        vec!["erroring".to_string(), "panicking".to_string()]
    );
    assert_eq!(ran.load(Ordering::SeqCst), 1);
    assert!(!reassessor.is_running());
}

#[test]
fn budget_overrun_skips_remaining_callbacks() {
    let config = ReassessmentConfig {
        max_duration_ms: 10,
        ..ReassessmentConfig::default()
    };
    let second_ran = Arc::new(AtomicUsize::new(0));
    let flag = Arc::clone(&second_ran);

    let mut reassessor = PatternReassessor::<Board>::new(config)
        .with_callback(from_fn(
            "slow",
            |_: &mut Board, _| {
                std::thread::sleep(StdDuration::from_millis(40));
                Ok(())
            },
        ))
        .with_callback(from_fn(
            "never",
            move |_: &mut Board, _| {
                flag.fetch_add(1, Ordering::SeqCst);
                Ok(())
            },
        ));

    let now = base_time();
    let outcome = reassessor.reassess(&mut board(), ReassessmentRequest::time_based(now), now);
    let ReassessmentOutcome::TimedOut(event) = outcome else {
        panic!("expected a timeout, got {outcome:?}");
    };
    assert!(event.timed_out);
    assert!(event.duration_ms >= 10);
    assert_eq!(second_ran.load(Ordering::SeqCst), 0);
    assert_eq!(reassessor.stats(now).timed_out, 1);
}

#[test]
fn callbacks_see_the_run_deadline_and_can_stop_early() {
    let config = ReassessmentConfig {
        max_duration_ms: 30,
        ..ReassessmentConfig::default()
    };
    let later_ran = Arc::new(AtomicUsize::new(0));
    let flag = Arc::clone(&later_ran);

    let mut reassessor = PatternReassessor::<Board>::new(config)
        .with_callback(from_fn("chunked", |board: &mut Board, request| {
            let deadline = request.deadline.expect("deadline set by the reassessor");
            assert!(deadline.remaining() <= StdDuration::from_millis(30));
            // Work in small steps and give up once time runs out.
            for step in 0..1_000 {
                if deadline.is_expired() {
                    return Err(deadline.timeout_error());
                }
                board.ids.push(format!("step-{step}"));
                std::thread::sleep(StdDuration::from_millis(5));
            }
            Ok(())
        }))
        .with_callback(from_fn("after", move |_: &mut Board, _| {
            flag.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }));

    let now = base_time();
    let mut subject = board();
    let started = std::time::Instant::now();
    let outcome = reassessor.reassess(&mut subject, ReassessmentRequest::time_based(now), now);
    assert!(started.elapsed() < StdDuration::from_secs(1));

    let ReassessmentOutcome::TimedOut(event) = outcome else {
        panic!("expected a timeout, got {outcome:?}");
    };
    assert!(event.timed_out);
    // Stopping at the deadline is not a callback failure.
    assert!(event.failed_callbacks.is_empty());
    assert_eq!(later_ran.load(Ordering::SeqCst), 0);
    assert!(subject.ids.len() < 1_000);
    assert_eq!(reassessor.stats(now).timed_out, 1);
}

#[test]
fn guard_is_visible_during_a_run() {
    let mut reassessor = PatternReassessor::<Board>::new(ReassessmentConfig::default());
    let guard = reassessor.guard();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    reassessor.register(from_fn(
        "observer",
        move |_: &mut Board, _| {
            sink.lock().unwrap().push(guard.is_busy());
            Ok(())
        },
    ));

    let now = base_time();
    reassessor.reassess(&mut board(), ReassessmentRequest::time_based(now), now);
    assert_eq!(*seen.lock().unwrap(), vec![true]);
    assert!(!reassessor.guard().is_busy());
}

#[test]
fn history_is_a_bounded_ring() {
    let config = ReassessmentConfig {
        history_size: 2,
        cooldown_secs: 0,
        ..ReassessmentConfig::default()
    };
    let mut reassessor = PatternReassessor::<Board>::new(config);
    let mut subject = board();
    let t0 = base_time();
    let triggers = [
        ReassessmentRequest::time_based(t0),
        ReassessmentRequest::new_sequence("seq-2", t0),
        ReassessmentRequest::performance_drop(0.8, 0.4, t0),
    ];
    for (i, request) in triggers.into_iter().enumerate() {
        let at = t0 + Duration::seconds(i as i64);
        assert!(reassessor.reassess(&mut subject, request, at).ran());
    }

    let recent = reassessor.recent(10);
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].trigger, ReassessmentTrigger::PerformanceDrop);
    assert_eq!(recent[1].trigger, ReassessmentTrigger::NewSequenceStarted);

    let stats = reassessor.stats(t0 + Duration::hours(1));
    assert_eq!(stats.total, 3);
    assert_eq!(stats.recent_24h, 2);
    assert_eq!(stats.trigger_counts[&ReassessmentTrigger::TimeBased], 1);
    assert_eq!(stats.trigger_counts[&ReassessmentTrigger::PerformanceDrop], 1);

    let next_day = reassessor.stats(t0 + Duration::hours(25));
    assert_eq!(next_day.recent_24h, 0);
}
