use augur_core::config::ObservabilityConfig;
use augur_core::models::{DegradationEvent, PredictionStatus};
use augur_observability::{init_tracing, DegradationTracker, PipelineMetrics, RecoveryStatus};
use chrono::{Duration, TimeZone, Utc};

fn event(component: &str, minute: u32) -> DegradationEvent {
    DegradationEvent {
        component: component.to_string(),
        failure: "disk full".to_string(),
        fallback_used: "in_memory".to_string(),
        timestamp: Utc.with_ymd_and_hms(2026, 3, 1, 12, minute, 0).unwrap(),
    }
}

#[test]
fn repeated_failures_collapse_into_one_active_entry() {
    let mut tracker = DegradationTracker::new();
    assert!(tracker.record(event("prediction_store", 0)));
    assert!(!tracker.record(event("prediction_store", 1)));
    assert!(tracker.is_degraded("prediction_store"));
    assert_eq!(tracker.events().len(), 1);

    let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 10, 0).unwrap();
    assert_eq!(
        tracker.degraded_duration("prediction_store", now),
        Some(Duration::minutes(10))
    );

    assert!(tracker.mark_recovered("prediction_store", now));
    assert!(!tracker.is_degraded("prediction_store"));
    assert_eq!(tracker.events()[0].recovery_status, RecoveryStatus::Recovered);
    assert_eq!(tracker.events()[0].recovered_at, Some(now));
    assert!(tracker.degraded_duration("prediction_store", now).is_none());

    // A fresh failure after recovery is tracked again.
    assert!(tracker.record(event("prediction_store", 20)));
    assert_eq!(tracker.active_degradations().len(), 1);
}

#[test]
fn recent_count_respects_window() {
    let mut tracker = DegradationTracker::new();
    tracker.record(event("archive", 0));
    let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 30, 0).unwrap();
    tracker.mark_recovered("archive", now);
    tracker.record(event("archive", 29));

    assert_eq!(tracker.count_recent("archive", Duration::minutes(5), now), 1);
    assert_eq!(tracker.count_recent("archive", Duration::hours(1), now), 2);
    assert_eq!(tracker.count_recent("sink", Duration::hours(1), now), 0);
    assert!(!tracker.mark_recovered("sink", now));
}

#[test]
fn metrics_accumulate_and_serialize() {
    let mut metrics = PipelineMetrics::new();
    metrics.record_outcome();
    metrics.record_outcome();
    metrics.record_invalid_outcome();
    metrics.record_signal(true);
    metrics.record_signal(false);
    metrics.record_suppression("duplicate");
    metrics.record_suppression("rejected");
    metrics.record_validation(PredictionStatus::Incorrect);
    metrics.record_reassessment(true, true);
    metrics.record_reassessment(false, false);

    assert_eq!(metrics.outcomes_ingested, 2);
    assert_eq!(metrics.signals_emitted, 2);
    assert_eq!(metrics.signals_undelivered, 1);
    assert_eq!(metrics.total_suppressed(), 2);
    assert_eq!(metrics.predictions_rejected, 1);
    assert_eq!(metrics.validations["incorrect"], 1);
    assert_eq!(metrics.reassessments_run, 1);
    assert_eq!(metrics.reassessments_timed_out, 1);
    assert_eq!(metrics.reassessments_skipped, 1);

    let json = serde_json::to_value(&metrics).unwrap();
    assert_eq!(json["invalid_outcomes"], 1);

    metrics.reset();
    assert_eq!(metrics, PipelineMetrics::default());
}

#[test]
fn second_init_is_harmless() {
    let config = ObservabilityConfig::default();
    let _ = init_tracing(&config);
    assert!(!init_tracing(&config));
}
