//! PatternReassessor: cooldown, single-flight guard, budgeted callback run.

use std::collections::BTreeMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};

use augur_core::config::ReassessmentConfig;
use augur_core::errors::AugurError;
use augur_core::models::{ReassessmentEvent, ReassessmentStats, ReassessmentTrigger};

use crate::callback::{PatternIds, ReassessmentCallback};
use crate::deadline::Deadline;
use crate::log::EventLog;
use crate::request::ReassessmentRequest;

/// What a call to [`PatternReassessor::reassess`] did.
#[derive(Debug, Clone, PartialEq)]
pub enum ReassessmentOutcome {
    Completed(ReassessmentEvent),
    /// The previous run finished less than `cooldown` ago.
    SkippedCooldown,
    /// Another run holds the guard.
    SkippedBusy,
    /// The budget ran out; later callbacks were skipped.
    TimedOut(ReassessmentEvent),
}

impl ReassessmentOutcome {
    pub fn event(&self) -> Option<&ReassessmentEvent> {
        match self {
            ReassessmentOutcome::Completed(e) | ReassessmentOutcome::TimedOut(e) => Some(e),
            _ => None,
        }
    }

    pub fn ran(&self) -> bool {
        self.event().is_some()
    }
}

/// Shared single-flight guard. Cloned handles let a scheduler see a run in
/// progress without waiting on the lock that protects the subject.
#[derive(Debug, Clone, Default)]
pub struct RunGuard {
    running: Arc<AtomicBool>,
    skipped: Arc<AtomicU64>,
}

impl RunGuard {
    pub fn is_busy(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Count a request turned away because a run was in flight.
    pub fn note_skip(&self) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn skipped(&self) -> u64 {
        self.skipped.load(Ordering::Relaxed)
    }

    pub(crate) fn try_acquire(&self) -> bool {
        self.running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    pub(crate) fn release(&self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone, Default)]
struct Counters {
    total: u64,
    trigger_counts: BTreeMap<ReassessmentTrigger, u64>,
    total_duration_ms: u64,
    skipped_cooldown: u64,
    timed_out: u64,
}

/// Runs registered callbacks against a subject `T` (the pipeline that owns
/// the pattern store) and records an audit event per run.
pub struct PatternReassessor<T> {
    config: ReassessmentConfig,
    callbacks: Vec<Box<dyn ReassessmentCallback<T>>>,
    /// Guard: only one reassessment can run at a time.
    guard: RunGuard,
    last_run: Option<DateTime<Utc>>,
    log: EventLog,
    counters: Counters,
}

impl<T: PatternIds> PatternReassessor<T> {
    pub fn new(config: ReassessmentConfig) -> Self {
        Self {
            log: EventLog::new(config.history_size),
            config,
            callbacks: Vec::new(),
            guard: RunGuard::default(),
            last_run: None,
            counters: Counters::default(),
        }
    }

    pub fn register(&mut self, callback: Box<dyn ReassessmentCallback<T>>) {
        debug!(callback = callback.name(), "reassessment callback registered");
        self.callbacks.push(callback);
    }

    pub fn with_callback(mut self, callback: Box<dyn ReassessmentCallback<T>>) -> Self {
        self.register(callback);
        self
    }

    pub fn callback_names(&self) -> Vec<String> {
        self.callbacks.iter().map(|c| c.name().to_string()).collect()
    }

    pub fn guard(&self) -> RunGuard {
        self.guard.clone()
    }

    pub fn is_running(&self) -> bool {
        self.guard.is_busy()
    }

    /// Whether a run requested at `now` would be turned away by the cooldown.
    pub fn in_cooldown(&self, now: DateTime<Utc>) -> bool {
        self.last_run
            .is_some_and(|last| now - last < self.config.cooldown())
    }

    /// Run every callback for `request`, unless cooling down or already running.
    pub fn reassess(
        &mut self,
        subject: &mut T,
        request: ReassessmentRequest,
        now: DateTime<Utc>,
    ) -> ReassessmentOutcome {
        if self.in_cooldown(now) {
            self.counters.skipped_cooldown += 1;
            debug!(trigger = %request.trigger, "reassessment skipped: cooldown");
            return ReassessmentOutcome::SkippedCooldown;
        }
        if !self.guard.try_acquire() {
            self.guard.note_skip();
            debug!(trigger = %request.trigger, "reassessment skipped: already running");
            return ReassessmentOutcome::SkippedBusy;
        }

        let event = self.run_callbacks(subject, &request, now);
        self.guard.release();

        self.last_run = Some(now);
        self.counters.total += 1;
        *self.counters.trigger_counts.entry(request.trigger).or_insert(0) += 1;
        self.counters.total_duration_ms += event.duration_ms;
        self.log.push(event.clone());

        if event.timed_out {
            self.counters.timed_out += 1;
            ReassessmentOutcome::TimedOut(event)
        } else {
            ReassessmentOutcome::Completed(event)
        }
    }

    fn run_callbacks(
        &mut self,
        subject: &mut T,
        request: &ReassessmentRequest,
        now: DateTime<Utc>,
    ) -> ReassessmentEvent {
        let started = Instant::now();
        let deadline = Deadline::new(started, self.config.max_duration());
        let request = request.clone().with_deadline(deadline);
        let patterns_before = subject.pattern_ids();
        let mut failed_callbacks = Vec::new();
        let mut timed_out = false;

        for callback in self.callbacks.iter_mut() {
            if deadline.is_expired() {
                let err = deadline.timeout_error();
                warn!(trigger = %request.trigger, skipped_from = callback.name(), "{err}");
                timed_out = true;
                break;
            }

            let name = callback.name().to_string();
            let result = catch_unwind(AssertUnwindSafe(|| callback.on_reassess(subject, &request)));
            match result {
                Ok(Ok(())) => {}
                // The callback stopped its own work at the deadline.
                Ok(Err(err @ AugurError::ReassessmentTimeout { .. })) => {
                    warn!(callback = %name, "{err}");
                    timed_out = true;
                    break;
                }
                Ok(Err(e)) => {
                    warn!(callback = %name, error = %e, "reassessment callback failed");
                    failed_callbacks.push(name);
                }
                Err(_) => {
                    error!(callback = %name, "reassessment callback panicked");
                    failed_callbacks.push(name);
                }
            }
        }

        // A callback that overran the budget on its own still counts.
        if !timed_out && deadline.is_expired() {
            timed_out = true;
            warn!(
                trigger = %request.trigger,
                elapsed_ms = deadline.elapsed().as_millis() as u64,
                budget_ms = self.config.max_duration_ms,
                "reassessment overran its budget"
            );
        }

        let patterns_after = subject.pattern_ids();
        let duration_ms = started.elapsed().as_millis() as u64;
        let event = ReassessmentEvent {
            id: uuid::Uuid::new_v4().to_string(),
            trigger: request.trigger,
            timestamp: now,
            context: request.context.clone(),
            patterns_before,
            patterns_after,
            duration_ms,
            failed_callbacks,
            timed_out,
        };
        info!(
            trigger = %event.trigger,
            duration_ms,
            removed = event.removed_patterns().len(),
            failed = event.failed_callbacks.len(),
            "reassessment complete"
        );
        event
    }

    /// Latest events, newest first.
    pub fn recent(&self, limit: usize) -> Vec<ReassessmentEvent> {
        self.log.recent(limit)
    }

    pub fn last_reassessment(&self) -> Option<DateTime<Utc>> {
        self.last_run
    }

    pub fn stats(&self, now: DateTime<Utc>) -> ReassessmentStats {
        ReassessmentStats {
            total: self.counters.total,
            recent_24h: self.log.count_recent(now),
            trigger_counts: self.counters.trigger_counts.clone(),
            average_duration_ms: if self.counters.total == 0 {
                0.0
            } else {
                self.counters.total_duration_ms as f64 / self.counters.total as f64
            },
            is_reassessing: self.is_running(),
            last_reassessment: self.last_run,
            skipped_cooldown: self.counters.skipped_cooldown,
            skipped_busy: self.guard.skipped(),
            timed_out: self.counters.timed_out,
            registered_callbacks: self.callbacks.len(),
        }
    }
}
