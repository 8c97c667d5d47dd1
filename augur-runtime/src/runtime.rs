//! AugurRuntime: the explicit context every worker and query goes through.
//!
//! Lock order is reassessor, then pipeline. The ingestion path only takes
//! the pipeline lock, so a reassessment can delay a tick by at most its
//! duration budget and never deadlock with it.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use augur_core::models::{
    LearningStats, PerformanceStats, PredictionRecord, ReassessmentEvent, ReassessmentStats,
    ValidationResult,
};
use augur_core::traits::{IPatternArchive, IPredictionStore, ISignalSink, OutcomeSource};
use augur_core::{AugurConfig, AugurResult, Category, Outcome, Pattern};
use augur_observability::{reassessment_span, PipelineMetrics, TrackedDegradation};
use augur_reassessment::{
    PatternReassessor, ReassessmentCallback, ReassessmentOutcome, ReassessmentRequest, RunGuard,
};
use augur_signals::SignalStats;
use augur_storage::SqliteStore;

use crate::callbacks::default_callbacks;
use crate::event_bus::{EventBus, EventBusError, PipelineEvent};
use crate::pipeline::{Pipeline, TickSummary};
use crate::status::{StatusBoard, StatusSnapshot};
use crate::{EVENT_BUS_CAPACITY, SNAPSHOT_RECENT_REASSESSMENTS};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Join handles of the background workers.
pub struct WorkerHandles {
    /// Resolves to the number of outcomes processed.
    pub ingestion: JoinHandle<u64>,
    pub reassessment: JoinHandle<()>,
}

impl WorkerHandles {
    pub async fn join(self) -> u64 {
        let processed = self.ingestion.await.unwrap_or_else(|e| {
            warn!(error = %e, "ingestion worker ended abnormally");
            0
        });
        if let Err(e) = self.reassessment.await {
            warn!(error = %e, "reassessment worker ended abnormally");
        }
        processed
    }
}

pub struct AugurRuntime {
    config: AugurConfig,
    pipeline: Mutex<Pipeline>,
    reassessor: Mutex<PatternReassessor<Pipeline>>,
    guard: RunGuard,
    status: StatusBoard,
    bus: EventBus,
    archive: Option<Arc<dyn IPatternArchive>>,
    shutdown: CancellationToken,
}

impl AugurRuntime {
    /// Build from configuration. When `[storage]` is enabled the SQLite store
    /// backs both pending predictions and the pattern archive; if it cannot
    /// be opened the runtime starts in memory and records the degradation.
    pub fn new(config: AugurConfig, sink: Arc<dyn ISignalSink>) -> Self {
        if !config.storage.enabled {
            return Self::with_stores(config, sink, None, None);
        }
        match SqliteStore::from_config(&config.storage) {
            Ok(store) => {
                let store = Arc::new(store);
                let predictions: Arc<dyn IPredictionStore> = store.clone();
                let archive: Arc<dyn IPatternArchive> = store;
                Self::with_stores(config, sink, Some(predictions), Some(archive))
            }
            Err(e) => {
                warn!(db_path = %config.storage.db_path, error = %e, "storage unavailable, running in memory");
                let runtime = Self::with_stores(config, sink, None, None);
                lock(&runtime.pipeline).record_degradation("storage", e.to_string(), Utc::now());
                runtime.publish_pipeline(Utc::now());
                runtime
            }
        }
    }

    /// Build with explicit persistence. Archived patterns and pending
    /// predictions are restored before the first tick.
    pub fn with_stores(
        config: AugurConfig,
        sink: Arc<dyn ISignalSink>,
        predictions: Option<Arc<dyn IPredictionStore>>,
        archive: Option<Arc<dyn IPatternArchive>>,
    ) -> Self {
        let mut pipeline = match predictions {
            Some(store) => Pipeline::with_store(&config, sink, store),
            None => Pipeline::new(&config, sink),
        };
        if let Some(archive) = &archive {
            match archive.load_patterns() {
                Ok(patterns) => {
                    let restored = pipeline.restore_patterns(patterns);
                    if restored > 0 {
                        info!(restored, "pattern archive loaded");
                    }
                }
                Err(e) => {
                    warn!(error = %e, "pattern archive unreadable, starting cold");
                    pipeline.record_degradation("pattern_archive", e.to_string(), Utc::now());
                }
            }
        }
        Self::assemble(config, pipeline, archive)
    }

    fn assemble(
        config: AugurConfig,
        pipeline: Pipeline,
        archive: Option<Arc<dyn IPatternArchive>>,
    ) -> Self {
        let mut reassessor = PatternReassessor::new(config.reassessment.clone());
        for callback in default_callbacks() {
            reassessor.register(callback);
        }
        let guard = reassessor.guard();
        let status = StatusBoard::new();
        status.publish_pipeline(&pipeline, Utc::now());
        status.publish_reassessment(reassessor.stats(Utc::now()), Vec::new());

        Self {
            config,
            pipeline: Mutex::new(pipeline),
            reassessor: Mutex::new(reassessor),
            guard,
            status,
            bus: EventBus::new(EVENT_BUS_CAPACITY),
            archive,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn config(&self) -> &AugurConfig {
        &self.config
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Add a subsystem callback after the built-in ones.
    pub fn register_callback(&self, callback: Box<dyn ReassessmentCallback<Pipeline>>) {
        lock(&self.reassessor).register(callback);
    }

    // ---- ingestion -------------------------------------------------------

    /// Process one outcome at wall-clock time.
    pub fn process_outcome(&self, outcome: Outcome) -> TickSummary {
        self.process_outcome_at(outcome, Utc::now())
    }

    /// Process one outcome as of `now`, publish its events, refresh the board.
    pub fn process_outcome_at(&self, outcome: Outcome, now: DateTime<Utc>) -> TickSummary {
        let summary = {
            let mut pipeline = lock(&self.pipeline);
            let summary = pipeline.tick(outcome, now);
            self.status.publish_pipeline(&pipeline, now);
            summary
        };
        self.bus.publish_all(summary.events.iter().cloned());
        summary
    }

    /// Validate a raw reading at the boundary. Malformed readings are
    /// dropped, counted, and yield `None`.
    pub fn process_raw(
        &self,
        value: i64,
        category: Category,
        now: DateTime<Utc>,
    ) -> Option<TickSummary> {
        let summary = {
            let mut pipeline = lock(&self.pipeline);
            let summary = pipeline.tick_raw(value, category, now);
            self.status.publish_pipeline(&pipeline, now);
            summary
        }?;
        self.bus.publish_all(summary.events.iter().cloned());
        Some(summary)
    }

    /// Expire stale pendings and publish their results.
    pub fn expire_stale(&self, now: DateTime<Utc>) -> Vec<ValidationResult> {
        let results = {
            let mut pipeline = lock(&self.pipeline);
            let results = pipeline.expire_stale(now);
            self.status.publish_pipeline(&pipeline, now);
            results
        };
        self.bus
            .publish_all(results.iter().cloned().map(PipelineEvent::Validated));
        results
    }

    // ---- reassessment ----------------------------------------------------

    /// Run a reassessment unless one is already in flight or cooling down.
    pub fn reassess(&self, request: ReassessmentRequest, now: DateTime<Utc>) -> ReassessmentOutcome {
        // Turn away without queueing on the lock a running pass holds.
        if self.guard.is_busy() {
            self.guard.note_skip();
            debug!(trigger = %request.trigger, "reassessment skipped: already running");
            return ReassessmentOutcome::SkippedBusy;
        }
        let _span = reassessment_span!(request.trigger).entered();

        let mut reassessor = lock(&self.reassessor);
        let (outcome, deferred) = {
            let mut pipeline = lock(&self.pipeline);
            let outcome = reassessor.reassess(&mut pipeline, request, now);
            pipeline.metrics_mut().record_reassessment(
                outcome.ran(),
                matches!(outcome, ReassessmentOutcome::TimedOut(_)),
            );
            self.status.publish_pipeline(&pipeline, now);
            (outcome, pipeline.take_deferred_events())
        };
        self.status.publish_reassessment(
            reassessor.stats(now),
            reassessor.recent(SNAPSHOT_RECENT_REASSESSMENTS),
        );
        drop(reassessor);
        self.bus.publish_all(deferred);
        if let Some(event) = outcome.event() {
            info!(
                trigger = %event.trigger,
                duration_ms = event.duration_ms,
                before = event.patterns_before.len(),
                after = event.patterns_after.len(),
                failed = event.failed_callbacks.len(),
                timed_out = event.timed_out,
                "reassessment run"
            );
        }
        outcome
    }

    /// Turn a pipeline event into a reassessment request and run it.
    pub fn dispatch(&self, event: &PipelineEvent, now: DateTime<Utc>) -> ReassessmentOutcome {
        self.reassess(event.reassessment_request(), now)
    }

    // ---- workers ---------------------------------------------------------

    /// Start both workers. They stop when the source ends (ingestion) or
    /// when [`AugurRuntime::shutdown`] is called (both).
    pub fn start<S>(self: &Arc<Self>, source: S) -> WorkerHandles
    where
        S: OutcomeSource + 'static,
    {
        WorkerHandles {
            reassessment: self.spawn_reassessment(),
            ingestion: self.spawn_ingestion(source),
        }
    }

    /// Pull outcomes from `source` in arrival order until it ends or shutdown.
    pub fn spawn_ingestion<S>(self: &Arc<Self>, mut source: S) -> JoinHandle<u64>
    where
        S: OutcomeSource + 'static,
    {
        let runtime = Arc::clone(self);
        let shutdown = self.shutdown.clone();
        tokio::spawn(async move {
            info!("ingestion worker started");
            let mut processed = 0u64;
            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    next = source.next() => match next {
                        Some(outcome) => {
                            runtime.process_outcome(outcome);
                            processed += 1;
                        }
                        None => {
                            info!("outcome source closed");
                            break;
                        }
                    },
                }
            }
            info!(processed, "ingestion worker stopped");
            processed
        })
    }

    /// React to pipeline events, run the periodic trigger, and sweep stale
    /// pendings. Subscribes before returning, so no event published after
    /// this call is missed.
    pub fn spawn_reassessment(self: &Arc<Self>) -> JoinHandle<()> {
        let runtime = Arc::clone(self);
        let shutdown = self.shutdown.clone();
        let mut events = self.bus.subscribe();
        let periodic = Duration::from_secs(self.config.reassessment.interval_secs.max(1));
        let sweep = Duration::from_secs(self.config.reassessment.housekeeping_interval_secs.max(1));

        tokio::spawn(async move {
            info!(
                interval_secs = periodic.as_secs(),
                housekeeping_secs = sweep.as_secs(),
                "reassessment worker started"
            );
            let mut periodic_tick = interval_at(Instant::now() + periodic, periodic);
            periodic_tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut sweep_tick = interval_at(Instant::now() + sweep, sweep);
            sweep_tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    received = events.recv() => match received {
                        Ok(event) => {
                            runtime.dispatch(&event, Utc::now());
                        }
                        Err(EventBusError::Lagged(_)) => continue,
                        Err(EventBusError::Closed) => break,
                    },
                    _ = periodic_tick.tick() => {
                        let now = Utc::now();
                        runtime.reassess(ReassessmentRequest::time_based(now), now);
                    }
                    _ = sweep_tick.tick() => {
                        let expired = runtime.expire_stale(Utc::now());
                        if !expired.is_empty() {
                            debug!(count = expired.len(), "housekeeping expired stale predictions");
                        }
                    }
                }
            }
            info!("reassessment worker stopped");
        })
    }

    /// Stop the workers and archive the pattern store.
    pub fn shutdown(&self) -> AugurResult<()> {
        self.shutdown.cancel();
        self.archive_patterns()
    }

    /// Write the current pattern store to the archive, if one is configured.
    pub fn archive_patterns(&self) -> AugurResult<()> {
        let Some(archive) = &self.archive else {
            return Ok(());
        };
        let mut pipeline = lock(&self.pipeline);
        let patterns = pipeline.learner().store().snapshot();
        if let Err(e) = archive.save_patterns(&patterns) {
            warn!(error = %e, "pattern archive write failed");
            pipeline.record_degradation("pattern_archive", e.to_string(), Utc::now());
            self.status.publish_pipeline(&pipeline, Utc::now());
            return Err(e);
        }
        Ok(())
    }

    // ---- queries ---------------------------------------------------------
    //
    // All of these read the published snapshot and return empty values
    // rather than errors when nothing has happened yet.

    pub fn get_active_patterns(&self) -> Vec<Pattern> {
        self.status.read(|s| s.active_patterns.clone())
    }

    pub fn get_pending_predictions(&self) -> Vec<PredictionRecord> {
        self.status.read(|s| s.pending.clone())
    }

    /// Newest first, at most `limit`.
    pub fn get_recent_validations(&self, limit: usize) -> Vec<PredictionRecord> {
        self.status
            .read(|s| s.recent_validations.iter().take(limit).cloned().collect())
    }

    pub fn get_performance_stats(&self) -> PerformanceStats {
        self.status.read(|s| s.performance.clone())
    }

    pub fn get_reassessment_stats(&self) -> ReassessmentStats {
        let mut stats = self.status.read(|s| s.reassessment.clone());
        stats.is_reassessing = self.guard.is_busy();
        stats.skipped_busy = self.guard.skipped();
        stats
    }

    /// Newest first, at most `limit`.
    pub fn get_recent_reassessments(&self, limit: usize) -> Vec<ReassessmentEvent> {
        self.status
            .read(|s| s.recent_reassessments.iter().take(limit).cloned().collect())
    }

    pub fn get_learning_stats(&self) -> LearningStats {
        self.status.read(|s| s.learning.clone())
    }

    pub fn get_signal_stats(&self) -> SignalStats {
        self.status.read(|s| s.signals.clone())
    }

    pub fn get_metrics(&self) -> PipelineMetrics {
        self.status.read(|s| s.metrics.clone())
    }

    pub fn get_degradations(&self) -> Vec<TrackedDegradation> {
        self.status.read(|s| s.degradations.clone())
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        self.status.snapshot()
    }

    fn publish_pipeline(&self, now: DateTime<Utc>) {
        let pipeline = lock(&self.pipeline);
        self.status.publish_pipeline(&pipeline, now);
    }
}
