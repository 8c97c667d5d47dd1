//! Degradation history: component, failure, fallback used, timestamp, recovery status.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use augur_core::models::DegradationEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecoveryStatus {
    /// Still running on the fallback.
    Active,
    Recovered,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedDegradation {
    pub event: DegradationEvent,
    pub recovery_status: RecoveryStatus,
    pub recovered_at: Option<DateTime<Utc>>,
}

/// Tracks degradation events reported by the validator, storage, and detectors.
///
/// Recording the same component twice while it is still active is a no-op,
/// so a store that fails on every write produces one entry, not thousands.
#[derive(Debug, Clone, Default)]
pub struct DegradationTracker {
    events: Vec<TrackedDegradation>,
}

impl DegradationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a degradation. Returns false if the component was already degraded.
    pub fn record(&mut self, event: DegradationEvent) -> bool {
        if self.is_degraded(&event.component) {
            return false;
        }
        warn!(
            component = %event.component,
            failure = %event.failure,
            fallback = %event.fallback_used,
            "degradation triggered"
        );
        self.events.push(TrackedDegradation {
            event,
            recovery_status: RecoveryStatus::Active,
            recovered_at: None,
        });
        true
    }

    /// Mark the latest active degradation of `component` as recovered.
    pub fn mark_recovered(&mut self, component: &str, now: DateTime<Utc>) -> bool {
        let Some(tracked) = self.events.iter_mut().rev().find(|t| {
            t.event.component == component && t.recovery_status == RecoveryStatus::Active
        }) else {
            return false;
        };
        tracked.recovery_status = RecoveryStatus::Recovered;
        tracked.recovered_at = Some(now);
        info!(component, "component recovered");
        true
    }

    pub fn is_degraded(&self, component: &str) -> bool {
        self.events.iter().any(|t| {
            t.event.component == component && t.recovery_status == RecoveryStatus::Active
        })
    }

    pub fn events(&self) -> &[TrackedDegradation] {
        &self.events
    }

    pub fn active_degradations(&self) -> Vec<&TrackedDegradation> {
        self.events
            .iter()
            .filter(|t| t.recovery_status == RecoveryStatus::Active)
            .collect()
    }

    /// Events for `component` newer than `window` before `now`.
    pub fn count_recent(&self, component: &str, window: Duration, now: DateTime<Utc>) -> usize {
        let cutoff = now - window;
        self.events
            .iter()
            .filter(|t| t.event.component == component && t.event.timestamp > cutoff)
            .count()
    }

    /// How long `component` has been continuously degraded, or None if healthy.
    pub fn degraded_duration(&self, component: &str, now: DateTime<Utc>) -> Option<Duration> {
        let earliest = self
            .events
            .iter()
            .filter(|t| {
                t.event.component == component && t.recovery_status == RecoveryStatus::Active
            })
            .map(|t| t.event.timestamp)
            .min()?;
        Some(now - earliest)
    }
}
