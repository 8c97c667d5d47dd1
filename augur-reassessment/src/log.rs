use std::collections::VecDeque;

use chrono::{DateTime, Duration, Utc};

use augur_core::constants::RECENT_REASSESSMENT_HOURS;
use augur_core::models::ReassessmentEvent;

/// Fixed-capacity ring of reassessment events; the oldest falls off first.
#[derive(Debug, Clone)]
pub struct EventLog {
    events: VecDeque<ReassessmentEvent>,
    capacity: usize,
}

impl EventLog {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            events: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, event: ReassessmentEvent) {
        if self.events.len() == self.capacity {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    /// Latest events, newest first.
    pub fn recent(&self, limit: usize) -> Vec<ReassessmentEvent> {
        self.events.iter().rev().take(limit).cloned().collect()
    }

    /// Events within the last day relative to `now`.
    pub fn count_recent(&self, now: DateTime<Utc>) -> usize {
        let since = now - Duration::hours(RECENT_REASSESSMENT_HOURS);
        self.events.iter().filter(|e| e.timestamp > since).count()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
