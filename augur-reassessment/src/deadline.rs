use std::time::{Duration, Instant};

use augur_core::errors::AugurError;

/// The time a reassessment run may take, handed to every callback so long
/// work can stop early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    started: Instant,
    budget: Duration,
}

impl Deadline {
    pub fn new(started: Instant, budget: Duration) -> Self {
        Self { started, budget }
    }

    /// A deadline starting now.
    pub fn after(budget: Duration) -> Self {
        Self::new(Instant::now(), budget)
    }

    pub fn at(&self) -> Instant {
        self.started + self.budget
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn remaining(&self) -> Duration {
        self.budget.saturating_sub(self.elapsed())
    }

    pub fn is_expired(&self) -> bool {
        self.elapsed() > self.budget
    }

    /// The error a callback returns when it stopped because time ran out.
    pub fn timeout_error(&self) -> AugurError {
        AugurError::ReassessmentTimeout {
            elapsed_ms: self.elapsed().as_millis() as u64,
            budget_ms: self.budget.as_millis() as u64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_budget_expires_immediately() {
        let deadline = Deadline::after(Duration::ZERO);
        std::thread::sleep(Duration::from_millis(1));
        assert!(deadline.is_expired());
        assert_eq!(deadline.remaining(), Duration::ZERO);
        assert!(matches!(
            deadline.timeout_error(),
            AugurError::ReassessmentTimeout { budget_ms: 0, .. }
        ));
    }

    #[test]
    fn generous_budget_has_time_left() {
        let deadline = Deadline::after(Duration::from_secs(60));
        assert!(!deadline.is_expired());
        assert!(deadline.remaining() > Duration::from_secs(50));
        assert!(deadline.at() > Instant::now());
    }
}
