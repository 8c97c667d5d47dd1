//! # augur-signals
//!
//! Decides whether the learner's combined prediction becomes an alert.
//! Accepted predictions are registered with the validator and forwarded to
//! the alert sink; everything else is suppressed with an explicit reason.

pub mod combiner;
pub mod decision;
pub mod thresholds;

pub use combiner::{SignalCombiner, SignalStats};
pub use decision::{SignalDecision, Suppression};
pub use thresholds::AdaptiveThresholds;
