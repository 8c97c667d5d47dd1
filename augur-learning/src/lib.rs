//! # augur-learning
//!
//! The adaptive learner drives the detector set against the pattern store
//! once per outcome, then merges every active pattern's guess into a single
//! next-outcome forecast.

pub mod combine;
pub mod engine;
pub mod guess;
pub mod history;

pub use combine::combine;
pub use engine::{AdaptiveLearner, RelearnReport, TickReport};
pub use guess::{guess, Guess};
pub use history::OutcomeHistory;
