//! # augur-patterns
//!
//! Single owner of all learned [`Pattern`](augur_core::Pattern) state.
//! Detectors propose candidates; only the store mutates patterns.
//!
//! Confidence reinforcement: `min(cap, base + boost × log10(frequency + 1))`.
//! Ranking: `confidence × (0.5 + 0.5 × success_rate)`, descending.

pub mod ranking;
pub mod reinforcement;
pub mod store;

pub use ranking::{compare_rank, rank};
pub use store::{PatternStore, PruneReport, Upsert};
