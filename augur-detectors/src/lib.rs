//! # augur-detectors
//!
//! Each detector is a pure function of the outcome window implementing
//! [`IDetector`](augur_core::traits::IDetector). The [`DetectorSet`] runs them
//! with per-detector failure isolation and applies user-rule cooldowns.

pub mod alternation;
pub mod frequency;
pub mod interaction;
pub mod rules;
pub mod sequence;
pub mod set;

pub use alternation::AlternationDetector;
pub use frequency::FrequencyDetector;
pub use interaction::InteractionDetector;
pub use rules::{RuleCooldowns, UserRule, UserRuleDetector};
pub use sequence::SequenceDetector;
pub use set::{DetectionRun, DetectorFailureReport, DetectorSet, RunMode};
