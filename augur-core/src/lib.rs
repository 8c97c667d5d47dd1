//! # augur-core
//!
//! Foundation crate for the Augur adaptive pattern engine.
//! Defines the outcome and pattern model, prediction lifecycle records,
//! errors, config, constants, and the traits at every external seam.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod outcome;
pub mod pattern;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::AugurConfig;
pub use errors::{AugurError, AugurResult};
pub use outcome::{Category, Outcome};
pub use pattern::{Confidence, Pattern, PatternCandidate, PatternKind, PatternPayload};
