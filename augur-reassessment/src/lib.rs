//! # augur-reassessment
//!
//! Re-examines learned state when something meaningful happens: a prediction
//! resolves, a pattern breaks, a new run starts, accuracy drops, or the
//! periodic timer fires. Each run invokes the registered callbacks against
//! the subject under a cooldown, a single-flight guard, and a duration budget,
//! and leaves a [`ReassessmentEvent`](augur_core::models::ReassessmentEvent)
//! behind for auditing.

pub mod callback;
pub mod deadline;
pub mod engine;
pub mod log;
pub mod request;

pub use callback::{from_fn, FnCallback, PatternIds, ReassessmentCallback};
pub use deadline::Deadline;
pub use engine::{PatternReassessor, ReassessmentOutcome, RunGuard};
pub use log::EventLog;
pub use request::ReassessmentRequest;
