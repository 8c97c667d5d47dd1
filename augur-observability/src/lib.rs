//! # augur-observability
//!
//! Tracing subscriber setup, span helpers, pipeline counters, and the
//! degradation tracker.

pub mod degradation;
pub mod metrics;
pub mod tracing_setup;

pub use degradation::{DegradationTracker, RecoveryStatus, TrackedDegradation};
pub use metrics::PipelineMetrics;
pub use tracing_setup::init_tracing;
