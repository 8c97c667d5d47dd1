//! # augur-runtime
//!
//! Wires the learner, validator, signal combiner, and reassessor into one
//! explicit runtime context. Outcome processing is serialized behind a single
//! mutex; the reassessment scheduler takes the same lock before touching the
//! pattern store; queries read a published snapshot and never wait on either.

pub mod callbacks;
pub mod event_bus;
pub mod pipeline;
pub mod runtime;
pub mod sinks;
pub mod source;
pub mod status;

pub use callbacks::{default_callbacks, DetectorCacheCallback, HousekeepingCallback, LearnerPolicyCallback};
pub use event_bus::{EventBus, EventBusError, EventReceiver, PipelineEvent};
pub use pipeline::{Pipeline, TickSummary};
pub use runtime::{AugurRuntime, WorkerHandles};
pub use sinks::{ChannelSink, RecordingSink, TracingSink};
pub use source::ChannelSource;
pub use status::{StatusBoard, StatusSnapshot};

/// Buffered events per subscriber before the slowest one starts lagging.
pub const EVENT_BUS_CAPACITY: usize = 256;

/// Validated records kept in the published snapshot.
pub const SNAPSHOT_RECENT_VALIDATIONS: usize = 100;

/// Reassessment events kept in the published snapshot.
pub const SNAPSHOT_RECENT_REASSESSMENTS: usize = 20;
