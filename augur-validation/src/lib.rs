//! # augur-validation
//!
//! Owns every emitted prediction from creation to its single terminal
//! transition: `Pending -> Correct | Incorrect | Expired`.

pub mod engine;
pub mod gate;
pub mod performance;
pub mod request;

pub use engine::PredictionValidator;
pub use performance::{PerformanceDrop, PerformanceMonitor};
pub use request::NewPrediction;
