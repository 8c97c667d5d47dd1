use super::StorageError;

/// Top-level error type for the Augur engine.
#[derive(Debug, thiserror::Error)]
pub enum AugurError {
    #[error("invalid outcome (value {value}): {reason}")]
    InvalidOutcome { value: i64, reason: String },

    #[error("detector {detector} failed: {reason}")]
    DetectorFailure { detector: String, reason: String },

    #[error("reassessment exceeded its budget: {elapsed_ms}ms > {budget_ms}ms")]
    ReassessmentTimeout { elapsed_ms: u64, budget_ms: u64 },

    #[error("persistence failure: {0}")]
    PersistenceFailure(#[from] StorageError),

    #[error("pattern not found: {id}")]
    PatternNotFound { id: String },

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("degraded mode: {component} using {fallback}")]
    DegradedMode { component: String, fallback: String },
}

pub type AugurResult<T> = Result<T, AugurError>;
