use serde::{Deserialize, Serialize};

/// Why the validator refused a prediction. A normal control-flow result,
/// returned to the caller rather than logged as a failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum RejectionReason {
    #[error("confidence {confidence:.3} below threshold {threshold:.3}")]
    LowConfidence { confidence: f64, threshold: f64 },

    #[error("{pending} predictions pending (max {max})")]
    TooManyPending { pending: usize, max: usize },
}
