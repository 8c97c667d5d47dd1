use serde::{Deserialize, Serialize};

use augur_core::models::{RejectionReason, Signal};
use augur_core::{Category, PatternKind};

/// Why a combined prediction did not become an alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Suppression {
    #[error("no active pattern; neutral prediction is never signalled")]
    DefaultPrediction,

    #[error("{category} already signalled {elapsed_secs}s ago (cooldown {cooldown_secs}s)")]
    Duplicate {
        category: Category,
        elapsed_secs: i64,
        cooldown_secs: u64,
    },

    #[error("{kind} threshold {threshold:.3} not met by {confidence:.3}")]
    BelowKindThreshold {
        kind: PatternKind,
        confidence: f64,
        threshold: f64,
    },

    #[error("{pending} prediction(s) still outstanding")]
    Outstanding { pending: usize },

    #[error("confidence {confidence:.3} below the current alert bar")]
    AlertBar { confidence: f64 },

    #[error("validator rejected prediction: {0}")]
    Rejected(RejectionReason),
}

impl Suppression {
    /// Stable label used for counters and log fields.
    pub fn label(&self) -> &'static str {
        match self {
            Suppression::DefaultPrediction => "default_prediction",
            Suppression::Duplicate { .. } => "duplicate",
            Suppression::BelowKindThreshold { .. } => "below_kind_threshold",
            Suppression::Outstanding { .. } => "outstanding",
            Suppression::AlertBar { .. } => "alert_bar",
            Suppression::Rejected(_) => "rejected",
        }
    }
}

/// Result of offering one combined prediction.
#[derive(Debug, Clone, PartialEq)]
pub enum SignalDecision {
    /// Registered with the validator and handed to the sink. `delivered` is
    /// false when the sink returned an error; the prediction stays pending.
    Emitted { signal: Signal, delivered: bool },
    Suppressed(Suppression),
}

impl SignalDecision {
    pub fn signal(&self) -> Option<&Signal> {
        match self {
            SignalDecision::Emitted { signal, .. } => Some(signal),
            SignalDecision::Suppressed(_) => None,
        }
    }

    pub fn suppression(&self) -> Option<&Suppression> {
        match self {
            SignalDecision::Suppressed(s) => Some(s),
            SignalDecision::Emitted { .. } => None,
        }
    }

    pub fn is_emitted(&self) -> bool {
        self.signal().is_some()
    }
}
