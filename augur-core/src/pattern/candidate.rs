use serde::{Deserialize, Serialize};

use super::{PatternKind, PatternPayload};

/// A detector's proposal. The pattern store decides whether it becomes a
/// new pattern, refreshes an existing one, or is dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternCandidate {
    pub payload: PatternPayload,
    /// Detector-computed base confidence, before frequency reinforcement.
    pub base_confidence: f64,
    /// Observations in the window supporting this structure.
    pub frequency: u32,
    pub description: String,
}

impl PatternCandidate {
    pub fn new(
        payload: PatternPayload,
        base_confidence: f64,
        frequency: u32,
        description: impl Into<String>,
    ) -> Self {
        Self {
            payload,
            base_confidence,
            frequency,
            description: description.into(),
        }
    }

    pub fn kind(&self) -> PatternKind {
        self.payload.kind()
    }

    pub fn key(&self) -> String {
        self.payload.key()
    }
}
