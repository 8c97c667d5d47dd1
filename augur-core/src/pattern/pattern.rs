use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Confidence, PatternCandidate, PatternKind, PatternPayload};

/// A learned structural regularity with its confidence and track record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    pub id: String,
    pub payload: PatternPayload,
    pub description: String,
    pub confidence: Confidence,
    pub frequency: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
    pub total_predictions: u32,
    pub correct_predictions: u32,
    pub success_rate: f64,
}

impl Pattern {
    /// Materialize a candidate as a fresh pattern.
    pub fn from_candidate(
        id: String,
        candidate: &PatternCandidate,
        confidence: Confidence,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            payload: candidate.payload.clone(),
            description: candidate.description.clone(),
            confidence,
            frequency: candidate.frequency,
            created_at: now,
            updated_at: now,
            last_seen_at: now,
            total_predictions: 0,
            correct_predictions: 0,
            success_rate: 0.0,
        }
    }

    pub fn kind(&self) -> PatternKind {
        self.payload.kind()
    }

    pub fn key(&self) -> String {
        self.payload.key()
    }

    /// Ranking weight: `confidence × (0.5 + 0.5 × success_rate)`.
    pub fn rank_weight(&self) -> f64 {
        self.confidence.value() * (0.5 + 0.5 * self.success_rate)
    }

    /// Fold one validated prediction into the track record.
    pub fn record_prediction(&mut self, was_correct: bool, now: DateTime<Utc>) {
        self.total_predictions = self.total_predictions.saturating_add(1);
        if was_correct {
            self.correct_predictions = self.correct_predictions.saturating_add(1);
        }
        self.success_rate = if self.total_predictions == 0 {
            0.0
        } else {
            f64::from(self.correct_predictions) / f64::from(self.total_predictions)
        };
        self.updated_at = now;
    }
}
