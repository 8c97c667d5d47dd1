use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::outcome::Category;
use crate::pattern::PatternKind;

/// Lifecycle state of an emitted prediction. Everything but `Pending` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionStatus {
    Pending,
    Correct,
    Incorrect,
    Expired,
}

impl PredictionStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, PredictionStatus::Pending)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PredictionStatus::Pending => "pending",
            PredictionStatus::Correct => "correct",
            PredictionStatus::Incorrect => "incorrect",
            PredictionStatus::Expired => "expired",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(PredictionStatus::Pending),
            "correct" => Some(PredictionStatus::Correct),
            "incorrect" => Some(PredictionStatus::Incorrect),
            "expired" => Some(PredictionStatus::Expired),
            _ => None,
        }
    }
}

/// A single forecast tracked by the validator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub id: String,
    pub predicted: Category,
    pub confidence: f64,
    pub pattern_id: String,
    /// Kind of the producing pattern, used to attribute accuracy per kind.
    pub pattern_kind: Option<PatternKind>,
    pub reasoning: String,
    pub created_at: DateTime<Utc>,
    pub status: PredictionStatus,
    pub actual: Option<Category>,
    pub validated_at: Option<DateTime<Utc>>,
}
