use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{PredictionRecord, PredictionStatus};
use crate::outcome::Category;
use crate::pattern::PatternKind;

/// Resolution of one pending prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub prediction_id: String,
    pub pattern_id: String,
    pub pattern_kind: Option<PatternKind>,
    pub predicted: Category,
    /// `None` for expired predictions, which are never compared.
    pub actual: Option<Category>,
    pub status: PredictionStatus,
    pub confidence: f64,
    /// Time between creation and resolution.
    pub validation_delay_ms: i64,
    pub validated_at: DateTime<Utc>,
}

impl ValidationResult {
    /// Build a result from a record that has just reached a terminal status.
    pub fn from_record(record: &PredictionRecord, validated_at: DateTime<Utc>) -> Self {
        Self {
            prediction_id: record.id.clone(),
            pattern_id: record.pattern_id.clone(),
            pattern_kind: record.pattern_kind,
            predicted: record.predicted,
            actual: record.actual,
            status: record.status,
            confidence: record.confidence,
            validation_delay_ms: (validated_at - record.created_at).num_milliseconds(),
            validated_at,
        }
    }

    pub fn is_correct(&self) -> bool {
        self.status == PredictionStatus::Correct
    }

    /// Correct or incorrect: the prediction was compared against an outcome.
    pub fn was_compared(&self) -> bool {
        matches!(
            self.status,
            PredictionStatus::Correct | PredictionStatus::Incorrect
        )
    }
}
