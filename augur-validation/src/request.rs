use augur_core::models::CombinedPrediction;
use augur_core::{Category, PatternKind};

/// Arguments of `add_prediction`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPrediction {
    pub category: Category,
    pub confidence: f64,
    pub pattern_id: String,
    pub pattern_kind: Option<PatternKind>,
    pub reasoning: String,
}

impl NewPrediction {
    pub fn new(
        category: Category,
        confidence: f64,
        pattern_id: impl Into<String>,
        reasoning: impl Into<String>,
    ) -> Self {
        Self {
            category,
            confidence,
            pattern_id: pattern_id.into(),
            pattern_kind: None,
            reasoning: reasoning.into(),
        }
    }

    pub fn with_kind(mut self, kind: PatternKind) -> Self {
        self.pattern_kind = Some(kind);
        self
    }
}

impl From<&CombinedPrediction> for NewPrediction {
    fn from(prediction: &CombinedPrediction) -> Self {
        Self {
            category: prediction.category,
            confidence: prediction.confidence,
            pattern_id: prediction.pattern_id.clone(),
            pattern_kind: prediction.pattern_kind,
            reasoning: prediction.reasoning.clone(),
        }
    }
}
