use serde::{Deserialize, Serialize};

use crate::constants::{
    COMBINED_PATTERN_ID, DEFAULT_PREDICTION_CONFIDENCE, DEFAULT_PREDICTION_REASONING,
};
use crate::outcome::Category;
use crate::pattern::PatternKind;

/// Weighted score accumulated for one category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub category: Category,
    pub score: f64,
}

/// The learner's next-outcome forecast, merged across all active patterns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedPrediction {
    pub category: Category,
    pub confidence: f64,
    pub reasoning: String,
    /// Highest-weighted pattern backing the winning category.
    pub pattern_id: String,
    pub pattern_kind: Option<PatternKind>,
    /// Every pattern that voted for the winning category.
    pub contributing: Vec<String>,
    pub scores: Vec<CategoryScore>,
    /// True when no pattern was active and this is the neutral result.
    pub is_default: bool,
}

impl CombinedPrediction {
    /// Neutral result used when no pattern clears the confidence threshold.
    pub fn neutral() -> Self {
        Self {
            category: Category::A,
            confidence: DEFAULT_PREDICTION_CONFIDENCE,
            reasoning: DEFAULT_PREDICTION_REASONING.to_string(),
            pattern_id: COMBINED_PATTERN_ID.to_string(),
            pattern_kind: None,
            contributing: Vec::new(),
            scores: Category::ALL
                .iter()
                .map(|c| CategoryScore {
                    category: *c,
                    score: DEFAULT_PREDICTION_CONFIDENCE,
                })
                .collect(),
            is_default: true,
        }
    }
}
