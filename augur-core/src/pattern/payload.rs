use serde::{Deserialize, Serialize};

use super::PatternKind;
use crate::outcome::Category;

/// Kind-specific pattern body. The variant determines the [`PatternKind`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PatternPayload {
    /// A run of identical categories.
    Sequence { category: Category, run_length: usize },
    /// A strict two-category alternation, `first` being the older member.
    Alternation {
        first: Category,
        second: Category,
        length: usize,
    },
    /// An over-represented category within the frequency window.
    Frequency {
        dominant: Category,
        least: Category,
        cold: Vec<Category>,
        share: f64,
    },
    /// A `from -> to` transition with a high conditional probability.
    Interaction {
        from: Category,
        to: Category,
        count: usize,
        probability: f64,
    },
    /// A declarative rule loaded from configuration.
    UserDefined { rule_id: String, predicted: Category },
}

impl PatternPayload {
    pub fn kind(&self) -> PatternKind {
        match self {
            PatternPayload::Sequence { .. } => PatternKind::Sequence,
            PatternPayload::Alternation { .. } => PatternKind::Alternation,
            PatternPayload::Frequency { .. } => PatternKind::Frequency,
            PatternPayload::Interaction { .. } => PatternKind::Interaction,
            PatternPayload::UserDefined { .. } => PatternKind::UserDefined,
        }
    }

    /// Identity of the pattern within its kind. Two payloads with the same key
    /// describe the same structure observed at different moments.
    pub fn key(&self) -> String {
        let prefix = self.kind().prefix();
        match self {
            PatternPayload::Sequence { category, .. } => format!("{prefix}:{category}"),
            PatternPayload::Alternation { first, second, .. } => {
                // The pair is unordered: A-B and B-A are the same alternation.
                let (lo, hi) = if first <= second {
                    (first, second)
                } else {
                    (second, first)
                };
                format!("{prefix}:{lo}{hi}")
            }
            PatternPayload::Frequency { dominant, .. } => format!("{prefix}:{dominant}"),
            PatternPayload::Interaction { from, to, .. } => format!("{prefix}:{from}{to}"),
            PatternPayload::UserDefined { rule_id, .. } => format!("{prefix}:{rule_id}"),
        }
    }
}
