use serde::{Deserialize, Serialize};

use super::defaults;
use crate::outcome::Category;

/// A declarative user rule, loaded from `[[rules]]` tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleDefinition {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub trigger: RuleTrigger,
    /// Category the rule predicts when its trigger matches.
    pub predicted: Category,
    /// Confidence reported while the rule has no track record.
    #[serde(default = "default_rule_confidence")]
    pub confidence_threshold: f64,
    /// Per-rule cooldown override (seconds).
    #[serde(default)]
    pub cooldown_secs: Option<u64>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_rule_confidence() -> f64 {
    defaults::DEFAULT_RULE_CONFIDENCE_THRESHOLD
}

fn default_enabled() -> bool {
    true
}

/// Predicate over the outcome window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuleTrigger {
    /// The latest `length` outcomes are all `category`.
    CategoryStreak { category: Category, length: usize },
    /// The window ends with exactly this category sequence.
    CategorySequence { sequence: Vec<Category> },
    /// The window ends with exactly this value sequence.
    ValueSequence { sequence: Vec<u8> },
    /// `first` was immediately followed by `second` at least `occurrences`
    /// times anywhere in the window.
    CategoryAfterCategory {
        first: Category,
        second: Category,
        occurrences: usize,
    },
    /// Value `first` was immediately followed by value `second` at least
    /// `occurrences` times.
    ValueAfterValue {
        first: u8,
        second: u8,
        occurrences: usize,
    },
    /// `value` was immediately followed by an outcome of `category` at least
    /// `occurrences` times.
    ValueFollowedBy {
        value: u8,
        category: Category,
        occurrences: usize,
    },
    /// `value` appeared at least `occurrences` times with `delay` or more
    /// outcomes after it.
    ValueDelay {
        value: u8,
        delay: usize,
        occurrences: usize,
    },
}

impl RuleTrigger {
    /// Outcomes the trigger needs before it can match.
    pub fn min_window(&self) -> usize {
        match self {
            RuleTrigger::CategoryStreak { length, .. } => *length,
            RuleTrigger::CategorySequence { sequence } => sequence.len(),
            RuleTrigger::ValueSequence { sequence } => sequence.len(),
            RuleTrigger::CategoryAfterCategory { occurrences, .. }
            | RuleTrigger::ValueAfterValue { occurrences, .. }
            | RuleTrigger::ValueFollowedBy { occurrences, .. } => {
                if *occurrences == 0 {
                    0
                } else {
                    occurrences + 1
                }
            }
            RuleTrigger::ValueDelay {
                delay, occurrences, ..
            } => {
                if *occurrences == 0 {
                    0
                } else {
                    occurrences + delay
                }
            }
        }
    }

    /// Outcome values the trigger refers to.
    pub fn values(&self) -> Vec<u8> {
        match self {
            RuleTrigger::ValueSequence { sequence } => sequence.clone(),
            RuleTrigger::ValueAfterValue { first, second, .. } => vec![*first, *second],
            RuleTrigger::ValueFollowedBy { value, .. } | RuleTrigger::ValueDelay { value, .. } => {
                vec![*value]
            }
            RuleTrigger::CategoryStreak { .. }
            | RuleTrigger::CategorySequence { .. }
            | RuleTrigger::CategoryAfterCategory { .. } => Vec::new(),
        }
    }
}
