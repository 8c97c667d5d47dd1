use serde::{Deserialize, Serialize};

use augur_core::config::RuleDefinition;

const MIN_RULE_CONFIDENCE: f64 = 0.5;
const MAX_RULE_CONFIDENCE: f64 = 0.95;

/// A rule definition plus its observed track record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRule {
    pub definition: RuleDefinition,
    #[serde(default)]
    pub successes: u32,
    #[serde(default)]
    pub failures: u32,
}

impl UserRule {
    pub fn new(definition: RuleDefinition) -> Self {
        Self {
            definition,
            successes: 0,
            failures: 0,
        }
    }

    pub fn id(&self) -> &str {
        &self.definition.id
    }

    /// Success rate clamped to `[0.5, 0.95]`, or the configured threshold
    /// while the rule is untried.
    pub fn confidence(&self) -> f64 {
        let total = self.successes + self.failures;
        if total == 0 {
            return self.definition.confidence_threshold;
        }
        (f64::from(self.successes) / f64::from(total)).clamp(MIN_RULE_CONFIDENCE, MAX_RULE_CONFIDENCE)
    }

    pub fn record(&mut self, was_correct: bool) {
        if was_correct {
            self.successes = self.successes.saturating_add(1);
        } else {
            self.failures = self.failures.saturating_add(1);
        }
    }
}
