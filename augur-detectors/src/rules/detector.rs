use chrono::Duration;
use tracing::info;

use augur_core::config::RuleDefinition;
use augur_core::errors::AugurResult;
use augur_core::traits::IDetector;
use augur_core::{Outcome, PatternCandidate, PatternKind, PatternPayload};

use super::rule::UserRule;
use super::trigger;

/// Evaluates the configured user rules. Detection itself is pure; the
/// cooldown filter lives in the owning [`DetectorSet`](crate::DetectorSet).
#[derive(Debug, Clone)]
pub struct UserRuleDetector {
    rules: Vec<UserRule>,
    default_cooldown: Duration,
}

impl UserRuleDetector {
    pub fn new(definitions: &[RuleDefinition], default_cooldown: Duration) -> Self {
        Self {
            rules: definitions.iter().cloned().map(UserRule::new).collect(),
            default_cooldown,
        }
    }

    pub fn rules(&self) -> &[UserRule] {
        &self.rules
    }

    pub fn rule(&self, rule_id: &str) -> Option<&UserRule> {
        self.rules.iter().find(|r| r.id() == rule_id)
    }

    /// Cooldown for `rule_id`, falling back to the default.
    pub fn cooldown_for(&self, rule_id: &str) -> Duration {
        self.rule(rule_id)
            .and_then(|r| r.definition.cooldown_secs)
            .map(|secs| Duration::seconds(secs as i64))
            .unwrap_or(self.default_cooldown)
    }

    /// Fold a validated prediction into the rule's track record.
    /// Returns false when no rule has that id.
    pub fn record_outcome(&mut self, rule_id: &str, was_correct: bool) -> bool {
        match self.rules.iter_mut().find(|r| r.id() == rule_id) {
            Some(rule) => {
                rule.record(was_correct);
                true
            }
            None => false,
        }
    }

    /// Add or replace a rule by id.
    pub fn upsert_rule(&mut self, definition: RuleDefinition) {
        match self.rules.iter_mut().find(|r| r.id() == definition.id) {
            Some(existing) => existing.definition = definition,
            None => self.rules.push(UserRule::new(definition)),
        }
    }

    pub fn remove_rule(&mut self, rule_id: &str) -> bool {
        let before = self.rules.len();
        self.rules.retain(|r| r.id() != rule_id);
        self.rules.len() != before
    }

    /// Serialize every rule with its track record.
    pub fn export_json(&self) -> AugurResult<String> {
        Ok(serde_json::to_string_pretty(&self.rules)?)
    }

    /// Merge rules from JSON; imported rules replace ones with the same id.
    pub fn import_json(&mut self, json: &str) -> AugurResult<usize> {
        let imported: Vec<UserRule> = serde_json::from_str(json)?;
        let count = imported.len();
        for rule in imported {
            match self.rules.iter_mut().find(|r| r.id() == rule.id()) {
                Some(existing) => *existing = rule,
                None => self.rules.push(rule),
            }
        }
        info!(count, "user rules imported");
        Ok(count)
    }
}

impl IDetector for UserRuleDetector {
    fn name(&self) -> &str {
        "user_rules"
    }

    fn kind(&self) -> PatternKind {
        PatternKind::UserDefined
    }

    fn detect(&self, window: &[Outcome]) -> AugurResult<Vec<PatternCandidate>> {
        Ok(self
            .rules
            .iter()
            .filter(|r| r.definition.enabled && trigger::matches(&r.definition.trigger, window))
            .map(|r| {
                let label = if r.definition.name.is_empty() {
                    r.id()
                } else {
                    r.definition.name.as_str()
                };
                PatternCandidate::new(
                    PatternPayload::UserDefined {
                        rule_id: r.id().to_string(),
                        predicted: r.definition.predicted,
                    },
                    r.confidence(),
                    1,
                    format!("rule {label} matched, expecting {}", r.definition.predicted),
                )
            })
            .collect())
    }
}
