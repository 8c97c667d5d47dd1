use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

/// Last firing time per rule. A rule inside its cooldown may not fire again.
#[derive(Debug, Clone, Default)]
pub struct RuleCooldowns {
    last_fired: HashMap<String, DateTime<Utc>>,
}

impl RuleCooldowns {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when `rule_id` has not fired within `cooldown` of `now`.
    pub fn is_ready(&self, rule_id: &str, cooldown: Duration, now: DateTime<Utc>) -> bool {
        match self.last_fired.get(rule_id) {
            Some(last) => now - *last >= cooldown,
            None => true,
        }
    }

    pub fn mark_fired(&mut self, rule_id: &str, now: DateTime<Utc>) {
        self.last_fired.insert(rule_id.to_string(), now);
    }

    pub fn last_fired(&self, rule_id: &str) -> Option<DateTime<Utc>> {
        self.last_fired.get(rule_id).copied()
    }

    pub fn clear(&mut self) {
        self.last_fired.clear();
    }
}
