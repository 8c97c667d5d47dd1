use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ReassessmentTrigger;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReassessmentStats {
    pub total: u64,
    pub recent_24h: usize,
    pub trigger_counts: BTreeMap<ReassessmentTrigger, u64>,
    pub average_duration_ms: f64,
    pub is_reassessing: bool,
    pub last_reassessment: Option<DateTime<Utc>>,
    pub skipped_cooldown: u64,
    pub skipped_busy: u64,
    pub timed_out: u64,
    pub registered_callbacks: usize,
}
