use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::outcome::Category;

/// A recommendation handed to the alert boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub prediction_id: String,
    pub category: Category,
    pub confidence: f64,
    pub reasoning: String,
    pub pattern_id: String,
    pub timestamp: DateTime<Utc>,
}
