use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Category;
use crate::errors::{AugurError, AugurResult};

/// One observed result of the monitored process.
///
/// Construction validates the value range and the value/category agreement,
/// so every `Outcome` in the system is well-formed. Fields are read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawOutcome")]
pub struct Outcome {
    value: u8,
    category: Category,
    timestamp: DateTime<Utc>,
}

#[derive(Deserialize)]
struct RawOutcome {
    value: i64,
    category: Category,
    timestamp: DateTime<Utc>,
}

impl TryFrom<RawOutcome> for Outcome {
    type Error = AugurError;

    fn try_from(raw: RawOutcome) -> Result<Self, Self::Error> {
        Outcome::new(raw.value, raw.category, raw.timestamp)
    }
}

impl Outcome {
    /// Build an outcome, rejecting out-of-range values and category mismatches.
    pub fn new(value: i64, category: Category, timestamp: DateTime<Utc>) -> AugurResult<Self> {
        let expected = Category::for_value(value).ok_or_else(|| AugurError::InvalidOutcome {
            value,
            reason: "value out of range 0..=14".into(),
        })?;
        if expected != category {
            return Err(AugurError::InvalidOutcome {
                value,
                reason: format!("category {category} does not match value band {expected}"),
            });
        }
        Ok(Self {
            value: value as u8,
            category,
            timestamp,
        })
    }

    /// Build an outcome whose category is derived from the value.
    pub fn from_value(value: i64, timestamp: DateTime<Utc>) -> AugurResult<Self> {
        let category = Category::for_value(value).ok_or_else(|| AugurError::InvalidOutcome {
            value,
            reason: "value out of range 0..=14".into(),
        })?;
        Self::new(value, category, timestamp)
    }

    pub fn value(&self) -> u8 {
        self.value
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}
