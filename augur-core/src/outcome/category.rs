use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{LOW_BAND_MAX, OUTCOME_VALUE_MAX, OUTCOME_VALUE_MIN};
use crate::errors::AugurError;

/// The three outcome categories.
///
/// `A` covers the low band (1..=7), `B` the high band (8..=14) and `C` the
/// single zero value. Enum order is the deterministic tie-break order used by
/// every detector and by the combined prediction.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Category {
    A,
    B,
    C,
}

impl Category {
    /// All categories in tie-break order.
    pub const ALL: [Category; 3] = [Category::A, Category::B, Category::C];

    /// Mean-reversion counterpart. A and B mirror each other; C reverts to A.
    pub fn opposite(self) -> Self {
        match self {
            Category::A => Category::B,
            Category::B => Category::A,
            Category::C => Category::A,
        }
    }

    /// The category that is neither `self` nor `other`.
    /// Returns `None` when both are the same category.
    pub fn third(self, other: Category) -> Option<Category> {
        if self == other {
            return None;
        }
        Self::ALL.into_iter().find(|c| *c != self && *c != other)
    }

    /// Map a raw outcome value to its category.
    pub fn for_value(value: i64) -> Option<Self> {
        if value < i64::from(OUTCOME_VALUE_MIN) || value > i64::from(OUTCOME_VALUE_MAX) {
            return None;
        }
        Some(match value {
            0 => Category::C,
            v if v <= i64::from(LOW_BAND_MAX) => Category::A,
            _ => Category::B,
        })
    }

    /// Position in [`Category::ALL`].
    pub fn index(self) -> usize {
        match self {
            Category::A => 0,
            Category::B => 1,
            Category::C => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::A => "A",
            Category::B => "B",
            Category::C => "C",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = AugurError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "A" | "a" => Ok(Category::A),
            "B" | "b" => Ok(Category::B),
            "C" | "c" => Ok(Category::C),
            other => Err(AugurError::ConfigError(format!(
                "unknown category '{other}'"
            ))),
        }
    }
}
