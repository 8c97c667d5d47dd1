use std::fmt;

use serde::{Deserialize, Serialize};

/// The closed set of pattern families. Every match over this enum is
/// exhaustive, so adding a family forces every rule table to be updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    Sequence,
    Alternation,
    Frequency,
    Interaction,
    UserDefined,
}

impl PatternKind {
    pub const ALL: [PatternKind; 5] = [
        PatternKind::Sequence,
        PatternKind::Alternation,
        PatternKind::Frequency,
        PatternKind::Interaction,
        PatternKind::UserDefined,
    ];

    /// Short prefix used in pattern ids and payload keys.
    pub fn prefix(self) -> &'static str {
        match self {
            PatternKind::Sequence => "seq",
            PatternKind::Alternation => "alt",
            PatternKind::Frequency => "freq",
            PatternKind::Interaction => "int",
            PatternKind::UserDefined => "rule",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PatternKind::Sequence => "sequence",
            PatternKind::Alternation => "alternation",
            PatternKind::Frequency => "frequency",
            PatternKind::Interaction => "interaction",
            PatternKind::UserDefined => "user_defined",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == s)
    }
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
