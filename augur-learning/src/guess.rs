use augur_core::{Category, Outcome, Pattern, PatternPayload};

/// One pattern's vote for the next outcome.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Guess {
    pub category: Category,
    pub confidence: f64,
}

/// Kind-specific rule turning a pattern into a vote.
///
/// Patterns tied to the current state of the stream (runs, alternations,
/// transitions) only vote while that state still holds at `last`.
pub fn guess(pattern: &Pattern, last: Option<&Outcome>, break_length: usize) -> Option<Guess> {
    let latest = last.map(Outcome::category);
    let category = match &pattern.payload {
        PatternPayload::Sequence { category, .. } => {
            if latest != Some(*category) {
                return None;
            }
            category.opposite()
        }
        PatternPayload::Alternation {
            first,
            second,
            length,
        } => {
            let latest = latest?;
            if *length >= break_length {
                first.third(*second)?
            } else if latest == *first {
                *second
            } else if latest == *second {
                *first
            } else {
                return None;
            }
        }
        PatternPayload::Frequency { least, .. } => *least,
        PatternPayload::Interaction { from, to, .. } => {
            if latest != Some(*from) {
                return None;
            }
            *to
        }
        PatternPayload::UserDefined { predicted, .. } => *predicted,
    };
    Some(Guess {
        category,
        confidence: pattern.confidence.value(),
    })
}
