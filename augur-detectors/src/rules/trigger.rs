use augur_core::config::RuleTrigger;
use augur_core::Outcome;

/// Evaluate a trigger against the window (oldest first).
/// Windows shorter than the trigger needs never match.
pub fn matches(trigger: &RuleTrigger, window: &[Outcome]) -> bool {
    if window.len() < trigger.min_window() {
        return false;
    }
    match trigger {
        RuleTrigger::CategoryStreak { category, length } => window
            .iter()
            .rev()
            .take(*length)
            .all(|o| o.category() == *category),
        RuleTrigger::CategorySequence { sequence } => {
            let tail = &window[window.len() - sequence.len()..];
            tail.iter().zip(sequence).all(|(o, c)| o.category() == *c)
        }
        RuleTrigger::CategoryAfterCategory {
            first,
            second,
            occurrences,
        } => {
            count_pairs(window, |a, b| a.category() == *first && b.category() == *second)
                >= *occurrences
        }
        RuleTrigger::ValueSequence { sequence } => {
            let tail = &window[window.len() - sequence.len()..];
            tail.iter().zip(sequence).all(|(o, v)| o.value() == *v)
        }
        RuleTrigger::ValueAfterValue {
            first,
            second,
            occurrences,
        } => count_pairs(window, |a, b| a.value() == *first && b.value() == *second) >= *occurrences,
        RuleTrigger::ValueFollowedBy {
            value,
            category,
            occurrences,
        } => {
            count_pairs(window, |a, b| a.value() == *value && b.category() == *category)
                >= *occurrences
        }
        RuleTrigger::ValueDelay {
            value,
            delay,
            occurrences,
        } => {
            let settled = window.len().saturating_sub(*delay);
            let seen = window[..settled]
                .iter()
                .filter(|o| o.value() == *value)
                .count();
            seen >= *occurrences
        }
    }
}

/// Adjacent `(earlier, later)` pairs satisfying `pred`.
fn count_pairs(window: &[Outcome], pred: impl Fn(&Outcome, &Outcome) -> bool) -> usize {
    window
        .windows(2)
        .filter(|pair| pred(&pair[0], &pair[1]))
        .count()
}
