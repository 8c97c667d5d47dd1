use std::collections::VecDeque;

use augur_core::Outcome;

/// Bounded rolling history. The oldest outcome is dropped when full.
#[derive(Debug, Clone)]
pub struct OutcomeHistory {
    outcomes: VecDeque<Outcome>,
    capacity: usize,
}

impl OutcomeHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            outcomes: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, outcome: Outcome) {
        if self.outcomes.len() == self.capacity {
            self.outcomes.pop_front();
        }
        self.outcomes.push_back(outcome);
    }

    /// The latest `n` outcomes, oldest first.
    pub fn recent(&self, n: usize) -> Vec<Outcome> {
        let skip = self.outcomes.len().saturating_sub(n);
        self.outcomes.iter().skip(skip).cloned().collect()
    }

    pub fn last(&self) -> Option<&Outcome> {
        self.outcomes.back()
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.outcomes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use augur_core::Category;
    use chrono::Utc;

    fn outcome(value: i64) -> Outcome {
        Outcome::from_value(value, Utc::now()).unwrap()
    }

    #[test]
    fn drops_oldest_when_full() {
        let mut history = OutcomeHistory::new(3);
        for v in [1, 9, 0, 2] {
            history.push(outcome(v));
        }
        assert_eq!(history.len(), 3);
        let cats: Vec<Category> = history.recent(10).iter().map(|o| o.category()).collect();
        assert_eq!(cats, vec![Category::B, Category::C, Category::A]);
    }

    #[test]
    fn recent_returns_tail_in_order() {
        let mut history = OutcomeHistory::new(10);
        for v in 1..=5 {
            history.push(outcome(v));
        }
        let values: Vec<u8> = history.recent(2).iter().map(|o| o.value()).collect();
        assert_eq!(values, vec![4, 5]);
    }
}
