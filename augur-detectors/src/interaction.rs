use augur_core::config::DetectorConfig;
use augur_core::errors::AugurResult;
use augur_core::traits::IDetector;
use augur_core::{Category, Outcome, PatternCandidate, PatternKind, PatternPayload};

/// Transition statistics: `category[i] -> category[i + 1]`.
///
/// A pair seen at least `min_count` times whose conditional probability
/// `P(to | from)` reaches the threshold becomes a candidate.
#[derive(Debug, Clone)]
pub struct InteractionDetector {
    min_samples: usize,
    min_count: usize,
    probability: f64,
    cap: f64,
}

impl InteractionDetector {
    pub fn new(config: &DetectorConfig, min_pattern_frequency: u32) -> Self {
        Self {
            min_samples: config.interaction_min_samples.max(2),
            min_count: (min_pattern_frequency as usize).max(1),
            probability: config.interaction_probability,
            cap: config.interaction_cap,
        }
    }
}

/// Transition counts `[from][to]`, indexed by [`Category::index`].
pub fn transition_counts(window: &[Outcome]) -> [[usize; 3]; 3] {
    let mut counts = [[0usize; 3]; 3];
    for pair in window.windows(2) {
        counts[pair[0].category().index()][pair[1].category().index()] += 1;
    }
    counts
}

impl IDetector for InteractionDetector {
    fn name(&self) -> &str {
        "interaction"
    }

    fn kind(&self) -> PatternKind {
        PatternKind::Interaction
    }

    fn detect(&self, window: &[Outcome]) -> AugurResult<Vec<PatternCandidate>> {
        if window.len() < self.min_samples {
            return Ok(Vec::new());
        }
        let counts = transition_counts(window);
        let mut candidates = Vec::new();
        for from in Category::ALL {
            let row = counts[from.index()];
            let from_total: usize = row.iter().sum();
            if from_total == 0 {
                continue;
            }
            for to in Category::ALL {
                let count = row[to.index()];
                if count < self.min_count {
                    continue;
                }
                let probability = count as f64 / from_total as f64;
                if probability < self.probability {
                    continue;
                }
                candidates.push(PatternCandidate::new(
                    PatternPayload::Interaction {
                        from,
                        to,
                        count,
                        probability,
                    },
                    probability.min(self.cap),
                    count as u32,
                    format!(
                        "{from} followed by {to} in {count}/{from_total} transitions"
                    ),
                ));
            }
        }
        Ok(candidates)
    }
}
