use augur_core::config::DetectorConfig;
use augur_core::errors::AugurResult;
use augur_core::traits::IDetector;
use augur_core::{Category, Outcome, PatternCandidate, PatternKind, PatternPayload};

/// Hot/cold analysis over the most recent `window` outcomes.
///
/// A category whose share exceeds `0.5 + margin` is hot and proposes the least
/// frequent category. Categories below `expected × cold_ratio` are flagged cold.
#[derive(Debug, Clone)]
pub struct FrequencyDetector {
    window: usize,
    min_samples: usize,
    margin: f64,
    cap: f64,
    cold_ratio: f64,
}

impl FrequencyDetector {
    pub fn new(config: &DetectorConfig) -> Self {
        Self {
            window: config.frequency_window.max(1),
            min_samples: config.frequency_min_samples,
            margin: config.frequency_margin,
            cap: config.frequency_cap,
            cold_ratio: config.cold_ratio,
        }
    }
}

/// Occurrences per category, indexed by [`Category::index`].
pub fn category_counts(window: &[Outcome]) -> [usize; 3] {
    let mut counts = [0usize; 3];
    for outcome in window {
        counts[outcome.category().index()] += 1;
    }
    counts
}

/// Least frequent category; ties go to the earlier category.
pub fn least_frequent(counts: &[usize; 3]) -> Category {
    let mut best = Category::A;
    for category in Category::ALL {
        if counts[category.index()] < counts[best.index()] {
            best = category;
        }
    }
    best
}

impl IDetector for FrequencyDetector {
    fn name(&self) -> &str {
        "frequency"
    }

    fn kind(&self) -> PatternKind {
        PatternKind::Frequency
    }

    fn detect(&self, window: &[Outcome]) -> AugurResult<Vec<PatternCandidate>> {
        let recent = &window[window.len().saturating_sub(self.window)..];
        if recent.len() < self.min_samples.max(1) {
            return Ok(Vec::new());
        }
        let total = recent.len() as f64;
        let counts = category_counts(recent);
        let expected = total / Category::ALL.len() as f64;
        let cold: Vec<Category> = Category::ALL
            .into_iter()
            .filter(|c| (counts[c.index()] as f64) < expected * self.cold_ratio)
            .collect();

        let mut candidates = Vec::new();
        for dominant in Category::ALL {
            let count = counts[dominant.index()];
            let share = count as f64 / total;
            if share <= 0.5 + self.margin {
                continue;
            }
            let least = least_frequent(&counts);
            candidates.push(PatternCandidate::new(
                PatternPayload::Frequency {
                    dominant,
                    least,
                    cold: cold.clone(),
                    share,
                },
                share.min(self.cap),
                count as u32,
                format!(
                    "{dominant} hot at {:.0}% of last {}, expecting {least}",
                    share * 100.0,
                    recent.len()
                ),
            ));
        }
        Ok(candidates)
    }
}
