use augur_core::config::DetectorConfig;
use augur_core::errors::AugurResult;
use augur_core::traits::IDetector;
use augur_core::{Outcome, PatternCandidate, PatternKind, PatternPayload};

/// Detects a strict two-category alternation ending at the newest outcome.
#[derive(Debug, Clone)]
pub struct AlternationDetector {
    min_length: usize,
    break_length: usize,
    base_confidence: f64,
    step: f64,
    cap: f64,
}

impl AlternationDetector {
    pub fn new(config: &DetectorConfig) -> Self {
        Self {
            min_length: config.min_alternation_length.max(2),
            break_length: config.alternation_break_length,
            base_confidence: config.alternation_base_confidence,
            step: config.alternation_step,
            cap: config.alternation_cap,
        }
    }

    /// Length of the strict alternation ending at the newest outcome.
    /// Zero when the last two outcomes share a category.
    fn trailing_alternation(window: &[Outcome]) -> usize {
        let n = window.len();
        if n < 2 || window[n - 1].category() == window[n - 2].category() {
            return 0;
        }
        let mut length = 2;
        while length < n {
            let i = n - 1 - length;
            if window[i].category() != window[i + 2].category() {
                break;
            }
            length += 1;
        }
        length
    }
}

impl IDetector for AlternationDetector {
    fn name(&self) -> &str {
        "alternation"
    }

    fn kind(&self) -> PatternKind {
        PatternKind::Alternation
    }

    fn detect(&self, window: &[Outcome]) -> AugurResult<Vec<PatternCandidate>> {
        if window.len() < self.min_length {
            return Ok(Vec::new());
        }
        let length = Self::trailing_alternation(window);
        if length < self.min_length {
            return Ok(Vec::new());
        }
        let start = window.len() - length;
        let first = window[start].category();
        let second = window[start + 1].category();
        let confidence = (self.base_confidence + self.step * length as f64).min(self.cap);
        let description = if length >= self.break_length {
            format!("{first}-{second} alternation of {length}, due to break")
        } else {
            format!("{first}-{second} alternation of {length}")
        };
        Ok(vec![PatternCandidate::new(
            PatternPayload::Alternation {
                first,
                second,
                length,
            },
            confidence,
            length as u32,
            description,
        )])
    }
}
