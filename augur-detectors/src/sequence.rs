use augur_core::config::DetectorConfig;
use augur_core::errors::AugurResult;
use augur_core::traits::IDetector;
use augur_core::{Category, Outcome, PatternCandidate, PatternKind, PatternPayload};

/// Detects the trailing run of identical categories.
///
/// A run of at least `min_run_length` proposes mean reversion toward
/// [`Category::opposite`], with confidence growing per outcome of run length.
#[derive(Debug, Clone)]
pub struct SequenceDetector {
    min_run_length: usize,
    base_confidence: f64,
    step: f64,
    cap: f64,
}

impl SequenceDetector {
    pub fn new(config: &DetectorConfig) -> Self {
        Self {
            min_run_length: config.min_run_length.max(1),
            base_confidence: config.sequence_base_confidence,
            step: config.sequence_step,
            cap: config.sequence_cap,
        }
    }

    pub fn with_min_run_length(mut self, min_run_length: usize) -> Self {
        self.min_run_length = min_run_length.max(1);
        self
    }

    fn confidence_for(&self, run_length: usize) -> f64 {
        (self.base_confidence + self.step * run_length as f64).min(self.cap)
    }
}

/// Category and length of the run ending at the newest outcome.
pub fn trailing_run(window: &[Outcome]) -> Option<(Category, usize)> {
    let last = window.last()?.category();
    let length = window
        .iter()
        .rev()
        .take_while(|o| o.category() == last)
        .count();
    Some((last, length))
}

impl IDetector for SequenceDetector {
    fn name(&self) -> &str {
        "sequence"
    }

    fn kind(&self) -> PatternKind {
        PatternKind::Sequence
    }

    fn detect(&self, window: &[Outcome]) -> AugurResult<Vec<PatternCandidate>> {
        if window.len() < self.min_run_length {
            return Ok(Vec::new());
        }
        let Some((category, run_length)) = trailing_run(window) else {
            return Ok(Vec::new());
        };
        if run_length < self.min_run_length {
            return Ok(Vec::new());
        }
        Ok(vec![PatternCandidate::new(
            PatternPayload::Sequence {
                category,
                run_length,
            },
            self.confidence_for(run_length),
            run_length as u32,
            format!(
                "run of {run_length} {category}, expecting {}",
                category.opposite()
            ),
        )])
    }
}
