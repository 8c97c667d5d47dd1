use crate::errors::AugurResult;
use crate::outcome::Outcome;
use crate::pattern::{PatternCandidate, PatternKind};

/// A pattern detector.
///
/// Detection is a pure function of the window: no store access and no side
/// effects. Windows shorter than a detector's minimum yield an empty list.
pub trait IDetector: Send + Sync {
    /// Stable name used in logs and failure reports.
    fn name(&self) -> &str;

    /// Family of the candidates this detector proposes.
    fn kind(&self) -> PatternKind;

    /// Scan `window` (oldest first) and propose candidates.
    fn detect(&self, window: &[Outcome]) -> AugurResult<Vec<PatternCandidate>>;
}
