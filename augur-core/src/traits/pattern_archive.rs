use crate::errors::AugurResult;
use crate::pattern::Pattern;

/// Snapshot storage for learned patterns, so a restart does not start cold.
pub trait IPatternArchive: Send + Sync {
    /// Replace the archived set with `patterns`.
    fn save_patterns(&self, patterns: &[Pattern]) -> AugurResult<()>;

    fn load_patterns(&self) -> AugurResult<Vec<Pattern>>;
}
