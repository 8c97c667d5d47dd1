/// Augur system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Smallest value an outcome may carry.
pub const OUTCOME_VALUE_MIN: u8 = 0;

/// Largest value an outcome may carry.
pub const OUTCOME_VALUE_MAX: u8 = 14;

/// Values `1..=LOW_BAND_MAX` map to category A.
pub const LOW_BAND_MAX: u8 = 7;

/// Confidence reported by the neutral prediction when no pattern is active.
/// One third: a uniform guess over three categories.
pub const DEFAULT_PREDICTION_CONFIDENCE: f64 = 1.0 / 3.0;

/// Reasoning string attached to the neutral prediction.
pub const DEFAULT_PREDICTION_REASONING: &str = "default: insufficient pattern data";

/// Identifier used for predictions that no single pattern produced.
pub const COMBINED_PATTERN_ID: &str = "combined";

/// Window over which "recent" reassessments are counted in stats (hours).
pub const RECENT_REASSESSMENT_HOURS: i64 = 24;
