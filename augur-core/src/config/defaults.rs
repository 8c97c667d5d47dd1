//! Compiled defaults for every config section.

// Patterns
pub const DEFAULT_MIN_PATTERN_FREQUENCY: u32 = 3;
pub const DEFAULT_DECAY_FACTOR: f64 = 0.95;
pub const DEFAULT_CONFIDENCE_FLOOR: f64 = 0.1;
pub const DEFAULT_STALE_AFTER_SECS: u64 = 7 * 24 * 3600;
pub const DEFAULT_CONFIDENCE_CAP: f64 = 0.95;
pub const DEFAULT_FREQUENCY_BOOST: f64 = 0.1;
pub const DEFAULT_MAX_PATTERNS: usize = 100;

// Detectors
pub const DEFAULT_MIN_RUN_LENGTH: usize = 3;
pub const DEFAULT_SEQUENCE_BASE_CONFIDENCE: f64 = 0.5;
pub const DEFAULT_SEQUENCE_STEP: f64 = 0.05;
pub const DEFAULT_SEQUENCE_CAP: f64 = 0.9;
pub const DEFAULT_MIN_ALTERNATION_LENGTH: usize = 4;
pub const DEFAULT_ALTERNATION_BREAK_LENGTH: usize = 10;
pub const DEFAULT_ALTERNATION_BASE_CONFIDENCE: f64 = 0.4;
pub const DEFAULT_ALTERNATION_STEP: f64 = 0.05;
pub const DEFAULT_ALTERNATION_CAP: f64 = 0.85;
pub const DEFAULT_FREQUENCY_WINDOW: usize = 30;
pub const DEFAULT_FREQUENCY_MIN_SAMPLES: usize = 10;
pub const DEFAULT_FREQUENCY_MARGIN: f64 = 0.1;
pub const DEFAULT_FREQUENCY_CAP: f64 = 0.7;
pub const DEFAULT_COLD_RATIO: f64 = 0.5;
pub const DEFAULT_INTERACTION_MIN_SAMPLES: usize = 12;
pub const DEFAULT_INTERACTION_PROBABILITY: f64 = 0.6;
pub const DEFAULT_INTERACTION_CAP: f64 = 0.8;
pub const DEFAULT_RULE_COOLDOWN_SECS: u64 = 300;
pub const DEFAULT_RULE_CONFIDENCE_THRESHOLD: f64 = 0.7;
pub const DEFAULT_QUARANTINE_AFTER: u32 = 5;

// Learner
pub const DEFAULT_HISTORY_SIZE: usize = 1000;
pub const DEFAULT_DETECTION_WINDOW: usize = 50;
pub const DEFAULT_LEARNER_CONFIDENCE_THRESHOLD: f64 = 0.5;
pub const DEFAULT_LEARNER_THRESHOLD_STEP: f64 = 0.02;
pub const DEFAULT_LEARNER_MIN_THRESHOLD: f64 = 0.3;
pub const DEFAULT_LEARNER_MAX_THRESHOLD: f64 = 0.8;
pub const DEFAULT_RELEARN_WINDOW: usize = 20;
pub const DEFAULT_LOW_PERFORMER_RATE: f64 = 0.2;

// Validation
pub const DEFAULT_MIN_CONFIDENCE_THRESHOLD: f64 = 0.6;
pub const DEFAULT_MAX_PENDING_PREDICTIONS: usize = 1;
pub const DEFAULT_VALIDATION_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_RECENT_WINDOW: usize = 5;
pub const DEFAULT_RECENT_MIN_SAMPLES: usize = 3;
pub const DEFAULT_LOW_ACCURACY_MARK: f64 = 0.3;
pub const DEFAULT_CONSERVATIVE_CONFIDENCE: f64 = 0.8;
pub const DEFAULT_VALIDATION_HISTORY_LIMIT: usize = 1000;
pub const DEFAULT_DROP_WINDOW: usize = 10;
pub const DEFAULT_DROP_THRESHOLD: f64 = 0.2;

// Reassessment
pub const DEFAULT_REASSESSMENT_COOLDOWN_SECS: u64 = 30;
pub const DEFAULT_REASSESSMENT_INTERVAL_SECS: u64 = 600;
pub const DEFAULT_REASSESSMENT_MAX_DURATION_MS: u64 = 2_000;
pub const DEFAULT_REASSESSMENT_HISTORY_SIZE: usize = 100;
pub const DEFAULT_HOUSEKEEPING_INTERVAL_SECS: u64 = 5;

// Signals
pub const DEFAULT_INTER_SIGNAL_COOLDOWN_SECS: u64 = 30;
pub const DEFAULT_SIGNAL_INITIAL_THRESHOLD: f64 = 0.6;
pub const DEFAULT_SIGNAL_THRESHOLD_STEP: f64 = 0.02;
pub const DEFAULT_SIGNAL_MIN_FLOOR: f64 = 0.5;
pub const DEFAULT_SIGNAL_MAX_CEILING: f64 = 0.9;
pub const DEFAULT_SIGNAL_ACCURACY_WINDOW: usize = 10;
pub const DEFAULT_SIGNAL_MIN_SAMPLES: usize = 3;
pub const DEFAULT_SIGNAL_RAISE_BELOW: f64 = 0.5;
pub const DEFAULT_SIGNAL_LOWER_ABOVE: f64 = 0.7;

// Storage
pub const DEFAULT_DB_PATH: &str = "augur.db";
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

// Observability
pub const DEFAULT_LOG_LEVEL: &str = "info";
