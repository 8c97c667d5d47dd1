//! Span definitions per operation: tick, validation, signal, reassessment.

/// Create a span for one ingestion tick.
#[macro_export]
macro_rules! tick_span {
    ($value:expr, $category:expr) => {
        tracing::info_span!("augur.tick", value = $value, category = %$category)
    };
}

/// Create a validation span.
#[macro_export]
macro_rules! validation_span {
    ($pending:expr) => {
        tracing::info_span!("augur.validate", pending = $pending)
    };
}

/// Create a signal span.
#[macro_export]
macro_rules! signal_span {
    ($category:expr, $confidence:expr) => {
        tracing::info_span!("augur.signal", category = %$category, confidence = $confidence)
    };
}

/// Create a reassessment span.
#[macro_export]
macro_rules! reassessment_span {
    ($trigger:expr) => {
        tracing::info_span!("augur.reassess", trigger = %$trigger)
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const TICK: &str = "augur.tick";
    pub const VALIDATION: &str = "augur.validate";
    pub const SIGNAL: &str = "augur.signal";
    pub const REASSESSMENT: &str = "augur.reassess";
}
