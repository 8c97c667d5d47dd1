pub mod pattern_ops;
pub mod prediction_ops;

use chrono::{DateTime, SecondsFormat, Utc};

use augur_core::errors::StorageError;

/// Parse an RFC 3339 column, reporting the table on failure.
pub(crate) fn parse_time(table: &str, raw: &str) -> Result<DateTime<Utc>, StorageError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| StorageError::CorruptRow {
            table: table.to_string(),
            details: format!("bad timestamp {raw:?}: {e}"),
        })
}

/// Fixed-width RFC 3339 so stored timestamps sort lexically.
pub(crate) fn fmt_time(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}
