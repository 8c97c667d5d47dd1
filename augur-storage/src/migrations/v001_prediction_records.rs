//! V001: prediction_records.

pub const MIGRATION_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS prediction_records (
    id TEXT PRIMARY KEY,
    predicted TEXT NOT NULL,
    confidence REAL NOT NULL,
    pattern_id TEXT NOT NULL,
    pattern_kind TEXT,
    reasoning TEXT NOT NULL,
    created_at TEXT NOT NULL,
    status TEXT NOT NULL,
    actual TEXT,
    validated_at TEXT
) STRICT;

CREATE INDEX IF NOT EXISTS idx_predictions_status ON prediction_records(status);
CREATE INDEX IF NOT EXISTS idx_predictions_created ON prediction_records(created_at);
CREATE INDEX IF NOT EXISTS idx_predictions_validated ON prediction_records(validated_at)
    WHERE validated_at IS NOT NULL;
"#;
