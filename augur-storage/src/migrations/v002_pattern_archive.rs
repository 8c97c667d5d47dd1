//! V002: pattern_archive, a replace-all snapshot of learned patterns.

pub const MIGRATION_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS pattern_archive (
    id TEXT PRIMARY KEY,
    kind TEXT NOT NULL,
    confidence REAL NOT NULL,
    body TEXT NOT NULL,
    archived_at TEXT NOT NULL
) STRICT;

CREATE INDEX IF NOT EXISTS idx_pattern_archive_kind ON pattern_archive(kind);
"#;
