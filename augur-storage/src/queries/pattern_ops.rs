//! Replace-all snapshot of learned patterns.

use chrono::Utc;
use rusqlite::{params, Connection};

use augur_core::errors::StorageError;
use augur_core::Pattern;

use super::fmt_time;
use crate::to_storage_err;

const TABLE: &str = "pattern_archive";

/// Replace the archive with `patterns` in one transaction.
pub fn replace_all(conn: &Connection, patterns: &[Pattern]) -> Result<(), StorageError> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| to_storage_err(format!("replace_all begin: {e}")))?;

    match replace_all_inner(&tx, patterns) {
        Ok(()) => {
            tx.commit()
                .map_err(|e| to_storage_err(format!("replace_all commit: {e}")))?;
            Ok(())
        }
        Err(e) => {
            let _ = tx.rollback();
            Err(e)
        }
    }
}

fn replace_all_inner(conn: &Connection, patterns: &[Pattern]) -> Result<(), StorageError> {
    conn.execute("DELETE FROM pattern_archive", [])
        .map_err(|e| to_storage_err(e.to_string()))?;
    let archived_at = fmt_time(Utc::now());
    let mut stmt = conn
        .prepare(
            "INSERT INTO pattern_archive (id, kind, confidence, body, archived_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    for pattern in patterns {
        let body = serde_json::to_string(pattern).map_err(|e| to_storage_err(e.to_string()))?;
        stmt.execute(params![
            pattern.id,
            pattern.kind().as_str(),
            pattern.confidence.value(),
            body,
            archived_at,
        ])
        .map_err(|e| to_storage_err(e.to_string()))?;
    }
    Ok(())
}

/// Every archived pattern, highest confidence first.
pub fn load_all(conn: &Connection) -> Result<Vec<Pattern>, StorageError> {
    let mut stmt = conn
        .prepare("SELECT id, body FROM pattern_archive ORDER BY confidence DESC, id ASC")
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut patterns = Vec::new();
    for row in rows {
        let (id, body) = row.map_err(|e| to_storage_err(e.to_string()))?;
        let pattern: Pattern = serde_json::from_str(&body).map_err(|e| StorageError::CorruptRow {
            table: TABLE.to_string(),
            details: format!("pattern {id}: {e}"),
        })?;
        patterns.push(pattern);
    }
    Ok(patterns)
}
