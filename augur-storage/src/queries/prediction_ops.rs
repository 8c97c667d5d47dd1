//! Upsert and load for prediction records.

use rusqlite::{params, Connection, Row};

use augur_core::errors::StorageError;
use augur_core::models::{PredictionRecord, PredictionStatus};
use augur_core::{Category, PatternKind};

use super::{fmt_time, parse_time};
use crate::to_storage_err;

const TABLE: &str = "prediction_records";

const COLUMNS: &str = "id, predicted, confidence, pattern_id, pattern_kind, reasoning,
     created_at, status, actual, validated_at";

/// Insert or replace the record with the same id.
pub fn upsert_record(conn: &Connection, record: &PredictionRecord) -> Result<(), StorageError> {
    conn.execute(
        "INSERT INTO prediction_records (
            id, predicted, confidence, pattern_id, pattern_kind, reasoning,
            created_at, status, actual, validated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
        ON CONFLICT(id) DO UPDATE SET
            status = excluded.status,
            actual = excluded.actual,
            validated_at = excluded.validated_at",
        params![
            record.id,
            record.predicted.as_str(),
            record.confidence,
            record.pattern_id,
            record.pattern_kind.map(|k| k.as_str()),
            record.reasoning,
            fmt_time(record.created_at),
            record.status.as_str(),
            record.actual.map(|c| c.as_str()),
            record.validated_at.map(fmt_time),
        ],
    )
    .map_err(|e| to_storage_err(format!("upsert_record: {e}")))?;
    Ok(())
}

/// Every pending record, oldest first.
pub fn load_pending(conn: &Connection) -> Result<Vec<PredictionRecord>, StorageError> {
    query_records(
        conn,
        &format!(
            "SELECT {COLUMNS} FROM prediction_records
             WHERE status = 'pending' ORDER BY created_at ASC"
        ),
        None,
    )
}

/// Latest terminal records, newest first.
pub fn load_recent(conn: &Connection, limit: usize) -> Result<Vec<PredictionRecord>, StorageError> {
    query_records(
        conn,
        &format!(
            "SELECT {COLUMNS} FROM prediction_records
             WHERE status != 'pending' ORDER BY validated_at DESC, created_at DESC LIMIT ?1"
        ),
        Some(limit as i64),
    )
}

pub fn count_records(conn: &Connection) -> Result<usize, StorageError> {
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM prediction_records", [], |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(count as usize)
}

fn query_records(
    conn: &Connection,
    sql: &str,
    limit: Option<i64>,
) -> Result<Vec<PredictionRecord>, StorageError> {
    let mut stmt = conn
        .prepare(sql)
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = match limit {
        Some(limit) => stmt.query_map(params![limit], RawRecord::from_row),
        None => stmt.query_map([], RawRecord::from_row),
    }
    .map_err(|e| to_storage_err(e.to_string()))?;

    let mut records = Vec::new();
    for row in rows {
        let raw = row.map_err(|e| to_storage_err(e.to_string()))?;
        records.push(raw.into_record()?);
    }
    Ok(records)
}

/// Column values as stored, before parsing into domain types.
struct RawRecord {
    id: String,
    predicted: String,
    confidence: f64,
    pattern_id: String,
    pattern_kind: Option<String>,
    reasoning: String,
    created_at: String,
    status: String,
    actual: Option<String>,
    validated_at: Option<String>,
}

impl RawRecord {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            predicted: row.get(1)?,
            confidence: row.get(2)?,
            pattern_id: row.get(3)?,
            pattern_kind: row.get(4)?,
            reasoning: row.get(5)?,
            created_at: row.get(6)?,
            status: row.get(7)?,
            actual: row.get(8)?,
            validated_at: row.get(9)?,
        })
    }

    fn into_record(self) -> Result<PredictionRecord, StorageError> {
        let corrupt = |details: String| StorageError::CorruptRow {
            table: TABLE.to_string(),
            details,
        };
        let category = |raw: &str| {
            raw.parse::<Category>()
                .map_err(|_| corrupt(format!("bad category {raw:?} in {}", self.id)))
        };

        let predicted = category(&self.predicted)?;
        let actual = self.actual.as_deref().map(category).transpose()?;
        let status = PredictionStatus::parse(&self.status)
            .ok_or_else(|| corrupt(format!("bad status {:?} in {}", self.status, self.id)))?;
        let pattern_kind = match self.pattern_kind.as_deref() {
            Some(raw) => Some(
                PatternKind::parse(raw)
                    .ok_or_else(|| corrupt(format!("bad kind {raw:?} in {}", self.id)))?,
            ),
            None => None,
        };
        let created_at = parse_time(TABLE, &self.created_at)?;
        let validated_at = self
            .validated_at
            .as_deref()
            .map(|raw| parse_time(TABLE, raw))
            .transpose()?;

        Ok(PredictionRecord {
            id: self.id,
            predicted,
            confidence: self.confidence,
            pattern_id: self.pattern_id,
            pattern_kind,
            reasoning: self.reasoning,
            created_at,
            status,
            actual,
            validated_at,
        })
    }
}
