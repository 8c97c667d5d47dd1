//! PRAGMA configuration applied to every connection.
//!
//! WAL mode, NORMAL sync, configurable busy_timeout.

use rusqlite::Connection;

use augur_core::errors::StorageError;

use crate::to_storage_err;

pub fn apply_pragmas(conn: &Connection, busy_timeout_ms: u64) -> Result<(), StorageError> {
    conn.execute_batch(&format!(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA busy_timeout = {busy_timeout_ms};
        "
    ))
    .map_err(|e| to_storage_err(e.to_string()))
}
