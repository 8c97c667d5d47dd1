//! Schema migrations using PRAGMA user_version.

pub mod v001_prediction_records;
pub mod v002_pattern_archive;

use augur_core::errors::StorageError;
use rusqlite::Connection;

/// Run all pending migrations.
pub fn run_migrations(conn: &Connection) -> Result<(), StorageError> {
    let current = current_version(conn)?;

    let migrations: &[(&str, u32)] = &[
        (v001_prediction_records::MIGRATION_SQL, 1),
        (v002_pattern_archive::MIGRATION_SQL, 2),
    ];

    for (sql, version) in migrations {
        if current < *version {
            conn.execute_batch(sql)
                .map_err(|e| StorageError::MigrationFailed {
                    version: *version,
                    reason: e.to_string(),
                })?;
            conn.pragma_update(None, "user_version", version)
                .map_err(|e| StorageError::MigrationFailed {
                    version: *version,
                    reason: e.to_string(),
                })?;
            tracing::info!(version = version, "applied migration");
        }
    }

    Ok(())
}

/// Get the current schema version.
pub fn current_version(conn: &Connection) -> Result<u32, StorageError> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(|e| StorageError::MigrationFailed {
            version: 0,
            reason: e.to_string(),
        })
}
