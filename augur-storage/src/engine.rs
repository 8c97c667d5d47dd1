//! SqliteStore: one serialized connection, implements IPredictionStore
//! and IPatternArchive.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;
use tracing::info;

use augur_core::config::StorageConfig;
use augur_core::errors::{AugurResult, StorageError};
use augur_core::models::PredictionRecord;
use augur_core::traits::{IPatternArchive, IPredictionStore};
use augur_core::Pattern;

use crate::migrations;
use crate::pragmas::apply_pragmas;
use crate::queries::{pattern_ops, prediction_ops};
use crate::to_storage_err;

/// Both stores share one connection; writes are small and infrequent.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the database configured in `[storage]`.
    pub fn from_config(config: &StorageConfig) -> Result<Self, StorageError> {
        let conn = Connection::open(&config.db_path).map_err(|e| StorageError::Unavailable {
            reason: format!("{}: {e}", config.db_path),
        })?;
        Self::initialize(conn, config.busy_timeout_ms)
    }

    /// Open a database file with default settings.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path).map_err(|e| StorageError::Unavailable {
            reason: format!("{}: {e}", path.display()),
        })?;
        Self::initialize(conn, StorageConfig::default().busy_timeout_ms)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory().map_err(|e| to_storage_err(e.to_string()))?;
        Self::initialize(conn, StorageConfig::default().busy_timeout_ms)
    }

    fn initialize(conn: Connection, busy_timeout_ms: u64) -> Result<Self, StorageError> {
        apply_pragmas(&conn, busy_timeout_ms)?;
        migrations::run_migrations(&conn)?;
        info!(
            schema_version = migrations::current_version(&conn)?,
            "prediction store ready"
        );
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Execute with the serialized connection.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&Connection) -> Result<T, StorageError>,
    {
        let guard = self.conn.lock().map_err(|_| StorageError::SqliteError {
            message: "connection lock poisoned".to_string(),
        })?;
        f(&guard)
    }

    pub fn schema_version(&self) -> Result<u32, StorageError> {
        self.with_conn(migrations::current_version)
    }

    pub fn record_count(&self) -> Result<usize, StorageError> {
        self.with_conn(prediction_ops::count_records)
    }
}

impl IPredictionStore for SqliteStore {
    fn save(&self, record: &PredictionRecord) -> AugurResult<()> {
        Ok(self.with_conn(|conn| prediction_ops::upsert_record(conn, record))?)
    }

    fn load_pending(&self) -> AugurResult<Vec<PredictionRecord>> {
        Ok(self.with_conn(prediction_ops::load_pending)?)
    }

    fn load_recent(&self, limit: usize) -> AugurResult<Vec<PredictionRecord>> {
        Ok(self.with_conn(|conn| prediction_ops::load_recent(conn, limit))?)
    }
}

impl IPatternArchive for SqliteStore {
    fn save_patterns(&self, patterns: &[Pattern]) -> AugurResult<()> {
        self.with_conn(|conn| pattern_ops::replace_all(conn, patterns))?;
        info!(count = patterns.len(), "patterns archived");
        Ok(())
    }

    fn load_patterns(&self) -> AugurResult<Vec<Pattern>> {
        Ok(self.with_conn(pattern_ops::load_all)?)
    }
}
