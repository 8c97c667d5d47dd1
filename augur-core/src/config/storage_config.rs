use serde::{Deserialize, Serialize};

use super::defaults;

/// Optional SQLite persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub enabled: bool,
    pub db_path: String,
    pub busy_timeout_ms: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            db_path: defaults::DEFAULT_DB_PATH.to_string(),
            busy_timeout_ms: defaults::DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}
