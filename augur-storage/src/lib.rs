//! # augur-storage
//!
//! SQLite implementation of the persistence boundary: prediction records
//! keyed by id, and a snapshot archive of learned patterns.

pub mod engine;
pub mod migrations;
pub mod pragmas;
pub mod queries;

pub use engine::SqliteStore;

use augur_core::errors::StorageError;

/// Map any displayable SQLite failure into a storage error.
pub(crate) fn to_storage_err(message: impl Into<String>) -> StorageError {
    StorageError::SqliteError {
        message: message.into(),
    }
}
