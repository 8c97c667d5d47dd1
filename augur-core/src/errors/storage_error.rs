/// Persistence-layer errors for the prediction and pattern stores.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("migration failed at version {version}: {reason}")]
    MigrationFailed { version: u32, reason: String },

    #[error("store unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("corrupt row in {table}: {details}")]
    CorruptRow { table: String, details: String },
}
