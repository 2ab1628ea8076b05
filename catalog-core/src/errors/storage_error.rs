//! Storage-layer errors for SQLite operations.

use super::error_code::{self, CatalogErrorCode};

/// Errors that can occur in the persistence gateway.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("schema bootstrap failed: {message}")]
    SchemaBootstrapFailed { message: String },

    #[error("database busy (another operation in progress)")]
    DbBusy,

    #[error("database corrupt: {details}")]
    DbCorrupt { details: String },

    #[error("disk full")]
    DiskFull,

    #[error("operation not supported on this backend: {operation} — {reason}")]
    NotSupported { operation: String, reason: String },
}

impl CatalogErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::DbBusy => error_code::DB_BUSY,
            Self::DbCorrupt { .. } => error_code::DB_CORRUPT,
            Self::DiskFull => error_code::DISK_FULL,
            _ => error_code::STORAGE_ERROR,
        }
    }
}
