//! `DatabaseManager` — owns one SQLite connection and bootstraps the
//! catalog schema on open.
//!
//! Pattern reference: `drift_storage::connection::DatabaseManager` /
//! `DriftStorageEngine::open`. Unlike the teacher's read-pool/write-router
//! split (which exists because Drift serves concurrent NAPI callers on one
//! process), the DID catalog's concurrency model (spec §5) is "one
//! connection per worker, one transaction per request" — so this manager
//! owns a single connection and hands out `CatalogTx` values from it.

use std::path::{Path, PathBuf};

use catalog_core::errors::StorageError;
use rusqlite::Connection;

use crate::schema;
use crate::tx::CatalogTx;

/// Owns one SQLite connection for the DID catalog.
pub struct DatabaseManager {
    conn: Connection,
    path: Option<PathBuf>,
}

impl DatabaseManager {
    /// Open a file-backed catalog database. Applies WAL mode and foreign
    /// keys, then bootstraps the schema.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path).map_err(sqe)?;
        conn.pragma_update(None, "journal_mode", "WAL").map_err(sqe)?;
        conn.pragma_update(None, "foreign_keys", "ON").map_err(sqe)?;
        schema::bootstrap(&conn)?;
        Ok(Self {
            conn,
            path: Some(path.to_path_buf()),
        })
    }

    /// Open an in-memory catalog database (tests, and ephemeral workers).
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory().map_err(sqe)?;
        conn.pragma_update(None, "foreign_keys", "ON").map_err(sqe)?;
        schema::bootstrap(&conn)?;
        Ok(Self { conn, path: None })
    }

    /// Database file path (`None` for in-memory).
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Begin a transaction. Uses `BEGIN IMMEDIATE`: SQLite has no row
    /// locking, so the whole-database write lock taken here is this
    /// backend's stand-in for the row-lock read spec §4.1/§5 describes
    /// ("takes a row lock on the parent DID... serializes concurrent
    /// attach/detach on the same parent").
    pub fn begin(&mut self) -> Result<CatalogTx<'_>, StorageError> {
        let tx = self
            .conn
            .transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)
            .map_err(sqe)?;
        Ok(CatalogTx::new(tx))
    }

    /// WAL checkpoint. No-op for in-memory databases.
    pub fn checkpoint(&self) -> Result<(), StorageError> {
        if self.path.is_some() {
            self.conn
                .pragma_update(None, "wal_checkpoint", "TRUNCATE")
                .map_err(sqe)?;
        }
        Ok(())
    }

    /// Raw connection access — for callers building their own statements
    /// outside a `CatalogTx` (e.g. read-only reporting queries that don't
    /// need transactional isolation).
    pub fn raw(&self) -> &Connection {
        &self.conn
    }
}

pub(crate) fn sqe(e: impl std::fmt::Display) -> StorageError {
    StorageError::SqliteError {
        message: e.to_string(),
    }
}
