//! `CatalogTx` — the explicit transaction handle threaded through every
//! engine operation, replacing the thread-local session the original
//! implementation assumed (spec §9: "Global session state").

use catalog_core::errors::StorageError;
use catalog_core::types::{Did, DidKey};
use rusqlite::{params, Transaction};

use crate::connection::sqe;
use crate::queries::dids;
use crate::temp_tables::{TempTable, TempTableManager};

/// One transaction's worth of catalog state: the underlying SQLite
/// transaction plus the Temp-Table Manager that mints scratch tables for
/// it (spec §9: "the Temp-Table Manager is a field on that handle").
pub struct CatalogTx<'conn> {
    tx: Transaction<'conn>,
    pub temp_tables: TempTableManager,
}

impl<'conn> CatalogTx<'conn> {
    pub(crate) fn new(tx: Transaction<'conn>) -> Self {
        Self {
            tx,
            temp_tables: TempTableManager::new(),
        }
    }

    /// Raw access to the underlying SQLite transaction, for query modules.
    pub fn raw(&self) -> &Transaction<'conn> {
        &self.tx
    }

    pub fn commit(self) -> Result<(), StorageError> {
        self.tx.commit().map_err(sqe)
    }

    pub fn rollback(self) -> Result<(), StorageError> {
        self.tx.rollback().map_err(sqe)
    }

    /// Row-lock read: fetch a DID and lock it against concurrent
    /// attach/detach (spec §4.1, §4.3 step 2, §4.4 step 1, §4.6 step 1).
    ///
    /// SQLite has no per-row locking; `BEGIN IMMEDIATE` (taken in
    /// `DatabaseManager::begin`) already holds the whole-database write
    /// lock for the lifetime of this transaction, so this is a plain read
    /// documented as the row-lock hook for a future multi-writer backend.
    pub fn lock_did_for_update(&self, key: &DidKey) -> Result<Option<Did>, StorageError> {
        dids::get_did(&self.tx, key)
    }

    /// Mint an empty `(scope, name)` scratch table for this transaction
    /// (spec §4.2). A thin wrapper so callers holding only `&mut CatalogTx`
    /// don't have to split the `tx`/`temp_tables` fields themselves.
    pub fn mint_did_key_table(&mut self) -> Result<TempTable, StorageError> {
        self.temp_tables.mint_did_keys(&self.tx)
    }

    /// Bump `accessed_at`/`access_cnt` on a DID (spec §3: `access_cnt`,
    /// `accessed_at`). Used by read operations that touch a DID.
    pub fn touch_did(&self, key: &DidKey, now: i64) -> Result<(), StorageError> {
        self.tx
            .execute(
                "UPDATE dids SET accessed_at = ?1, access_cnt = access_cnt + 1 \
                 WHERE scope = ?2 AND name = ?3",
                params![now, key.scope, key.name],
            )
            .map_err(sqe)?;
        Ok(())
    }
}
