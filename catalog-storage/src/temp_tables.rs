//! `TempTableManager` — per-transaction scratch tables for bulk
//! `(scope, name)` sets (spec §4.2).
//!
//! SQLite temp tables are connection-scoped, not transaction-scoped, so
//! this manager always takes the fallback path spec §4.2 describes for
//! backends without auto-truncate-on-commit semantics: `CREATE TEMP TABLE
//! IF NOT EXISTS` followed by an explicit `DELETE FROM` to guarantee the
//! empty-on-entry invariant, regardless of what a prior transaction on the
//! same connection left behind.

use catalog_core::errors::StorageError;
use rusqlite::Transaction;

use crate::connection::sqe;

/// The two fixed column shapes temp tables come in (spec §4.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TempTableShape {
    /// `(scope, name)` — a bare set of DID keys.
    DidKeys,
    /// `(scope, name, child_scope, child_name)` — parent/child key pairs.
    AssociationKeys,
}

/// A scratch table minted for one transaction. Empty on return, scoped to
/// this transaction's logical lifetime (though physically it may outlive
/// it on the connection — callers must not rely on automatic cleanup on
/// commit).
pub struct TempTable {
    pub name: String,
    shape: TempTableShape,
}

impl TempTable {
    pub fn shape(&self) -> TempTableShape {
        self.shape
    }
}

/// Mints distinct, empty scratch tables within one transaction.
///
/// Each call returns a table suffixed with an incrementing index so
/// recursive attach/delete calls within the same transaction never trample
/// each other's staged rows (spec §4.2).
#[derive(Default)]
pub struct TempTableManager {
    did_keys_counter: u32,
    association_keys_counter: u32,
}

impl TempTableManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint an empty `(scope, name)` scratch table.
    pub fn mint_did_keys(&mut self, tx: &Transaction<'_>) -> Result<TempTable, StorageError> {
        let name = format!("temp_did_keys_{}", self.did_keys_counter);
        self.did_keys_counter += 1;
        create_and_clear(
            tx,
            &name,
            "CREATE TEMP TABLE IF NOT EXISTS {name} (scope TEXT NOT NULL, name TEXT NOT NULL)",
        )?;
        Ok(TempTable {
            name,
            shape: TempTableShape::DidKeys,
        })
    }

    /// Mint an empty `(scope, name, child_scope, child_name)` scratch table.
    pub fn mint_association_keys(
        &mut self,
        tx: &Transaction<'_>,
    ) -> Result<TempTable, StorageError> {
        let name = format!("temp_assoc_keys_{}", self.association_keys_counter);
        self.association_keys_counter += 1;
        create_and_clear(
            tx,
            &name,
            "CREATE TEMP TABLE IF NOT EXISTS {name} (\
                scope TEXT NOT NULL, name TEXT NOT NULL, \
                child_scope TEXT NOT NULL, child_name TEXT NOT NULL)",
        )?;
        Ok(TempTable {
            name,
            shape: TempTableShape::AssociationKeys,
        })
    }
}

fn create_and_clear(
    tx: &Transaction<'_>,
    name: &str,
    create_template: &str,
) -> Result<(), StorageError> {
    let create_sql = create_template.replace("{name}", name);
    tx.execute_batch(&create_sql).map_err(sqe)?;
    tx.execute(&format!("DELETE FROM {name}"), []).map_err(sqe)?;
    Ok(())
}
