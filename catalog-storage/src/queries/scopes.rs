//! `scopes` table queries.

use catalog_core::errors::StorageError;
use rusqlite::{params, OptionalExtension, Transaction};

use crate::connection::sqe;

/// Does this scope exist (spec §3 invariant 1: every DID's scope refers to
/// a registered scope)?
pub fn scope_exists(tx: &Transaction<'_>, scope: &str) -> Result<bool, StorageError> {
    tx.query_row(
        "SELECT 1 FROM scopes WHERE scope = ?1",
        params![scope],
        |_| Ok(()),
    )
    .optional()
    .map_err(sqe)
    .map(|row| row.is_some())
}

/// Register a scope (used by test fixtures and the out-of-band scope
/// admin surface; scope lifecycle is otherwise outside this spec).
pub fn register_scope(
    tx: &Transaction<'_>,
    scope: &str,
    account: &str,
    vo: Option<&str>,
) -> Result<(), StorageError> {
    tx.execute(
        "INSERT OR IGNORE INTO scopes (scope, account, vo) VALUES (?1, ?2, ?3)",
        params![scope, account, vo],
    )
    .map_err(sqe)?;
    Ok(())
}
