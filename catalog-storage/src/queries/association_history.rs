//! `association_history` — immutable log of removed edges (spec §3, §4.4
//! step 2: "the removed edge is archived to Association History").

use catalog_core::errors::StorageError;
use catalog_core::types::AssociationHistory;
use rusqlite::{params, Transaction};

use crate::connection::sqe;

/// Append one history row. Never updated or deleted afterwards.
pub fn insert_history(tx: &Transaction<'_>, h: &AssociationHistory) -> Result<(), StorageError> {
    tx.execute(
        "INSERT INTO association_history (\
            parent_scope, parent_name, child_scope, child_name, did_type, child_type, \
            bytes, adler32, md5, guid, events, did_created_at, deleted_at) \
         VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13)",
        params![
            h.parent_scope,
            h.parent_name,
            h.child_scope,
            h.child_name,
            h.did_type.as_str(),
            h.child_type.as_str(),
            h.bytes,
            h.adler32,
            h.md5,
            h.guid,
            h.events,
            h.did_created_at,
            h.deleted_at,
        ],
    )
    .map_err(sqe)?;
    Ok(())
}

/// Count of history rows logged for edges that originated from `parent`
/// (test/audit surface over the immutable log).
pub fn count_for_parent(
    tx: &Transaction<'_>,
    parent_scope: &str,
    parent_name: &str,
) -> Result<i64, StorageError> {
    tx.query_row(
        "SELECT COUNT(*) FROM association_history WHERE parent_scope = ?1 AND parent_name = ?2",
        params![parent_scope, parent_name],
        |row| row.get(0),
    )
    .map_err(sqe)
}
