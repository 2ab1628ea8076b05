//! `deleted_dids` — the collections archive (spec §3: "files are not
//! archived here — only collections are"; spec §4.5 Phase F).

use catalog_core::errors::StorageError;
use catalog_core::types::{DeletedDid, DidKey, DidType};
use rusqlite::{params, OptionalExtension, Row, Transaction};

use crate::connection::sqe;

fn row_to_deleted(row: &Row<'_>) -> rusqlite::Result<DeletedDid> {
    let did_type_s: String = row.get("did_type")?;
    let extra_s: String = row.get("extra_json")?;
    Ok(DeletedDid {
        scope: row.get("scope")?,
        name: row.get("name")?,
        did_type: DidType::from_str_opt(&did_type_s).unwrap_or(DidType::Dataset),
        account: row.get("account")?,
        is_open: row.get("is_open")?,
        bytes: row.get("bytes")?,
        length: row.get("length")?,
        events: row.get("events")?,
        created_at: row.get("created_at")?,
        closed_at: row.get("closed_at")?,
        deleted_at: row.get("deleted_at")?,
        extra: serde_json::from_str(&extra_s).unwrap_or_default(),
    })
}

const SELECT_COLUMNS: &str = "scope, name, did_type, account, is_open, bytes, length, events, \
     created_at, closed_at, deleted_at, extra_json";

/// Archive a DATASET/CONTAINER row (spec §4.5 Phase F, only for
/// collections per spec §3).
pub fn insert_deleted(tx: &Transaction<'_>, d: &DeletedDid) -> Result<(), StorageError> {
    let extra_s = serde_json::to_string(&d.extra).unwrap_or_else(|_| "{}".to_string());
    tx.execute(
        "INSERT OR REPLACE INTO deleted_dids (\
            scope, name, did_type, account, is_open, bytes, length, events, \
            created_at, closed_at, deleted_at, extra_json) \
         VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12)",
        params![
            d.scope,
            d.name,
            d.did_type.as_str(),
            d.account,
            d.is_open,
            d.bytes,
            d.length,
            d.events,
            d.created_at,
            d.closed_at,
            d.deleted_at,
            extra_s,
        ],
    )
    .map_err(sqe)?;
    Ok(())
}

/// Used by Resurrect (spec §4.10) to check whether a DID to be revived has
/// an archived tombstone to fold back in.
pub fn get_deleted(tx: &Transaction<'_>, key: &DidKey) -> Result<Option<DeletedDid>, StorageError> {
    let sql = format!("SELECT {SELECT_COLUMNS} FROM deleted_dids WHERE scope = ?1 AND name = ?2");
    tx.query_row(&sql, params![key.scope, key.name], row_to_deleted)
        .optional()
        .map_err(sqe)
}

/// Remove a tombstone once it is resurrected.
pub fn delete_deleted(tx: &Transaction<'_>, key: &DidKey) -> Result<(), StorageError> {
    tx.execute(
        "DELETE FROM deleted_dids WHERE scope = ?1 AND name = ?2",
        params![key.scope, key.name],
    )
    .map_err(sqe)?;
    Ok(())
}
