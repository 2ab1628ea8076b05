//! `follows` table queries (spec §4.9).

use catalog_core::errors::StorageError;
use catalog_core::types::{DidKey, DidType, Follow};
use rusqlite::{params, Row, Transaction};

use crate::connection::sqe;

fn row_to_follow(row: &Row<'_>) -> rusqlite::Result<Follow> {
    let did_type_s: String = row.get("did_type")?;
    Ok(Follow {
        scope: row.get("scope")?,
        name: row.get("name")?,
        account: row.get("account")?,
        did_type: DidType::from_str_opt(&did_type_s).unwrap_or(DidType::Dataset),
    })
}

/// Subscribe an account to a DID (spec §4.9 `add_dids_to_followed`).
pub fn insert_follow(tx: &Transaction<'_>, follow: &Follow) -> Result<(), StorageError> {
    tx.execute(
        "INSERT OR IGNORE INTO follows (scope, name, account, did_type) VALUES (?1, ?2, ?3, ?4)",
        params![follow.scope, follow.name, follow.account, follow.did_type.as_str()],
    )
    .map_err(sqe)?;
    Ok(())
}

/// Unsubscribe (spec §4.9 `remove_dids_from_followed`).
pub fn delete_follow(
    tx: &Transaction<'_>,
    key: &DidKey,
    account: &str,
) -> Result<bool, StorageError> {
    let affected = tx
        .execute(
            "DELETE FROM follows WHERE scope = ?1 AND name = ?2 AND account = ?3",
            params![key.scope, key.name, account],
        )
        .map_err(sqe)?;
    Ok(affected > 0)
}

/// Remove every follower of a DID (spec §4.5 Phase G: "delete Follow
/// rows" during terminal removal of a collection).
pub fn delete_follows_for_did(tx: &Transaction<'_>, key: &DidKey) -> Result<(), StorageError> {
    tx.execute(
        "DELETE FROM follows WHERE scope = ?1 AND name = ?2",
        params![key.scope, key.name],
    )
    .map_err(sqe)?;
    Ok(())
}

/// All accounts following a DID (used to fan out a triggered event).
pub fn list_followers(tx: &Transaction<'_>, key: &DidKey) -> Result<Vec<Follow>, StorageError> {
    let mut stmt = tx
        .prepare_cached(
            "SELECT scope, name, account, did_type FROM follows WHERE scope = ?1 AND name = ?2",
        )
        .map_err(sqe)?;
    let rows = stmt
        .query_map(params![key.scope, key.name], row_to_follow)
        .map_err(sqe)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row.map_err(sqe)?);
    }
    Ok(out)
}
