//! `associations` table queries — the parent/child edges of the DID graph.

use catalog_core::types::{Association, DidKey, DidType};
use catalog_core::errors::StorageError;
use rusqlite::{params, OptionalExtension, Row, Transaction};

use crate::connection::sqe;

fn row_to_association(row: &Row<'_>) -> rusqlite::Result<Association> {
    let did_type_s: String = row.get("did_type")?;
    let child_type_s: String = row.get("child_type")?;
    Ok(Association {
        parent_scope: row.get("parent_scope")?,
        parent_name: row.get("parent_name")?,
        child_scope: row.get("child_scope")?,
        child_name: row.get("child_name")?,
        did_type: DidType::from_str_opt(&did_type_s).unwrap_or(DidType::Container),
        child_type: DidType::from_str_opt(&child_type_s).unwrap_or(DidType::File),
        bytes: row.get("bytes")?,
        adler32: row.get("adler32")?,
        md5: row.get("md5")?,
        guid: row.get("guid")?,
        events: row.get("events")?,
        rule_evaluation: row.get("rule_evaluation")?,
    })
}

const SELECT_COLUMNS: &str = "parent_scope, parent_name, child_scope, child_name, did_type, \
     child_type, bytes, adler32, md5, guid, events, rule_evaluation";

/// One existing edge, if any (spec §4.3 step 3: idempotency check before
/// inserting a new attachment).
pub fn get_association(
    tx: &Transaction<'_>,
    parent: &DidKey,
    child: &DidKey,
) -> Result<Option<Association>, StorageError> {
    let sql = format!(
        "SELECT {SELECT_COLUMNS} FROM associations \
         WHERE parent_scope = ?1 AND parent_name = ?2 AND child_scope = ?3 AND child_name = ?4"
    );
    tx.query_row(
        &sql,
        params![parent.scope, parent.name, child.scope, child.name],
        row_to_association,
    )
    .optional()
    .map_err(sqe)
}

/// Insert one edge (spec §4.3 step 4).
pub fn insert_association(tx: &Transaction<'_>, assoc: &Association) -> Result<(), StorageError> {
    tx.execute(
        "INSERT INTO associations (\
            parent_scope, parent_name, child_scope, child_name, did_type, child_type, \
            bytes, adler32, md5, guid, events, rule_evaluation) \
         VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12)",
        params![
            assoc.parent_scope,
            assoc.parent_name,
            assoc.child_scope,
            assoc.child_name,
            assoc.did_type.as_str(),
            assoc.child_type.as_str(),
            assoc.bytes,
            assoc.adler32,
            assoc.md5,
            assoc.guid,
            assoc.events,
            assoc.rule_evaluation,
        ],
    )
    .map_err(sqe)?;
    Ok(())
}

/// Remove one edge (spec §4.4 step 2). Returns whether a row was removed.
pub fn delete_association(
    tx: &Transaction<'_>,
    parent: &DidKey,
    child: &DidKey,
) -> Result<bool, StorageError> {
    let affected = tx
        .execute(
            "DELETE FROM associations \
             WHERE parent_scope = ?1 AND parent_name = ?2 AND child_scope = ?3 AND child_name = ?4",
            params![parent.scope, parent.name, child.scope, child.name],
        )
        .map_err(sqe)?;
    Ok(affected > 0)
}

/// Direct children of a parent (spec §4.8 `one_did_childs`; also used by
/// Detach/Delete to enumerate the set to cascade over).
pub fn list_children(tx: &Transaction<'_>, parent: &DidKey) -> Result<Vec<Association>, StorageError> {
    let sql = format!(
        "SELECT {SELECT_COLUMNS} FROM associations WHERE parent_scope = ?1 AND parent_name = ?2"
    );
    let mut stmt = tx.prepare_cached(&sql).map_err(sqe)?;
    let rows = stmt
        .query_map(params![parent.scope, parent.name], row_to_association)
        .map_err(sqe)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row.map_err(sqe)?);
    }
    Ok(out)
}

/// Direct parents of a child (spec §4.1 `list_parent_dids`).
pub fn list_parents(tx: &Transaction<'_>, child: &DidKey) -> Result<Vec<Association>, StorageError> {
    let sql = format!(
        "SELECT {SELECT_COLUMNS} FROM associations WHERE child_scope = ?1 AND child_name = ?2"
    );
    let mut stmt = tx.prepare_cached(&sql).map_err(sqe)?;
    let rows = stmt
        .query_map(params![child.scope, child.name], row_to_association)
        .map_err(sqe)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row.map_err(sqe)?);
    }
    Ok(out)
}

/// Count of direct children, used to decide whether a DATASET/CONTAINER is
/// now empty after a detach (spec §4.4 step 3).
pub fn count_children(tx: &Transaction<'_>, parent: &DidKey) -> Result<i64, StorageError> {
    tx.query_row(
        "SELECT COUNT(*) FROM associations WHERE parent_scope = ?1 AND parent_name = ?2",
        params![parent.scope, parent.name],
        |row| row.get(0),
    )
    .map_err(sqe)
}

/// Remove every edge originating from `parent` (spec §4.5 Phase E:
/// "Delete all Associations originating from the collection inputs").
pub fn delete_all_from_parent(tx: &Transaction<'_>, parent: &DidKey) -> Result<(), StorageError> {
    tx.execute(
        "DELETE FROM associations WHERE parent_scope = ?1 AND parent_name = ?2",
        params![parent.scope, parent.name],
    )
    .map_err(sqe)?;
    Ok(())
}

/// Flip `rule_evaluation` on a set of edges (spec §4.3 step 5 note: edges
/// feeding an already-evaluated rule get re-flagged).
pub fn mark_rule_evaluation(
    tx: &Transaction<'_>,
    parent: &DidKey,
    child: &DidKey,
) -> Result<(), StorageError> {
    tx.execute(
        "UPDATE associations SET rule_evaluation = 1 \
         WHERE parent_scope = ?1 AND parent_name = ?2 AND child_scope = ?3 AND child_name = ?4",
        params![parent.scope, parent.name, child.scope, child.name],
    )
    .map_err(sqe)?;
    Ok(())
}
