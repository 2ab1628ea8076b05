//! Recursive DAG traversal over `associations`, expressed as `WITH
//! RECURSIVE` CTEs rather than in-memory recursive generators (spec §9:
//! "Recursive generator functions... reimplement as a recursive SQL CTE
//! or an explicit worklist, not a Rust generator/coroutine").

use catalog_core::errors::StorageError;
use catalog_core::types::{DidKey, DidType};
use rusqlite::{params, Transaction};

use crate::connection::sqe;

/// Every DID reachable downward from `root`, at any depth, deduplicated
/// (spec §4.8: `child_dids`). Does not include `root` itself.
pub fn recursive_descendants(
    tx: &Transaction<'_>,
    root: &DidKey,
) -> Result<Vec<(DidKey, DidType)>, StorageError> {
    let mut stmt = tx
        .prepare_cached(
            "WITH RECURSIVE descend(scope, name) AS ( \
                SELECT child_scope, child_name FROM associations \
                WHERE parent_scope = ?1 AND parent_name = ?2 \
                UNION \
                SELECT a.child_scope, a.child_name FROM associations a \
                JOIN descend d ON a.parent_scope = d.scope AND a.parent_name = d.name \
             ) \
             SELECT descend.scope, descend.name, dids.did_type FROM descend \
             JOIN dids ON dids.scope = descend.scope AND dids.name = descend.name",
        )
        .map_err(sqe)?;
    let rows = stmt
        .query_map(params![root.scope, root.name], |row| {
            let did_type_s: String = row.get(2)?;
            Ok((
                DidKey::new(row.get::<_, String>(0)?, row.get::<_, String>(1)?),
                did_type_s,
            ))
        })
        .map_err(sqe)?;
    let mut out = Vec::new();
    for row in rows {
        let (key, did_type_s) = row.map_err(sqe)?;
        let did_type = DidType::from_str_opt(&did_type_s).unwrap_or(DidType::File);
        out.push((key, did_type));
    }
    Ok(out)
}

/// Only the FILE leaves reachable downward from `root` (spec §4.1
/// `list_files`: recursive descent stopping at FILE DIDs).
pub fn recursive_files(tx: &Transaction<'_>, root: &DidKey) -> Result<Vec<DidKey>, StorageError> {
    Ok(recursive_descendants(tx, root)?
        .into_iter()
        .filter(|(_, t)| *t == DidType::File)
        .map(|(k, _)| k)
        .collect())
}

/// Every DID reachable upward from `child`, at any depth, deduplicated
/// (spec §4.1 `list_all_parent_dids`).
pub fn recursive_ancestors(
    tx: &Transaction<'_>,
    child: &DidKey,
) -> Result<Vec<DidKey>, StorageError> {
    let mut stmt = tx
        .prepare_cached(
            "WITH RECURSIVE ascend(scope, name) AS ( \
                SELECT parent_scope, parent_name FROM associations \
                WHERE child_scope = ?1 AND child_name = ?2 \
                UNION \
                SELECT a.parent_scope, a.parent_name FROM associations a \
                JOIN ascend u ON a.child_scope = u.scope AND a.child_name = u.name \
             ) \
             SELECT scope, name FROM ascend",
        )
        .map_err(sqe)?;
    let rows = stmt
        .query_map(params![child.scope, child.name], |row| {
            Ok(DidKey::new(row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })
        .map_err(sqe)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row.map_err(sqe)?);
    }
    Ok(out)
}

/// Association `did_type` values a descent may cross to reach DIDs of
/// `target_type` (spec §4.8 `child_dids`: "if `target_type=DATASET` follow
/// only CONTAINER→* edges, if `target_type=FILE` follow CONTAINER→* and
/// DATASET→* edges").
fn allowed_edge_types(target_type: DidType) -> &'static [&'static str] {
    match target_type {
        DidType::Dataset => &["CONTAINER"],
        DidType::File => &["CONTAINER", "DATASET"],
        DidType::Container => &[],
    }
}

/// Single-DID variant of `child_dids` (spec §4.8 `one_did_childs`): every
/// DID of `target_type` reachable from `root` by crossing only the edge
/// types `target_type` permits.
pub fn one_did_childs(
    tx: &Transaction<'_>,
    root: &DidKey,
    target_type: DidType,
) -> Result<Vec<DidKey>, StorageError> {
    let allowed = allowed_edge_types(target_type);
    if allowed.is_empty() {
        return Ok(Vec::new());
    }
    // Two fixed shapes only (spec §4.8 distinguishes DATASET- and
    // FILE-depth descent); build the IN-clause per shape rather than a
    // general N-ary placeholder scheme.
    let in_clause = match allowed.len() {
        1 => "(?3)".to_string(),
        _ => "(?3, ?4)".to_string(),
    };
    let target_param = format!("?{}", allowed.len() + 3);
    let sql = format!(
        "WITH RECURSIVE descend(scope, name) AS ( \
            SELECT child_scope, child_name FROM associations \
            WHERE parent_scope = ?1 AND parent_name = ?2 AND did_type IN {in_clause} \
            UNION \
            SELECT a.child_scope, a.child_name FROM associations a \
            JOIN descend d ON a.parent_scope = d.scope AND a.parent_name = d.name \
            WHERE a.did_type IN {in_clause} \
         ) \
         SELECT descend.scope, descend.name FROM descend \
         JOIN dids ON dids.scope = descend.scope AND dids.name = descend.name \
         WHERE dids.did_type = {target_param}"
    );

    let mut stmt = tx.prepare(&sql).map_err(sqe)?;
    let rows = match allowed.len() {
        1 => stmt.query_map(
            params![root.scope, root.name, allowed[0], target_type.as_str()],
            |row| Ok(DidKey::new(row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
        ),
        _ => stmt.query_map(
            params![root.scope, root.name, allowed[0], allowed[1], target_type.as_str()],
            |row| Ok(DidKey::new(row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
        ),
    }
    .map_err(sqe)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row.map_err(sqe)?);
    }
    Ok(out)
}

/// `child_dids` (spec §4.8): descend from a set of roots, return the
/// distinct union of `one_did_childs` over each.
pub fn child_dids(
    tx: &Transaction<'_>,
    roots: &[DidKey],
    target_type: DidType,
) -> Result<Vec<DidKey>, StorageError> {
    use std::collections::HashSet;
    let mut seen: HashSet<DidKey> = HashSet::new();
    let mut out = Vec::new();
    for root in roots {
        for key in one_did_childs(tx, root, target_type)? {
            if seen.insert(key.clone()) {
                out.push(key);
            }
        }
    }
    Ok(out)
}

/// Would attaching `child` under `parent` create a cycle (spec §4.3 step
/// 1 / §8 invariant: "the catalog is a DAG — attach must refuse any edge
/// that would close a cycle")?
///
/// A cycle forms exactly when `parent` is already reachable downward from
/// `child` — i.e. `parent` is one of `child`'s existing descendants, or
/// `parent == child`.
pub fn would_create_cycle(
    tx: &Transaction<'_>,
    parent: &DidKey,
    child: &DidKey,
) -> Result<bool, StorageError> {
    if parent == child {
        return Ok(true);
    }
    let descendants = recursive_descendants(tx, child)?;
    Ok(descendants.iter().any(|(key, _)| key == parent))
}
