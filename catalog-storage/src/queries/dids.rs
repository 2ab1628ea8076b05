//! `dids` table queries.

use std::collections::BTreeMap;

use catalog_core::errors::StorageError;
use catalog_core::types::{Availability, Did, DidKey, DidType};
use rusqlite::{params, OptionalExtension, Row, Transaction};

use crate::connection::sqe;

fn did_type_str(t: DidType) -> &'static str {
    t.as_str()
}

fn parse_did_type(s: &str) -> Result<DidType, StorageError> {
    DidType::from_str_opt(s).ok_or_else(|| StorageError::SqliteError {
        message: format!("unknown did_type in storage: {s}"),
    })
}

fn parse_extra(s: &str) -> BTreeMap<String, serde_json::Value> {
    serde_json::from_str(s).unwrap_or_default()
}

fn dump_extra(extra: &BTreeMap<String, serde_json::Value>) -> String {
    serde_json::to_string(extra).unwrap_or_else(|_| "{}".to_string())
}

fn row_to_did(row: &Row<'_>) -> rusqlite::Result<Did> {
    let did_type_s: String = row.get("did_type")?;
    let availability_s: Option<String> = row.get("availability")?;
    let extra_s: String = row.get("extra_json")?;
    Ok(Did {
        scope: row.get("scope")?,
        name: row.get("name")?,
        did_type: DidType::from_str_opt(&did_type_s).unwrap_or(DidType::File),
        account: row.get("account")?,
        is_open: row.get("is_open")?,
        monotonic: row.get("monotonic")?,
        expired_at: row.get("expired_at")?,
        created_at: row.get("created_at")?,
        closed_at: row.get("closed_at")?,
        accessed_at: row.get("accessed_at")?,
        access_cnt: row.get("access_cnt")?,
        bytes: row.get("bytes")?,
        length: row.get("length")?,
        events: row.get("events")?,
        md5: row.get("md5")?,
        adler32: row.get("adler32")?,
        guid: row.get("guid")?,
        availability: availability_s.as_deref().and_then(Availability::from_str_opt),
        is_archive: row.get("is_archive")?,
        constituent: row.get("constituent")?,
        is_new: row.get("is_new")?,
        purge_replicas: row.get("purge_replicas")?,
        hidden: row.get("hidden")?,
        obsolete: row.get("obsolete")?,
        complete: row.get("complete")?,
        suppressed: row.get("suppressed")?,
        extra: parse_extra(&extra_s),
    })
}

const SELECT_COLUMNS: &str = "scope, name, did_type, account, is_open, monotonic, expired_at, \
     created_at, closed_at, accessed_at, access_cnt, bytes, length, events, md5, adler32, guid, \
     availability, is_archive, constituent, is_new, purge_replicas, hidden, obsolete, complete, \
     suppressed, extra_json";

/// Fetch one DID by key.
pub fn get_did(tx: &Transaction<'_>, key: &DidKey) -> Result<Option<Did>, StorageError> {
    let sql = format!("SELECT {SELECT_COLUMNS} FROM dids WHERE scope = ?1 AND name = ?2");
    tx.query_row(&sql, params![key.scope, key.name], row_to_did)
        .optional()
        .map_err(sqe)
}

/// Insert a brand-new DID (spec §4.3.1/§4.3.2: created implicitly via
/// attach; spec §6 `add_dids`: created explicitly).
pub fn insert_did(tx: &Transaction<'_>, did: &Did) -> Result<(), StorageError> {
    tx.execute(
        "INSERT INTO dids (\
            scope, name, did_type, account, is_open, monotonic, expired_at, created_at, \
            closed_at, accessed_at, access_cnt, bytes, length, events, md5, adler32, guid, \
            availability, is_archive, constituent, is_new, purge_replicas, hidden, obsolete, \
            complete, suppressed, extra_json) \
         VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13,?14,?15,?16,?17,?18,?19,?20,?21,?22,?23,?24,?25,?26,?27)",
        params![
            did.scope,
            did.name,
            did_type_str(did.did_type),
            did.account,
            did.is_open,
            did.monotonic,
            did.expired_at,
            did.created_at,
            did.closed_at,
            did.accessed_at,
            did.access_cnt,
            did.bytes,
            did.length,
            did.events,
            did.md5,
            did.adler32,
            did.guid,
            did.availability.map(Availability::as_str),
            did.is_archive,
            did.constituent,
            did.is_new,
            did.purge_replicas,
            did.hidden,
            did.obsolete,
            did.complete,
            did.suppressed,
            dump_extra(&did.extra),
        ],
    )
    .map_err(sqe)?;
    Ok(())
}

/// Bulk-insert new DIDs (spec §4.3.1: "Bulk-insert new DIDs").
pub fn bulk_insert_dids(tx: &Transaction<'_>, dids: &[Did]) -> Result<(), StorageError> {
    for did in dids {
        insert_did(tx, did)?;
    }
    Ok(())
}

/// Mark a set of FILE DIDs `constituent = true` (spec §4.3.1: "flip
/// `constituent` on any pre-existing FILEs that needed it").
pub fn mark_constituent(tx: &Transaction<'_>, keys: &[DidKey]) -> Result<(), StorageError> {
    let mut stmt = tx
        .prepare_cached("UPDATE dids SET constituent = 1 WHERE scope = ?1 AND name = ?2")
        .map_err(sqe)?;
    for key in keys {
        stmt.execute(params![key.scope, key.name]).map_err(sqe)?;
    }
    Ok(())
}

/// Set `is_archive = true` on a set of DIDs (spec §4.3.1: "propagate
/// `is_archive=true`" / §4.3.2: "If the child FILE is itself an archive").
pub fn mark_is_archive(tx: &Transaction<'_>, keys: &[DidKey]) -> Result<(), StorageError> {
    let mut stmt = tx
        .prepare_cached("UPDATE dids SET is_archive = 1 WHERE scope = ?1 AND name = ?2")
        .map_err(sqe)?;
    for key in keys {
        stmt.execute(params![key.scope, key.name]).map_err(sqe)?;
    }
    Ok(())
}

/// Close a DATASET/CONTAINER: freeze aggregates and flip `is_open`
/// (spec §4.6 steps 3-5).
#[allow(clippy::too_many_arguments)]
pub fn close_did(
    tx: &Transaction<'_>,
    key: &DidKey,
    closed_at: i64,
    bytes: i64,
    length: i64,
    events: i64,
    mark_new: bool,
) -> Result<(), StorageError> {
    tx.execute(
        "UPDATE dids SET is_open = 0, closed_at = ?1, bytes = ?2, length = ?3, events = ?4, \
         is_new = CASE WHEN ?5 THEN 1 ELSE is_new END \
         WHERE scope = ?6 AND name = ?7",
        params![closed_at, bytes, length, events, mark_new, key.scope, key.name],
    )
    .map_err(sqe)?;
    Ok(())
}

/// Reopen a closed DATASET/CONTAINER (spec §4.6: "Reopen requires the DID
/// currently be closed").
pub fn reopen_did(tx: &Transaction<'_>, key: &DidKey) -> Result<(), StorageError> {
    tx.execute(
        "UPDATE dids SET is_open = 1, closed_at = NULL WHERE scope = ?1 AND name = ?2",
        params![key.scope, key.name],
    )
    .map_err(sqe)?;
    Ok(())
}

/// Decrement a DATASET/CONTAINER's cached aggregates (spec §4.4 step 3).
pub fn decrement_parent_aggregates(
    tx: &Transaction<'_>,
    key: &DidKey,
    bytes_delta: Option<i64>,
    events_delta: Option<i64>,
) -> Result<(), StorageError> {
    tx.execute(
        "UPDATE dids SET \
            length = COALESCE(length, 0) - 1, \
            bytes = CASE WHEN ?1 IS NOT NULL AND bytes IS NOT NULL THEN bytes - ?1 ELSE bytes END, \
            events = CASE WHEN ?2 IS NOT NULL AND events IS NOT NULL THEN events - ?2 ELSE events END \
         WHERE scope = ?3 AND name = ?4",
        params![bytes_delta, events_delta, key.scope, key.name],
    )
    .map_err(sqe)?;
    Ok(())
}

/// Clear `expired_at` (spec §4.5 Phase G for files; §4.10 resurrect).
pub fn clear_expiry(tx: &Transaction<'_>, key: &DidKey) -> Result<(), StorageError> {
    tx.execute(
        "UPDATE dids SET expired_at = NULL WHERE scope = ?1 AND name = ?2",
        params![key.scope, key.name],
    )
    .map_err(sqe)?;
    Ok(())
}

/// Set `expired_at` (spec §4.5 Phase A: "set the DID's lifetime to 24h"
/// on soft-expire).
pub fn set_expiry(tx: &Transaction<'_>, key: &DidKey, expires_at: i64) -> Result<(), StorageError> {
    tx.execute(
        "UPDATE dids SET expired_at = ?1 WHERE scope = ?2 AND name = ?3",
        params![expires_at, key.scope, key.name],
    )
    .map_err(sqe)?;
    Ok(())
}

/// Delete a DID row outright (spec §4.5 Phase G, for collections).
pub fn delete_did(tx: &Transaction<'_>, key: &DidKey) -> Result<(), StorageError> {
    tx.execute(
        "DELETE FROM dids WHERE scope = ?1 AND name = ?2",
        params![key.scope, key.name],
    )
    .map_err(sqe)?;
    Ok(())
}

/// Mark BadReplica-adjacent availability change is out of scope (replicas
/// are external); this only flips the in-catalog `availability` cache on a
/// FILE DID, used by tests that simulate a file going LOST.
pub fn set_availability(
    tx: &Transaction<'_>,
    key: &DidKey,
    availability: Availability,
) -> Result<(), StorageError> {
    tx.execute(
        "UPDATE dids SET availability = ?1 WHERE scope = ?2 AND name = ?3",
        params![availability.as_str(), key.scope, key.name],
    )
    .map_err(sqe)?;
    Ok(())
}

/// A page of DIDs with `expired_at` set, ordered by `expired_at` ascending
/// (spec §4.7). Sharding by worker is applied by the caller (client-side
/// stable hash, since SQLite has no hash-pushdown predicate).
pub fn select_expired_candidates(
    tx: &Transaction<'_>,
    limit: i64,
) -> Result<Vec<(DidKey, DidType, i64, bool)>, StorageError> {
    let mut stmt = tx
        .prepare_cached(
            "SELECT scope, name, did_type, created_at, purge_replicas FROM dids \
             WHERE expired_at IS NOT NULL AND expired_at < strftime('%s','now') \
             ORDER BY expired_at ASC LIMIT ?1",
        )
        .map_err(sqe)?;
    let rows = stmt
        .query_map(params![limit], |row| {
            let did_type_s: String = row.get(2)?;
            Ok((
                DidKey::new(row.get::<_, String>(0)?, row.get::<_, String>(1)?),
                did_type_s,
                row.get::<_, i64>(3)?,
                row.get::<_, bool>(4)?,
            ))
        })
        .map_err(sqe)?;
    let mut out = Vec::new();
    for row in rows {
        let (key, did_type_s, created_at, purge_replicas) = row.map_err(sqe)?;
        out.push((key, parse_did_type(&did_type_s)?, created_at, purge_replicas));
    }
    Ok(out)
}

/// DIDs flagged `is_new = true` of a given type (spec §4.7).
pub fn select_new_candidates(
    tx: &Transaction<'_>,
    did_type: DidType,
    limit: i64,
    offset: i64,
) -> Result<Vec<DidKey>, StorageError> {
    let mut stmt = tx
        .prepare_cached(
            "SELECT scope, name FROM dids WHERE is_new = 1 AND did_type = ?1 \
             LIMIT ?2 OFFSET ?3",
        )
        .map_err(sqe)?;
    let rows = stmt
        .query_map(params![did_type_str(did_type), limit, offset], |row| {
            Ok(DidKey::new(row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })
        .map_err(sqe)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row.map_err(sqe)?);
    }
    Ok(out)
}

/// Fetch every live DID whose `(scope, name)` is staged in a
/// `(scope, name)`-shaped temp table (spec §4.3: "Outer-join children
/// against DIDs to detect which already exist"). `temp_table` must be a
/// table name minted by `TempTableManager::mint_did_keys` — it is
/// interpolated directly since SQLite has no table-name bind parameter,
/// never from caller-controlled input.
pub fn select_existing_by_temp_keys(
    tx: &Transaction<'_>,
    temp_table: &str,
) -> Result<Vec<Did>, StorageError> {
    let sql = format!(
        "SELECT {SELECT_COLUMNS} FROM dids \
         JOIN {temp_table} t ON t.scope = dids.scope AND t.name = dids.name"
    );
    let mut stmt = tx.prepare(&sql).map_err(sqe)?;
    let rows = stmt.query_map([], row_to_did).map_err(sqe)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row.map_err(sqe)?);
    }
    Ok(out)
}

/// Insert a batch of `(scope, name)` keys into a staged temp table (spec
/// §4.3 step 1: "Create/clear a temp table of children, insert all child
/// keys").
pub fn insert_keys_into_temp(
    tx: &Transaction<'_>,
    temp_table: &str,
    keys: &[DidKey],
) -> Result<(), StorageError> {
    let sql = format!("INSERT INTO {temp_table} (scope, name) VALUES (?1, ?2)");
    let mut stmt = tx.prepare_cached(&sql).map_err(sqe)?;
    for key in keys {
        stmt.execute(params![key.scope, key.name]).map_err(sqe)?;
    }
    Ok(())
}

/// Clear `is_new` on one DID, used by `list_new_dids` consumers and tests.
pub fn clear_is_new(tx: &Transaction<'_>, key: &DidKey) -> Result<(), StorageError> {
    tx.execute(
        "UPDATE dids SET is_new = 0 WHERE scope = ?1 AND name = ?2",
        params![key.scope, key.name],
    )
    .map_err(sqe)?;
    Ok(())
}
