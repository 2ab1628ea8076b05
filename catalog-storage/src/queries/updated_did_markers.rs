//! `updated_dids` — pending rule-re-evaluation markers the external rule
//! engine drains (spec §3, §4.3 step 5, §4.4 step 3).

use catalog_core::errors::StorageError;
use catalog_core::types::{DidAction, UpdatedDidMarker};
use rusqlite::{params, Transaction};

use crate::connection::sqe;

/// Insert a marker, deduplicated against an identical pending marker
/// (spec §4.3 step 5: "Deduplicate emitted markers across the batch").
pub fn insert_marker(tx: &Transaction<'_>, marker: &UpdatedDidMarker) -> Result<(), StorageError> {
    tx.execute(
        "INSERT OR IGNORE INTO updated_dids (scope, name, action) VALUES (?1, ?2, ?3)",
        params![marker.scope, marker.name, marker.action.as_str()],
    )
    .map_err(sqe)?;
    Ok(())
}

/// Insert a deduplicated batch of markers in one go.
pub fn insert_markers(
    tx: &Transaction<'_>,
    markers: &std::collections::HashSet<UpdatedDidMarker>,
) -> Result<(), StorageError> {
    for marker in markers {
        insert_marker(tx, marker)?;
    }
    Ok(())
}

/// Drain up to `limit` markers for the external rule engine to consume
/// (spec §4.3/§4.4: the markers are the handoff point to Judge).
pub fn drain_markers(
    tx: &Transaction<'_>,
    limit: i64,
) -> Result<Vec<UpdatedDidMarker>, StorageError> {
    let mut stmt = tx
        .prepare_cached("SELECT scope, name, action FROM updated_dids LIMIT ?1")
        .map_err(sqe)?;
    let rows = stmt
        .query_map(params![limit], |row| {
            let action_s: String = row.get(2)?;
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                action_s,
            ))
        })
        .map_err(sqe)?;
    let mut out = Vec::new();
    for row in rows {
        let (scope, name, action_s) = row.map_err(sqe)?;
        let action = match action_s.as_str() {
            "ATTACH" => DidAction::Attach,
            _ => DidAction::Detach,
        };
        let marker = UpdatedDidMarker::new(scope.clone(), name.clone(), action);
        tx.execute(
            "DELETE FROM updated_dids WHERE scope = ?1 AND name = ?2 AND action = ?3",
            params![scope, name, action.as_str()],
        )
        .map_err(sqe)?;
        out.push(marker);
    }
    Ok(out)
}
