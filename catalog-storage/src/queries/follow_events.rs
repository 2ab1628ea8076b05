//! `follow_events` table queries — the per-account digest queue (spec
//! §4.9 `trigger_event` / `create_reports`).

use catalog_core::errors::StorageError;
use catalog_core::types::{DidType, FollowEvent};
use rusqlite::{params, Row, Transaction};

use crate::connection::sqe;

fn row_to_event(row: &Row<'_>) -> rusqlite::Result<FollowEvent> {
    let did_type_s: String = row.get("did_type")?;
    Ok(FollowEvent {
        scope: row.get("scope")?,
        name: row.get("name")?,
        account: row.get("account")?,
        did_type: DidType::from_str_opt(&did_type_s).unwrap_or(DidType::Dataset),
        event_type: row.get("event_type")?,
        payload: row.get("payload")?,
        created_at: row.get("created_at")?,
    })
}

/// Record one event for later digest delivery (spec §4.9 `trigger_event`).
pub fn insert_event(tx: &Transaction<'_>, event: &FollowEvent) -> Result<(), StorageError> {
    tx.execute(
        "INSERT INTO follow_events (scope, name, account, did_type, event_type, payload, created_at) \
         VALUES (?1,?2,?3,?4,?5,?6,?7)",
        params![
            event.scope,
            event.name,
            event.account,
            event.did_type.as_str(),
            event.event_type,
            event.payload,
            event.created_at,
        ],
    )
    .map_err(sqe)?;
    Ok(())
}

/// Read the pending digest for one account, without clearing it (spec
/// §9's resolution of the `create_reports` ordering concern: deletion is
/// batched after the digest message is successfully enqueued, not
/// row-by-row inside the same loop that reads them).
pub fn list_events_for_account(
    tx: &Transaction<'_>,
    account: &str,
) -> Result<Vec<FollowEvent>, StorageError> {
    let mut stmt = tx
        .prepare_cached(
            "SELECT scope, name, account, did_type, event_type, payload, created_at \
             FROM follow_events WHERE account = ?1 ORDER BY created_at ASC",
        )
        .map_err(sqe)?;
    let rows = stmt.query_map(params![account], row_to_event).map_err(sqe)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row.map_err(sqe)?);
    }
    Ok(out)
}

/// Clear an account's pending digest after it has been successfully
/// handed to the `MessageSink`.
pub fn delete_events_for_account(tx: &Transaction<'_>, account: &str) -> Result<(), StorageError> {
    tx.execute("DELETE FROM follow_events WHERE account = ?1", params![account])
        .map_err(sqe)?;
    Ok(())
}

/// Distinct accounts with at least one pending event (spec §4.9
/// `create_reports`: iterate accounts with queued events).
pub fn list_accounts_with_pending_events(tx: &Transaction<'_>) -> Result<Vec<String>, StorageError> {
    let mut stmt = tx
        .prepare_cached("SELECT DISTINCT account FROM follow_events")
        .map_err(sqe)?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0)).map_err(sqe)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row.map_err(sqe)?);
    }
    Ok(out)
}
