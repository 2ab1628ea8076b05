//! Follow & Reports (spec §4.9).

use catalog_core::errors::CatalogError;
use catalog_core::events::{EmailPayload, Event};
use catalog_core::traits::{AccountDirectory, MessageSink};
use catalog_core::types::{DidKey, DidType, Follow, FollowEvent};
use catalog_storage::queries::{dids, follow_events, follows};
use catalog_storage::CatalogTx;

use crate::scan::shard_of;

/// `add_dids_to_followed` (spec §4.9).
pub fn add_dids_to_followed(
    tx: &CatalogTx<'_>,
    keys: &[DidKey],
    account: &str,
) -> Result<(), CatalogError> {
    for key in keys {
        let did = dids::get_did(tx.raw(), key)?.ok_or_else(|| CatalogError::DidNotFound {
            scope: key.scope.clone(),
            name: key.name.clone(),
        })?;
        follows::insert_follow(
            tx.raw(),
            &Follow {
                scope: key.scope.clone(),
                name: key.name.clone(),
                account: account.to_string(),
                did_type: did.did_type,
            },
        )?;
    }
    Ok(())
}

/// `remove_dids_from_followed` (spec §4.9).
pub fn remove_dids_from_followed(
    tx: &CatalogTx<'_>,
    keys: &[DidKey],
    account: &str,
) -> Result<(), CatalogError> {
    for key in keys {
        follows::delete_follow(tx.raw(), key, account)?;
    }
    Ok(())
}

/// `trigger_event`: append a FollowEvent for every follower of `key`
/// (spec §4.9).
pub fn trigger_event(
    tx: &CatalogTx<'_>,
    key: &DidKey,
    did_type: DidType,
    event_type: &str,
    payload: &str,
    now: i64,
) -> Result<(), CatalogError> {
    for follower in follows::list_followers(tx.raw(), key)? {
        follow_events::insert_event(
            tx.raw(),
            &FollowEvent {
                scope: key.scope.clone(),
                name: key.name.clone(),
                account: follower.account,
                did_type,
                event_type: event_type.to_string(),
                payload: payload.to_string(),
                created_at: now,
            },
        )?;
    }
    Ok(())
}

/// `create_reports(total_workers, worker_number)` (spec §4.9).
///
/// Per-account event deletion happens only after the digest message is
/// successfully handed to the `MessageSink` (spec §9's resolution of the
/// `create_reports` ordering concern: "batching per-account deletion after
/// successful message enqueue", not row-by-row inside the same read loop).
pub fn create_reports(
    tx: &CatalogTx<'_>,
    total_workers: u64,
    worker_number: u64,
    account_directory: &dyn AccountDirectory,
    message_sink: &dyn MessageSink,
) -> Result<(), CatalogError> {
    for account in follow_events::list_accounts_with_pending_events(tx.raw())? {
        if shard_of(&account, total_workers.max(1)) != worker_number {
            continue;
        }
        let events = follow_events::list_events_for_account(tx.raw(), &account)?;
        if events.is_empty() {
            continue;
        }
        let body = compose_digest(&events);
        if let Some(email) = account_directory.account_email(&account)? {
            message_sink.emit(Event::Email(EmailPayload {
                to: email,
                subject: format!("DID catalog digest for {account}"),
                body,
            }))?;
        }
        follow_events::delete_events_for_account(tx.raw(), &account)?;
    }
    Ok(())
}

fn compose_digest(events: &[FollowEvent]) -> String {
    events
        .iter()
        .map(|e| format!("{}: {}:{} {}", e.event_type, e.scope, e.name, e.payload))
        .collect::<Vec<_>>()
        .join("\n")
}
