//! Detach Engine (spec §4.4).

use catalog_core::errors::CatalogError;
use catalog_core::events::{DetachPayload, Event};
use catalog_core::traits::MessageSink;
use catalog_core::types::{AssociationHistory, DidAction, DidKey, DidType, UpdatedDidMarker};
use catalog_storage::queries::{associations, association_history, dids, updated_did_markers};
use catalog_storage::CatalogTx;

/// `detach_dids(scope, name, children)` (spec §4.4).
pub fn detach(
    tx: &mut CatalogTx<'_>,
    parent_key: &DidKey,
    children: &[DidKey],
    message_sink: &dyn MessageSink,
    now: i64,
) -> Result<(), CatalogError> {
    let parent = tx
        .lock_did_for_update(parent_key)?
        .ok_or_else(|| CatalogError::DidNotFound {
            scope: parent_key.scope.clone(),
            name: parent_key.name.clone(),
        })?;

    if parent.did_type != DidType::Dataset && parent.did_type != DidType::Container {
        return Err(CatalogError::UnsupportedOperation {
            scope: parent.scope.clone(),
            name: parent.name.clone(),
            reason: "only DATASET or CONTAINER DIDs have detachable children".to_string(),
        });
    }

    updated_did_markers::insert_marker(
        tx.raw(),
        &UpdatedDidMarker::new(parent.scope.clone(), parent.name.clone(), DidAction::Detach),
    )?;

    if associations::count_children(tx.raw(), parent_key)? == 0 {
        return Err(CatalogError::DidNotFound {
            scope: parent.scope.clone(),
            name: parent.name.clone(),
        });
    }

    for child_key in children {
        if child_key == parent_key {
            return Err(CatalogError::UnsupportedOperation {
                scope: child_key.scope.clone(),
                name: child_key.name.clone(),
                reason: "a DID cannot detach itself".to_string(),
            });
        }

        let assoc = associations::get_association(tx.raw(), parent_key, child_key)?
            .ok_or_else(|| CatalogError::DidNotFound {
                scope: child_key.scope.clone(),
                name: child_key.name.clone(),
            })?;

        let bytes_delta = if parent.bytes.is_some() && assoc.bytes.is_some() {
            assoc.bytes
        } else {
            None
        };
        let events_delta = if parent.events.is_some() && assoc.events.is_some() {
            assoc.events
        } else {
            None
        };
        dids::decrement_parent_aggregates(tx.raw(), parent_key, bytes_delta, events_delta)?;

        association_history::insert_history(
            tx.raw(),
            &AssociationHistory {
                parent_scope: assoc.parent_scope.clone(),
                parent_name: assoc.parent_name.clone(),
                child_scope: assoc.child_scope.clone(),
                child_name: assoc.child_name.clone(),
                did_type: assoc.did_type,
                child_type: assoc.child_type,
                bytes: assoc.bytes,
                adler32: assoc.adler32.clone(),
                md5: assoc.md5.clone(),
                guid: assoc.guid.clone(),
                events: assoc.events,
                did_created_at: Some(parent.created_at),
                deleted_at: now,
            },
        )?;

        associations::delete_association(tx.raw(), parent_key, child_key)?;

        message_sink.emit(Event::Detach(DetachPayload {
            scope: parent.scope.clone(),
            name: parent.name.clone(),
            did_type: parent.did_type,
            child_scope: child_key.scope.clone(),
            child_name: child_key.name.clone(),
            child_type: assoc.child_type,
            vo: None,
        }))?;
        if parent.did_type == DidType::Container {
            message_sink.emit(Event::EraseCnt(catalog_core::events::ErasePayload {
                account: parent.account.clone(),
                scope: child_key.scope.clone(),
                name: child_key.name.clone(),
                vo: None,
            }))?;
        }
    }

    Ok(())
}
