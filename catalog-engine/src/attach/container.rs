//! Container sub-routine (spec §4.3.3).

use catalog_core::errors::CatalogError;
use catalog_core::events::{Event, RegisterCntPayload};
use catalog_core::traits::MessageSink;
use catalog_core::types::{Association, Did, DidKey, DidType};
use catalog_storage::queries::{associations, dids, graph};
use catalog_storage::CatalogTx;

use super::ChildAttachment;

/// Attach a batch of children (all DATASETs or all CONTAINERs) to a
/// CONTAINER parent. Returns the count of accepted (newly staged)
/// children.
pub fn attach_to_container(
    tx: &mut CatalogTx<'_>,
    parent: &Did,
    children: &[ChildAttachment],
    ignore_duplicate: bool,
    account: &str,
    message_sink: &dyn MessageSink,
) -> Result<usize, CatalogError> {
    let parent_key = DidKey::new(parent.scope.clone(), parent.name.clone());

    let mut observed_type: Option<DidType> = associations::list_children(tx.raw(), &parent_key)?
        .first()
        .map(|a| a.child_type);
    let mut staged = Vec::new();

    for child in children {
        let key = child.key();

        if key == parent_key {
            return Err(CatalogError::UnsupportedOperation {
                scope: key.scope.clone(),
                name: key.name.clone(),
                reason: "a CONTAINER cannot attach itself".to_string(),
            });
        }

        let existing = dids::get_did(tx.raw(), &key)?.ok_or_else(|| CatalogError::DidNotFound {
            scope: key.scope.clone(),
            name: key.name.clone(),
        })?;

        if existing.did_type == DidType::File {
            return Err(CatalogError::UnsupportedOperation {
                scope: key.scope.clone(),
                name: key.name.clone(),
                reason: "a CONTAINER cannot directly contain a FILE".to_string(),
            });
        }

        match observed_type {
            None => observed_type = Some(existing.did_type),
            Some(t) if t == existing.did_type => {}
            Some(_) => {
                return Err(CatalogError::UnsupportedOperation {
                    scope: key.scope.clone(),
                    name: key.name.clone(),
                    reason: "a CONTAINER's children must all share one type".to_string(),
                });
            }
        }

        if existing.did_type == DidType::Container
            && graph::would_create_cycle(tx.raw(), &parent_key, &key)?
        {
            return Err(CatalogError::UnsupportedOperation {
                scope: key.scope.clone(),
                name: key.name.clone(),
                reason: "attaching this CONTAINER would create a cycle".to_string(),
            });
        }

        if ignore_duplicate
            && associations::get_association(tx.raw(), &parent_key, &key)?.is_some()
        {
            continue;
        }

        staged.push((
            key.clone(),
            existing.did_type,
            Association {
                parent_scope: parent_key.scope.clone(),
                parent_name: parent_key.name.clone(),
                child_scope: key.scope.clone(),
                child_name: key.name.clone(),
                did_type: DidType::Container,
                child_type: existing.did_type,
                bytes: existing.bytes,
                adler32: existing.adler32.clone(),
                md5: existing.md5.clone(),
                guid: existing.guid.clone(),
                events: existing.events,
                rule_evaluation: true,
            },
        ));
    }

    for (_, _, assoc) in &staged {
        associations::insert_association(tx.raw(), assoc)?;
    }

    for (key, child_type, _) in &staged {
        message_sink.emit(Event::RegisterCnt(RegisterCntPayload {
            account: account.to_string(),
            scope: parent_key.scope.clone(),
            name: parent_key.name.clone(),
            child_scope: key.scope.clone(),
            child_name: key.name.clone(),
            child_type: *child_type,
            vo: None,
        }))?;
    }

    Ok(staged.len())
}
