//! Dataset sub-routine (spec §4.3.2).

use std::collections::HashMap;

use catalog_core::errors::CatalogError;
use catalog_core::traits::ReplicaEngine;
use catalog_core::types::{Association, Availability, Did, DidKey, DidType};
use catalog_storage::queries::{associations, dids};
use catalog_storage::CatalogTx;

use super::ChildAttachment;

/// Attach a batch of FILE children to a DATASET parent. Returns the set
/// of newly inserted child keys (spec §4.3.2: "used by the caller to
/// decide whether to emit the Updated-DID marker").
pub fn attach_files_to_dataset(
    tx: &mut CatalogTx<'_>,
    parent: &Did,
    children: &[ChildAttachment],
    ignore_duplicate: bool,
    rse_id: Option<&str>,
    replica_engine: &dyn ReplicaEngine,
) -> Result<Vec<DidKey>, CatalogError> {
    let parent_key = DidKey::new(parent.scope.clone(), parent.name.clone());

    // Stage the batch's child keys into a scratch table and outer-join
    // against `dids` in one query (spec §4.3.2: "Outer-join children
    // against DIDs"), rather than one `get_did` round-trip per child.
    let child_keys: Vec<DidKey> = children.iter().map(|c| c.key()).collect();
    let temp_table = tx.mint_did_key_table()?;
    dids::insert_keys_into_temp(tx.raw(), &temp_table.name, &child_keys)?;
    let existing_by_key: HashMap<DidKey, Did> = dids::select_existing_by_temp_keys(tx.raw(), &temp_table.name)?
        .into_iter()
        .map(|d| (DidKey::new(d.scope.clone(), d.name.clone()), d))
        .collect();

    let mut staged = Vec::new();
    let mut new_keys = Vec::new();
    let mut parent_becomes_archive = false;

    for child in children {
        let key = child.key();

        let existing = existing_by_key
            .get(&key)
            .cloned()
            .ok_or_else(|| CatalogError::DidNotFound {
                scope: key.scope.clone(),
                name: key.name.clone(),
            })?;

        if existing.did_type != DidType::File {
            return Err(CatalogError::UnsupportedOperation {
                scope: key.scope.clone(),
                name: key.name.clone(),
                reason: "only FILE DIDs may attach to a DATASET".to_string(),
            });
        }
        if existing.availability == Some(Availability::Lost) {
            return Err(CatalogError::UnsupportedOperation {
                scope: key.scope.clone(),
                name: key.name.clone(),
                reason: "cannot attach a FILE with availability=LOST".to_string(),
            });
        }

        if let Some(bytes) = child.bytes {
            if existing.bytes != Some(bytes) {
                return Err(CatalogError::FileConsistencyMismatch {
                    scope: key.scope.clone(),
                    name: key.name.clone(),
                    reason: format!("bytes mismatch: supplied {bytes}, stored {:?}", existing.bytes),
                });
            }
        }
        if let Some(adler32) = &child.adler32 {
            if existing.adler32.as_deref() != Some(adler32.as_str()) {
                return Err(CatalogError::FileConsistencyMismatch {
                    scope: key.scope.clone(),
                    name: key.name.clone(),
                    reason: "adler32 mismatch".to_string(),
                });
            }
        }
        if let Some(md5) = &child.md5 {
            if existing.md5.as_deref() != Some(md5.as_str()) {
                return Err(CatalogError::FileConsistencyMismatch {
                    scope: key.scope.clone(),
                    name: key.name.clone(),
                    reason: "md5 mismatch".to_string(),
                });
            }
        }

        if ignore_duplicate
            && associations::get_association(tx.raw(), &parent_key, &key)?.is_some()
        {
            continue;
        }

        if existing.is_archive {
            parent_becomes_archive = true;
        }

        staged.push(Association {
            parent_scope: parent_key.scope.clone(),
            parent_name: parent_key.name.clone(),
            child_scope: key.scope.clone(),
            child_name: key.name.clone(),
            did_type: DidType::Dataset,
            child_type: DidType::File,
            bytes: existing.bytes,
            adler32: existing.adler32.clone(),
            md5: existing.md5.clone(),
            guid: existing.guid.clone(),
            events: existing.events,
            rule_evaluation: true,
        });
        new_keys.push(key);
    }

    if let Some(rse_id) = rse_id {
        if !new_keys.is_empty() {
            replica_engine.register_replicas(rse_id, &new_keys)?;
        }
    }

    for assoc in &staged {
        associations::insert_association(tx.raw(), assoc)?;
    }
    if parent_becomes_archive {
        dids::mark_is_archive(tx.raw(), &[parent_key])?;
    }

    Ok(new_keys)
}
