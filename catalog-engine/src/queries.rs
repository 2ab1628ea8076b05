//! Get/List surface (ADDED — supplement from `did.py` / spec §6): thin
//! read operations and the bulk top-level creation/sampling entry points
//! spec §6's operation table names but doesn't walk through in prose.

use std::collections::HashSet;

use catalog_core::errors::CatalogError;
use catalog_core::types::{Association, Did, DidKey};
use catalog_storage::queries::{associations, dids, graph};
use catalog_storage::CatalogTx;

/// `get_did(scope, name)` (spec §6). Touches `accessed_at`/`access_cnt`.
pub fn get_did(tx: &CatalogTx<'_>, key: &DidKey, now: i64) -> Result<Did, CatalogError> {
    let did = dids::get_did(tx.raw(), key)?.ok_or_else(|| CatalogError::DidNotFound {
        scope: key.scope.clone(),
        name: key.name.clone(),
    })?;
    tx.touch_did(key, now)?;
    Ok(did)
}

/// `list_content(scope, name)` (spec §6): direct children of a collection.
pub fn list_content(tx: &CatalogTx<'_>, key: &DidKey) -> Result<Vec<Association>, CatalogError> {
    Ok(associations::list_children(tx.raw(), key)?)
}

/// `list_files(scope, name)` (spec §6): every FILE reachable downward,
/// deduplicated (spec §4.1, §4.8).
pub fn list_files(tx: &CatalogTx<'_>, key: &DidKey) -> Result<Vec<DidKey>, CatalogError> {
    Ok(graph::recursive_files(tx.raw(), key)?)
}

/// `list_parent_dids(scope, name)` (spec §6): direct parents only.
pub fn list_parent_dids(tx: &CatalogTx<'_>, key: &DidKey) -> Result<Vec<Association>, CatalogError> {
    Ok(associations::list_parents(tx.raw(), key)?)
}

/// `list_all_parent_dids(scope, name)` (spec §6, §4.9): every ancestor at
/// any depth, deduplicated.
pub fn list_all_parent_dids(tx: &CatalogTx<'_>, key: &DidKey) -> Result<Vec<DidKey>, CatalogError> {
    Ok(graph::recursive_ancestors(tx.raw(), key)?)
}

/// `add_dids(dids)` (spec §6): bulk top-level creation of new DIDs, not
/// attached to any parent. Distinct from `attach::attach_dids_to_dids`,
/// which only ever links an existing or newly-materialized child under a
/// named parent.
pub fn add_dids(tx: &CatalogTx<'_>, new_dids: &[Did]) -> Result<(), CatalogError> {
    for did in new_dids {
        let key = DidKey::new(did.scope.clone(), did.name.clone());
        if dids::get_did(tx.raw(), &key)?.is_some() {
            return Err(CatalogError::DidAlreadyExists {
                scope: did.scope.clone(),
                name: did.name.clone(),
            });
        }
    }
    dids::bulk_insert_dids(tx.raw(), new_dids)?;
    Ok(())
}

/// `create_did_sample(input, output, account, nbfiles)` (spec §6): copy a
/// random subset of `input`'s direct content into a newly created
/// collection `output`, per `did.py`'s `create_did_sample` — sampling
/// `nbfiles` distinct children (not a recursive file expansion).
pub fn create_did_sample(
    tx: &CatalogTx<'_>,
    input: &DidKey,
    output: &Did,
    nbfiles: usize,
    sample_indices: &[usize],
) -> Result<(), CatalogError> {
    let children = associations::list_children(tx.raw(), input)?;
    if children.len() < nbfiles {
        return Err(CatalogError::UnsupportedOperation {
            scope: input.scope.clone(),
            name: input.name.clone(),
            reason: format!(
                "requested sample of {nbfiles} files but only {} children exist",
                children.len()
            ),
        });
    }

    dids::insert_did(tx.raw(), output)?;

    let output_key = DidKey::new(output.scope.clone(), output.name.clone());
    let mut taken: HashSet<DidKey> = HashSet::new();
    for &idx in sample_indices.iter().take(nbfiles) {
        let child = &children[idx % children.len()];
        let child_key = DidKey::new(child.child_scope.clone(), child.child_name.clone());
        if !taken.insert(child_key.clone()) {
            continue;
        }
        associations::insert_association(
            tx.raw(),
            &Association {
                parent_scope: output_key.scope.clone(),
                parent_name: output_key.name.clone(),
                child_scope: child_key.scope,
                child_name: child_key.name,
                did_type: output.did_type,
                child_type: child.child_type,
                bytes: child.bytes,
                adler32: child.adler32.clone(),
                md5: child.md5.clone(),
                guid: child.guid.clone(),
                events: child.events,
                rule_evaluation: false,
            },
        )?;
    }
    Ok(())
}
