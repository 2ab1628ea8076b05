//! Archive sub-routine (spec §4.3.1).

use std::collections::HashSet;

use catalog_core::errors::CatalogError;
use catalog_core::types::{ArchiveConstituent, Did, DidKey, DidType};
use catalog_storage::queries::{archive_constituents, associations, dids};
use catalog_storage::CatalogTx;

use super::ChildAttachment;

/// Attach a batch of children to a FILE parent acting as an archive.
/// Returns whether any new constituent link was created (drives the
/// Updated-DID marker in the caller).
pub fn attach_to_archive(
    tx: &mut CatalogTx<'_>,
    parent: &Did,
    children: &[ChildAttachment],
    ignore_duplicate: bool,
    account: &str,
    now: i64,
) -> Result<bool, CatalogError> {
    let archive_key = DidKey::new(parent.scope.clone(), parent.name.clone());

    let existing_links: HashSet<DidKey> = if ignore_duplicate {
        archive_constituents::list_constituents(tx.raw(), &archive_key)?
            .into_iter()
            .map(|c| DidKey::new(c.file_scope, c.file_name))
            .collect()
    } else {
        HashSet::new()
    };

    let mut new_dids = Vec::new();
    let mut constituents = Vec::new();
    let mut need_constituent_flip = Vec::new();
    let mut changed = false;

    for child in children {
        let key = child.key();
        if ignore_duplicate && existing_links.contains(&key) {
            continue;
        }

        match dids::get_did(tx.raw(), &key)? {
            None => {
                let new_did = crate::entity::new_file(
                    key.scope.clone(),
                    key.name.clone(),
                    account,
                    child.bytes,
                    child.adler32.clone(),
                    child.md5.clone(),
                    child.guid.clone(),
                    child.events,
                    true,
                    now,
                    child.extra.clone(),
                );
                constituents.push(ArchiveConstituent {
                    archive_scope: archive_key.scope.clone(),
                    archive_name: archive_key.name.clone(),
                    file_scope: key.scope.clone(),
                    file_name: key.name.clone(),
                    bytes: new_did.bytes,
                    adler32: new_did.adler32.clone(),
                    md5: new_did.md5.clone(),
                    guid: new_did.guid.clone(),
                });
                new_dids.push(new_did);
                changed = true;
            }
            Some(existing) => {
                if existing.did_type != DidType::File {
                    return Err(CatalogError::UnsupportedOperation {
                        scope: key.scope.clone(),
                        name: key.name.clone(),
                        reason: "archive constituent must be a FILE".to_string(),
                    });
                }
                if !existing.constituent {
                    need_constituent_flip.push(key.clone());
                }
                constituents.push(ArchiveConstituent {
                    archive_scope: archive_key.scope.clone(),
                    archive_name: archive_key.name.clone(),
                    file_scope: key.scope.clone(),
                    file_name: key.name.clone(),
                    bytes: existing.bytes,
                    adler32: existing.adler32.clone(),
                    md5: existing.md5.clone(),
                    guid: existing.guid.clone(),
                });
                changed = true;
            }
        }
    }

    dids::bulk_insert_dids(tx.raw(), &new_dids)?;
    for constituent in &constituents {
        archive_constituents::insert_constituent(tx.raw(), constituent)?;
    }
    if !need_constituent_flip.is_empty() {
        dids::mark_constituent(tx.raw(), &need_constituent_flip)?;
    }

    // Propagate is_archive=true to any DATASET/CONTAINER that already
    // contains this archive file (spec §4.3.1: "If the archive's parent
    // datasets exist, propagate is_archive=true to them").
    let parents = associations::list_parents(tx.raw(), &archive_key)?;
    if !parents.is_empty() {
        let parent_keys: Vec<DidKey> = parents
            .into_iter()
            .map(|a| DidKey::new(a.parent_scope, a.parent_name))
            .collect();
        dids::mark_is_archive(tx.raw(), &parent_keys)?;
    }

    Ok(changed)
}
