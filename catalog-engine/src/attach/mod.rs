//! Attach Engine (spec §4.3): bulk attach of children to a parent DID,
//! dispatching on parent type.

mod archive;
mod container;
mod dataset;

use std::collections::{BTreeMap, HashSet};

use catalog_core::errors::CatalogError;
use catalog_core::traits::{MessageSink, ReplicaEngine};
use catalog_core::types::{DidAction, DidKey, DidType, UpdatedDidMarker};
use catalog_storage::queries::updated_did_markers;
use catalog_storage::CatalogTx;
use serde_json::Value;

/// One child named in an attachment request.
#[derive(Debug, Clone)]
pub struct ChildAttachment {
    pub scope: String,
    pub name: String,
    pub bytes: Option<i64>,
    pub adler32: Option<String>,
    pub md5: Option<String>,
    pub guid: Option<String>,
    pub events: Option<i64>,
    pub extra: BTreeMap<String, Value>,
}

impl ChildAttachment {
    pub fn key(&self) -> DidKey {
        DidKey::new(self.scope.clone(), self.name.clone())
    }
}

/// One `(parent, children)` item of an `attach_dids_to_dids` batch.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub parent: DidKey,
    pub children: Vec<ChildAttachment>,
    pub rse_id: Option<String>,
}

/// `attach_dids_to_dids` (spec §4.3).
///
/// Preserves the original implementation's early-return behavior when a
/// batch item targets a FILE (archive) parent: that one attachment is
/// handled and the call returns without processing subsequent items in
/// the same batch. This mirrors a bare `return` inside the per-attachment
/// loop of the original `attach_dids_to_dids`; batches should not mix
/// archive and non-archive attachments if every attachment must be
/// processed.
pub fn attach_dids_to_dids(
    tx: &mut CatalogTx<'_>,
    attachments: &[Attachment],
    account: &str,
    ignore_duplicate: bool,
    replica_engine: &dyn ReplicaEngine,
    message_sink: &dyn MessageSink,
    now: i64,
) -> Result<(), CatalogError> {
    let mut markers: HashSet<UpdatedDidMarker> = HashSet::new();

    for attachment in attachments {
        let parent = tx
            .lock_did_for_update(&attachment.parent)?
            .ok_or_else(|| CatalogError::DidNotFound {
                scope: attachment.parent.scope.clone(),
                name: attachment.parent.name.clone(),
            })?;

        match parent.did_type {
            DidType::File => {
                if !crate::entity::is_archive_name(&parent.name) {
                    return Err(CatalogError::UnsupportedOperation {
                        scope: parent.scope.clone(),
                        name: parent.name.clone(),
                        reason: "FILE parent does not match the archive extension policy"
                            .to_string(),
                    });
                }
                let changed = archive::attach_to_archive(
                    tx,
                    &parent,
                    &attachment.children,
                    ignore_duplicate,
                    account,
                    now,
                )?;
                if changed {
                    markers.insert(UpdatedDidMarker::new(
                        parent.scope.clone(),
                        parent.name.clone(),
                        DidAction::Attach,
                    ));
                }
                flush_markers(tx, &markers)?;
                return Ok(());
            }

            DidType::Dataset => {
                if !parent.is_open {
                    return Err(CatalogError::UnsupportedOperation {
                        scope: parent.scope.clone(),
                        name: parent.name.clone(),
                        reason: "cannot attach to a closed DATASET".to_string(),
                    });
                }
                let new_keys = dataset::attach_files_to_dataset(
                    tx,
                    &parent,
                    &attachment.children,
                    ignore_duplicate,
                    attachment.rse_id.as_deref(),
                    replica_engine,
                )?;
                if !new_keys.is_empty() {
                    markers.insert(UpdatedDidMarker::new(
                        parent.scope.clone(),
                        parent.name.clone(),
                        DidAction::Attach,
                    ));
                }
            }

            DidType::Container => {
                if !parent.is_open {
                    return Err(CatalogError::UnsupportedOperation {
                        scope: parent.scope.clone(),
                        name: parent.name.clone(),
                        reason: "cannot attach to a closed CONTAINER".to_string(),
                    });
                }
                let accepted = container::attach_to_container(
                    tx,
                    &parent,
                    &attachment.children,
                    ignore_duplicate,
                    account,
                    message_sink,
                )?;
                if accepted > 0 {
                    markers.insert(UpdatedDidMarker::new(
                        parent.scope.clone(),
                        parent.name.clone(),
                        DidAction::Attach,
                    ));
                }
            }
        }
    }

    flush_markers(tx, &markers)
}

fn flush_markers(
    tx: &CatalogTx<'_>,
    markers: &HashSet<UpdatedDidMarker>,
) -> Result<(), CatalogError> {
    for marker in markers {
        updated_did_markers::insert_marker(tx.raw(), marker)?;
    }
    Ok(())
}
