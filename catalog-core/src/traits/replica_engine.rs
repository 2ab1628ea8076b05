//! `ReplicaEngine` — replica placement collaborator (spec §1, §4.3.2).

use std::sync::Arc;

use crate::errors::CatalogError;
use crate::types::DidKey;

/// Registers replicas for a batch of files at an RSE. The Dataset
/// sub-routine of the Attach Engine delegates to this, in the same
/// transaction, before its own Association insert — spec §4.3.2: "If the
/// attachment carries an `rse_id`, delegate replica registration for all
/// child files to the external Replica Engine in the same transaction
/// before the Association insert."
pub trait ReplicaEngine: Send + Sync {
    fn register_replicas(&self, rse_id: &str, files: &[DidKey]) -> Result<(), CatalogError>;
}

impl<T: ReplicaEngine + ?Sized> ReplicaEngine for Arc<T> {
    fn register_replicas(&self, rse_id: &str, files: &[DidKey]) -> Result<(), CatalogError> {
        (**self).register_replicas(rse_id, files)
    }
}

/// A replica engine that does nothing, for attachments with no `rse_id`
/// and for tests that don't exercise replica registration.
pub struct NullReplicaEngine;

impl ReplicaEngine for NullReplicaEngine {
    fn register_replicas(&self, _rse_id: &str, _files: &[DidKey]) -> Result<(), CatalogError> {
        Ok(())
    }
}
