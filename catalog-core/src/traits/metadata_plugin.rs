//! `MetadataPlugin` — the pluggable key/value store collaborator
//! (spec §1: "a pluggable key/value store layer invoked by well-defined
//! operations").

use std::sync::Arc;

use serde_json::Value;

use crate::errors::CatalogError;
use crate::types::DidKey;

pub trait MetadataPlugin: Send + Sync {
    fn set_metadata(&self, did: &DidKey, key: &str, value: Value) -> Result<(), CatalogError>;

    fn set_metadata_bulk(
        &self,
        did: &DidKey,
        values: &[(String, Value)],
    ) -> Result<(), CatalogError>;

    fn get_metadata(&self, did: &DidKey) -> Result<std::collections::BTreeMap<String, Value>, CatalogError>;

    fn delete_metadata(&self, did: &DidKey, key: &str) -> Result<(), CatalogError>;

    /// Delete all metadata rows keyed on the given DIDs in one call (spec
    /// §4.5 Phase C). Implementations that cannot support a set-based
    /// delete should return `Ok(())` and document that a separate cleaner
    /// handles it, matching the distilled spec's stated fallback.
    fn delete_metadata_for_dids(&self, dids: &[DidKey]) -> Result<(), CatalogError>;
}

impl<T: MetadataPlugin + ?Sized> MetadataPlugin for Arc<T> {
    fn set_metadata(&self, did: &DidKey, key: &str, value: Value) -> Result<(), CatalogError> {
        (**self).set_metadata(did, key, value)
    }
    fn set_metadata_bulk(
        &self,
        did: &DidKey,
        values: &[(String, Value)],
    ) -> Result<(), CatalogError> {
        (**self).set_metadata_bulk(did, values)
    }
    fn get_metadata(&self, did: &DidKey) -> Result<std::collections::BTreeMap<String, Value>, CatalogError> {
        (**self).get_metadata(did)
    }
    fn delete_metadata(&self, did: &DidKey, key: &str) -> Result<(), CatalogError> {
        (**self).delete_metadata(did, key)
    }
    fn delete_metadata_for_dids(&self, dids: &[DidKey]) -> Result<(), CatalogError> {
        (**self).delete_metadata_for_dids(dids)
    }
}

/// An in-memory metadata plugin, for tests.
#[derive(Default)]
pub struct InMemoryMetadataPlugin {
    store: std::sync::Mutex<std::collections::BTreeMap<DidKeyOrd, std::collections::BTreeMap<String, Value>>>,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct DidKeyOrd(String, String);

impl InMemoryMetadataPlugin {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MetadataPlugin for InMemoryMetadataPlugin {
    fn set_metadata(&self, did: &DidKey, key: &str, value: Value) -> Result<(), CatalogError> {
        let mut store = self.store.lock().expect("poisoned");
        store
            .entry(DidKeyOrd(did.scope.clone(), did.name.clone()))
            .or_default()
            .insert(key.to_string(), value);
        Ok(())
    }

    fn set_metadata_bulk(
        &self,
        did: &DidKey,
        values: &[(String, Value)],
    ) -> Result<(), CatalogError> {
        let mut store = self.store.lock().expect("poisoned");
        let entry = store
            .entry(DidKeyOrd(did.scope.clone(), did.name.clone()))
            .or_default();
        for (k, v) in values {
            entry.insert(k.clone(), v.clone());
        }
        Ok(())
    }

    fn get_metadata(&self, did: &DidKey) -> Result<std::collections::BTreeMap<String, Value>, CatalogError> {
        let store = self.store.lock().expect("poisoned");
        Ok(store
            .get(&DidKeyOrd(did.scope.clone(), did.name.clone()))
            .cloned()
            .unwrap_or_default())
    }

    fn delete_metadata(&self, did: &DidKey, key: &str) -> Result<(), CatalogError> {
        let mut store = self.store.lock().expect("poisoned");
        if let Some(entry) = store.get_mut(&DidKeyOrd(did.scope.clone(), did.name.clone())) {
            entry.remove(key);
        }
        Ok(())
    }

    fn delete_metadata_for_dids(&self, dids: &[DidKey]) -> Result<(), CatalogError> {
        let mut store = self.store.lock().expect("poisoned");
        for did in dids {
            store.remove(&DidKeyOrd(did.scope.clone(), did.name.clone()));
        }
        Ok(())
    }
}
