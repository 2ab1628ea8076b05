//! Metadata surface (spec §1, §6): thin dispatch to the pluggable
//! `MetadataPlugin` collaborator — this crate owns no metadata storage of
//! its own.

use serde_json::Value;
use std::collections::BTreeMap;

use catalog_core::errors::CatalogError;
use catalog_core::traits::MetadataPlugin;
use catalog_core::types::DidKey;

pub fn set_metadata(
    plugin: &dyn MetadataPlugin,
    did: &DidKey,
    key: &str,
    value: Value,
) -> Result<(), CatalogError> {
    plugin.set_metadata(did, key, value)
}

pub fn set_metadata_bulk(
    plugin: &dyn MetadataPlugin,
    did: &DidKey,
    values: &[(String, Value)],
) -> Result<(), CatalogError> {
    plugin.set_metadata_bulk(did, values)
}

pub fn get_metadata(plugin: &dyn MetadataPlugin, did: &DidKey) -> Result<BTreeMap<String, Value>, CatalogError> {
    plugin.get_metadata(did)
}

pub fn delete_metadata(plugin: &dyn MetadataPlugin, did: &DidKey, key: &str) -> Result<(), CatalogError> {
    plugin.delete_metadata(did, key)
}
