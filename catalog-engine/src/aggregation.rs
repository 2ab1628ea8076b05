//! Aggregation & Recursive Resolution (spec §4.8).
//!
//! `child_dids` / `one_did_childs` live in `catalog_storage::queries::graph`
//! as recursive CTEs; this module is `resolve_bytes_length_events`, which
//! composes them the same way `__resolve_bytes_length_events_did` does in
//! the original: match on `(did.type, depth)` and fall back to the stored
//! aggregates for any combination not explicitly enumerated.

use catalog_core::errors::StorageError;
use catalog_core::types::{Did, DidKey, DidType};
use catalog_storage::queries::{associations, dids, graph};
use rusqlite::Transaction;

/// `(bytes, length, events)`, nulls collapsed to 0.
pub type Aggregates = (i64, i64, i64);

/// Resolve `(bytes, length, events)` for `did` at `depth` (spec §4.8).
///
/// - `did.type=FILE`: `(bytes or 0, 1, events or 0)`.
/// - `did.type=DATASET, depth=FILE`: `count(), sum(bytes), sum(events)`
///   over this dataset's Associations.
/// - `did.type=CONTAINER, depth=DATASET`: descend to datasets, sum their
///   stored `(length, bytes, events)`.
/// - `did.type=CONTAINER, depth=FILE`: descend to datasets, then aggregate
///   `count(), sum(bytes), sum(events)` over their Associations.
/// - Otherwise: return the stored `(bytes, length, events)`.
pub fn resolve_bytes_length_events(
    tx: &Transaction<'_>,
    did: &Did,
    depth: DidType,
) -> Result<Aggregates, StorageError> {
    match (did.did_type, depth) {
        (DidType::File, _) => Ok((did.bytes.unwrap_or(0), 1, did.events.unwrap_or(0))),

        (DidType::Dataset, DidType::File) => {
            let key = DidKey::new(did.scope.clone(), did.name.clone());
            let children = associations::list_children(tx, &key)?;
            let length = children.len() as i64;
            let bytes: i64 = children.iter().filter_map(|a| a.bytes).sum();
            let events: i64 = children.iter().filter_map(|a| a.events).sum();
            Ok((bytes, length, events))
        }

        (DidType::Container, DidType::Dataset) => {
            let key = DidKey::new(did.scope.clone(), did.name.clone());
            let dataset_keys = graph::one_did_childs(tx, &key, DidType::Dataset)?;
            let mut bytes = 0i64;
            let mut length = 0i64;
            let mut events = 0i64;
            for dataset_key in &dataset_keys {
                if let Some(dataset) = dids::get_did(tx, dataset_key)? {
                    bytes += dataset.bytes.unwrap_or(0);
                    length += dataset.length.unwrap_or(0);
                    events += dataset.events.unwrap_or(0);
                }
            }
            Ok((bytes, length, events))
        }

        (DidType::Container, DidType::File) => {
            let key = DidKey::new(did.scope.clone(), did.name.clone());
            let dataset_keys = graph::one_did_childs(tx, &key, DidType::Dataset)?;
            let mut length = 0i64;
            let mut bytes = 0i64;
            let mut events = 0i64;
            for dataset_key in &dataset_keys {
                let children = associations::list_children(tx, dataset_key)?;
                length += children.len() as i64;
                bytes += children.iter().filter_map(|a| a.bytes).sum::<i64>();
                events += children.iter().filter_map(|a| a.events).sum::<i64>();
            }
            Ok((bytes, length, events))
        }

        _ => Ok((
            did.bytes.unwrap_or(0),
            did.length.unwrap_or(0),
            did.events.unwrap_or(0),
        )),
    }
}
