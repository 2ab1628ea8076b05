//! Resurrect (spec §4.10): bring a deleted or soft-expired DID back to life.

use catalog_core::errors::CatalogError;
use catalog_core::types::{Did, DidKey};
use catalog_storage::queries::{deleted_dids, dids};
use catalog_storage::CatalogTx;

/// `revive_dids(dids)` (spec §4.10).
///
/// Two revivable states: a tombstoned collection in `deleted_dids` (fold
/// the archived row back into `dids` and drop the tombstone), or a live
/// DID whose `expired_at` is merely in the past (clear the expiry in
/// place). Anything else is `DidNotFound`.
pub fn revive_dids(tx: &CatalogTx<'_>, keys: &[DidKey], now: i64) -> Result<(), CatalogError> {
    for key in keys {
        if let Some(tombstone) = deleted_dids::get_deleted(tx.raw(), key)? {
            deleted_dids::delete_deleted(tx.raw(), key)?;
            dids::insert_did(
                tx.raw(),
                &Did {
                    scope: tombstone.scope,
                    name: tombstone.name,
                    did_type: tombstone.did_type,
                    account: tombstone.account,
                    is_open: tombstone.is_open,
                    monotonic: false,
                    expired_at: None,
                    created_at: tombstone.created_at,
                    closed_at: tombstone.closed_at,
                    accessed_at: None,
                    access_cnt: 0,
                    bytes: tombstone.bytes,
                    length: tombstone.length,
                    events: tombstone.events,
                    md5: None,
                    adler32: None,
                    guid: None,
                    availability: None,
                    is_archive: false,
                    constituent: false,
                    is_new: false,
                    purge_replicas: false,
                    hidden: false,
                    obsolete: false,
                    complete: false,
                    suppressed: false,
                    extra: tombstone.extra,
                },
            )?;
            continue;
        }

        match dids::get_did(tx.raw(), key)? {
            Some(did) if did.expired_at.is_some() && did.expired_at.unwrap() <= now => {
                dids::clear_expiry(tx.raw(), key)?;
            }
            Some(_) => {
                return Err(CatalogError::UnsupportedOperation {
                    scope: key.scope.clone(),
                    name: key.name.clone(),
                    reason: "DID is not expired or deleted".to_string(),
                });
            }
            None => {
                return Err(CatalogError::DidNotFound {
                    scope: key.scope.clone(),
                    name: key.name.clone(),
                });
            }
        }
    }
    Ok(())
}
