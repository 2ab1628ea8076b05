//! Set Status / Close (spec §4.6).

use catalog_core::errors::CatalogError;
use catalog_core::events::{ClosePayload, Event, OpenPayload};
use catalog_core::traits::{MessageSink, RuleEngine};
use catalog_core::types::{DidKey, DidType};
use catalog_core::CatalogConfig;
use catalog_storage::queries::dids;
use catalog_storage::CatalogTx;

use crate::aggregation;

/// Close a DATASET or CONTAINER (spec §4.6 steps 1-6).
pub fn close(
    tx: &mut CatalogTx<'_>,
    key: &DidKey,
    config: &CatalogConfig,
    rule_engine: &dyn RuleEngine,
    message_sink: &dyn MessageSink,
    now: i64,
) -> Result<(), CatalogError> {
    let did = tx
        .lock_did_for_update(key)?
        .ok_or_else(|| CatalogError::DidNotFound {
            scope: key.scope.clone(),
            name: key.name.clone(),
        })?;

    if did.did_type != DidType::Dataset && did.did_type != DidType::Container {
        return Err(CatalogError::UnsupportedOperation {
            scope: did.scope.clone(),
            name: did.name.clone(),
            reason: "only DATASET or CONTAINER DIDs can be closed".to_string(),
        });
    }
    if !did.is_open {
        return Err(CatalogError::UnsupportedStatus {
            scope: did.scope.clone(),
            name: did.name.clone(),
            reason: "already closed".to_string(),
        });
    }

    let depth = match did.did_type {
        DidType::Dataset => DidType::File,
        DidType::Container => DidType::Dataset,
        DidType::File => unreachable!("checked above"),
    };
    let (bytes, length, events) = aggregation::resolve_bytes_length_events(tx.raw(), &did, depth)?;

    dids::close_did(
        tx.raw(),
        key,
        now,
        bytes,
        length,
        events,
        config.subscriptions_reevaluate_dids_at_close,
    )?;

    message_sink.emit(Event::Close(ClosePayload {
        scope: key.scope.clone(),
        name: key.name.clone(),
        bytes,
        length,
        events,
        vo: None,
    }))?;

    rule_engine.generate_notifications(key)?;

    Ok(())
}

/// Reopen a closed DATASET or CONTAINER (spec §4.6: "Reopen requires the
/// DID currently be closed").
pub fn reopen(
    tx: &mut CatalogTx<'_>,
    key: &DidKey,
    message_sink: &dyn MessageSink,
) -> Result<(), CatalogError> {
    let did = tx
        .lock_did_for_update(key)?
        .ok_or_else(|| CatalogError::DidNotFound {
            scope: key.scope.clone(),
            name: key.name.clone(),
        })?;

    if did.is_open {
        return Err(CatalogError::UnsupportedStatus {
            scope: did.scope.clone(),
            name: did.name.clone(),
            reason: "already open".to_string(),
        });
    }

    dids::reopen_did(tx.raw(), key)?;
    message_sink.emit(Event::Open(OpenPayload {
        scope: key.scope.clone(),
        name: key.name.clone(),
        vo: None,
    }))?;
    Ok(())
}
