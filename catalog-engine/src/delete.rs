//! Delete Engine (spec §4.5): orchestrated multi-phase deletion.

use catalog_core::errors::CatalogError;
use catalog_core::events::{ErasePayload, Event};
use catalog_core::traits::{MessageSink, MetadataPlugin, RuleEngine};
use catalog_core::types::{DeletedDid, DidKey, DidType};
use catalog_core::CatalogConfig;
use catalog_storage::queries::{associations, deleted_dids, dids, follows, graph};
use catalog_storage::CatalogTx;
use tracing::{info, warn};

use crate::detach;

const SOFT_EXPIRE_LIFETIME_SECS: i64 = 24 * 60 * 60;

/// One DID named in a `delete_dids` call (spec §6).
#[derive(Debug, Clone)]
pub struct DeleteInput {
    pub key: DidKey,
    pub did_type: DidType,
    pub purge_replicas: bool,
}

/// `delete_dids(dids, account, expire_rules)` (spec §4.5).
///
/// Best-effort: a deferred DID (Phase F early-exit, or a rule soft-expire
/// in Phase A) is left live for the caller to retry, matching spec §6's
/// "— (best-effort; early-exit possible)" error contract.
pub fn delete_dids(
    tx: &mut CatalogTx<'_>,
    inputs: &[DeleteInput],
    account: &str,
    expire_rules: bool,
    config: &CatalogConfig,
    rule_engine: &dyn RuleEngine,
    metadata_plugin: &dyn MetadataPlugin,
    message_sink: &dyn MessageSink,
    now: i64,
) -> Result<(), CatalogError> {
    let all_keys: Vec<DidKey> = inputs.iter().map(|i| i.key.clone()).collect();
    let file_inputs: Vec<&DeleteInput> = inputs.iter().filter(|i| i.did_type == DidType::File).collect();
    let collection_inputs: Vec<&DeleteInput> = inputs
        .iter()
        .filter(|i| i.did_type != DidType::File)
        .collect();

    for input in inputs {
        let did = dids::get_did(tx.raw(), &input.key)?;
        message_sink.emit(Event::Erase(ErasePayload {
            account: did.map(|d| d.account).unwrap_or_else(|| account.to_string()),
            scope: input.key.scope.clone(),
            name: input.key.name.clone(),
            vo: None,
        }))?;
    }

    // Phase A — Rules.
    let mut skip_deletion = false;
    let rules = rule_engine.rules_for_dids(&all_keys)?;
    for rule in &rules {
        let rule_did = inputs
            .iter()
            .find(|i| i.key.scope == rule.scope && i.key.name == rule.name);
        let purge_replicas_effective = rule_did.map(|i| i.purge_replicas).unwrap_or(true);

        if expire_rules && rule.active_lock_count > config.undertaker_expire_rules_locks_size {
            warn!(rule_id = %rule.rule_id, active_lock_count = rule.active_lock_count, "soft-expiring rule instead of deleting");
            rule_engine.soft_expire_rule(&rule.rule_id, SOFT_EXPIRE_LIFETIME_SECS)?;
            dids::set_expiry(tx.raw(), &DidKey::new(rule.scope.clone(), rule.name.clone()), now + SOFT_EXPIRE_LIFETIME_SECS)?;
            skip_deletion = true;
        } else {
            rule_engine.hard_delete_rule(&rule.rule_id, purge_replicas_effective)?;
        }
    }
    if skip_deletion {
        info!(count = all_keys.len(), "delete deferred: rule soft-expired");
        return Ok(());
    }

    // Phase B — Parent detachment.
    let mut existing_parent_dids = false;
    for input in inputs {
        let parents = associations::list_parents(tx.raw(), &input.key)?;
        for parent in parents {
            let parent_key = DidKey::new(parent.parent_scope, parent.parent_name);
            detach::detach(tx, &parent_key, std::slice::from_ref(&input.key), message_sink, now)?;
            existing_parent_dids = true;
        }
    }

    // Phase C — DID-level metadata.
    metadata_plugin.delete_metadata_for_dids(&all_keys)?;

    // Phase D — Bad replica state. Replica state is owned by the external
    // Replica Engine (spec §1 Non-goal: "Replica placement..."); this
    // engine has no BadReplica table to mutate directly.

    // Phase E — Collection expansion.
    if !collection_inputs.is_empty() {
        let collection_keys: Vec<DidKey> = collection_inputs.iter().map(|i| i.key.clone()).collect();
        let _child_files = graph::child_dids(tx.raw(), &collection_keys, DidType::File)?;
        // "purge all replicas" tombstoning is a Replica Engine concern,
        // out of scope here (spec §1 Non-goal).
        for key in &collection_keys {
            associations::delete_all_from_parent(tx.raw(), key)?;
        }
        // CollectionReplica rows are owned by the Replica Engine, not
        // modeled in this catalog's schema.
    }

    // Phase F — Early exit for Judge.
    if existing_parent_dids {
        info!(count = all_keys.len(), "delete deferred: existing parent DIDs remain");
        return Ok(());
    }

    // Phase G — Terminal removal.
    for input in &collection_inputs {
        follows::delete_follows_for_did(tx.raw(), &input.key)?;
        if config.deletion_archive_dids {
            if let Some(did) = dids::get_did(tx.raw(), &input.key)? {
                deleted_dids::insert_deleted(
                    tx.raw(),
                    &DeletedDid {
                        scope: did.scope,
                        name: did.name,
                        did_type: did.did_type,
                        account: did.account,
                        is_open: did.is_open,
                        bytes: did.bytes,
                        length: did.length,
                        events: did.events,
                        created_at: did.created_at,
                        closed_at: did.closed_at,
                        deleted_at: now,
                        extra: did.extra,
                    },
                )?;
            }
        }
        dids::delete_did(tx.raw(), &input.key)?;
    }
    for input in &file_inputs {
        dids::clear_expiry(tx.raw(), &input.key)?;
    }

    Ok(())
}
