//! `RuleEngine` — replication-rule evaluation collaborator (spec §1, §4.5,
//! §4.6). Rule storage and evaluation themselves are out of scope; this
//! crate only needs the contract the Delete Engine and `set_status` call
//! through.

use std::sync::Arc;

use crate::errors::CatalogError;
use crate::types::DidKey;

/// A minimal view of a replication rule, as seen by the Delete Engine.
/// Lock counts and `purge_replicas` drive Phase A of deletion (spec §4.5).
#[derive(Debug, Clone, PartialEq)]
pub struct ReplicationRule {
    pub rule_id: String,
    pub scope: String,
    pub name: String,
    /// Count of locks in state OK, REPLICATING, or STUCK.
    pub active_lock_count: u64,
    pub locked: bool,
}

pub trait RuleEngine: Send + Sync {
    /// All rules keyed on any of the given DIDs (spec §4.5 Phase A).
    fn rules_for_dids(&self, dids: &[DidKey]) -> Result<Vec<ReplicationRule>, CatalogError>;

    /// Soft-expire a rule: set its lifetime to expire shortly rather than
    /// deleting it outright (spec §4.5: "soft-expire the rule").
    fn soft_expire_rule(&self, rule_id: &str, lifetime_secs: i64) -> Result<(), CatalogError>;

    /// Hard-delete a rule with `delete_parent=true, nowait=true` semantics.
    fn hard_delete_rule(&self, rule_id: &str, purge_replicas: bool) -> Result<(), CatalogError>;

    /// Whether any rule on this DID has `locked=true` (spec §4.7: excluded
    /// from `list_expired_dids`).
    fn has_locked_rule(&self, did: &DidKey) -> Result<bool, CatalogError>;

    /// Ask the rule engine to generate notifications for a closed DID
    /// (spec §4.6 step 6).
    fn generate_notifications(&self, did: &DidKey) -> Result<(), CatalogError>;

    /// Whether any rule on this DID is currently in the INJECT state
    /// (spec §4.7: excluded from `list_new_dids`).
    fn has_injecting_rule(&self, did: &DidKey) -> Result<bool, CatalogError>;
}

impl<T: RuleEngine + ?Sized> RuleEngine for Arc<T> {
    fn rules_for_dids(&self, dids: &[DidKey]) -> Result<Vec<ReplicationRule>, CatalogError> {
        (**self).rules_for_dids(dids)
    }
    fn soft_expire_rule(&self, rule_id: &str, lifetime_secs: i64) -> Result<(), CatalogError> {
        (**self).soft_expire_rule(rule_id, lifetime_secs)
    }
    fn hard_delete_rule(&self, rule_id: &str, purge_replicas: bool) -> Result<(), CatalogError> {
        (**self).hard_delete_rule(rule_id, purge_replicas)
    }
    fn has_locked_rule(&self, did: &DidKey) -> Result<bool, CatalogError> {
        (**self).has_locked_rule(did)
    }
    fn generate_notifications(&self, did: &DidKey) -> Result<(), CatalogError> {
        (**self).generate_notifications(did)
    }
    fn has_injecting_rule(&self, did: &DidKey) -> Result<bool, CatalogError> {
        (**self).has_injecting_rule(did)
    }
}

/// A rule engine with no rules, for attachments/deletes that don't
/// exercise rule-linkage side effects in tests.
pub struct NullRuleEngine;

impl RuleEngine for NullRuleEngine {
    fn rules_for_dids(&self, _dids: &[DidKey]) -> Result<Vec<ReplicationRule>, CatalogError> {
        Ok(Vec::new())
    }
    fn soft_expire_rule(&self, _rule_id: &str, _lifetime_secs: i64) -> Result<(), CatalogError> {
        Ok(())
    }
    fn hard_delete_rule(&self, _rule_id: &str, _purge_replicas: bool) -> Result<(), CatalogError> {
        Ok(())
    }
    fn has_locked_rule(&self, _did: &DidKey) -> Result<bool, CatalogError> {
        Ok(false)
    }
    fn generate_notifications(&self, _did: &DidKey) -> Result<(), CatalogError> {
        Ok(())
    }
    fn has_injecting_rule(&self, _did: &DidKey) -> Result<bool, CatalogError> {
        Ok(false)
    }
}
