//! Configuration surface for the DID catalog engine (spec §6).
//!
//! Loading this struct from a config file or environment is out of scope
//! (external, per spec §1) — this module only defines the keys and their
//! defaults, the way `drift_core::config::ScanConfig` defines the scanner's
//! knobs without owning how they get populated.

use serde::{Deserialize, Serialize};

/// Configuration keys read by the Delete Engine and Set Status operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// `deletion.archive_dids` — snapshot deleted collection rows into
    /// `deleted_dids` before removing them (Delete Engine Phase G).
    pub deletion_archive_dids: bool,

    /// `deletion.archive_content` — resurrecting an archived collection
    /// also restores its association history. Read by Resurrect.
    pub deletion_archive_content: bool,

    /// `undertaker.expire_rules_locks_size` — lock-count threshold above
    /// which a rule is soft-expired instead of hard-deleted during Delete
    /// Engine Phase A. Default 10000.
    pub undertaker_expire_rules_locks_size: u64,

    /// `undertaker.purge_all_replicas` — whether Delete Engine Phase E
    /// tombstones replicas of files resolved from deleted collections.
    pub undertaker_purge_all_replicas: bool,

    /// `subscriptions.reevaluate_dids_at_close` — whether `set_status`
    /// marks a closed DID `is_new=true` to trigger a rule re-scan.
    pub subscriptions_reevaluate_dids_at_close: bool,

    /// `core.oracle_global_temp_tables` — dialect override naming backends
    /// whose temp tables are global/session-scoped rather than
    /// transaction-scoped. SQLite is never in this list: the Temp-Table
    /// Manager always takes the explicit-clear fallback path (spec §4.2).
    pub oracle_global_temp_tables: Vec<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            deletion_archive_dids: true,
            deletion_archive_content: false,
            undertaker_expire_rules_locks_size: 10_000,
            undertaker_purge_all_replicas: false,
            subscriptions_reevaluate_dids_at_close: true,
            oracle_global_temp_tables: Vec::new(),
        }
    }
}
