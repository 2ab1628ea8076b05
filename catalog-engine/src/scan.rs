//! Scan / Sharding (spec §4.7).
//!
//! SQLite has no pushdown hash predicate, so both scans always take the
//! client-side stable-hash fallback spec §4.7 describes: `md5(name) mod
//! total_workers`.

use catalog_core::errors::CatalogError;
use catalog_core::traits::RuleEngine;
use catalog_core::types::{DidKey, DidType};
use catalog_storage::queries::dids;
use catalog_storage::CatalogTx;

/// One row of the expired-DID stream (spec §6: `{scope, name, did_type,
/// created_at, purge_replicas}`).
#[derive(Debug, Clone, PartialEq)]
pub struct ExpiredDid {
    pub key: DidKey,
    pub did_type: DidType,
    pub created_at: i64,
    pub purge_replicas: bool,
}

/// Stable shard assignment for a DID name: `md5(name) mod total_workers`.
/// Takes the first 8 bytes of the digest as a big-endian `u64`.
pub fn shard_of(name: &str, total_workers: u64) -> u64 {
    let digest = md5::compute(name.as_bytes());
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&digest.0[0..8]);
    u64::from_be_bytes(buf) % total_workers
}

/// `list_expired_dids(worker, total_workers, limit)` (spec §4.7).
///
/// Ordered by `expired_at` ascending; excludes any DID covered by a
/// `locked=true` rule (spec §8: "list_expired_dids excludes any DID
/// covered by a rule with locked=true").
pub fn list_expired_dids(
    tx: &CatalogTx<'_>,
    worker: u64,
    total_workers: u64,
    limit: i64,
    rule_engine: &dyn RuleEngine,
) -> Result<Vec<ExpiredDid>, CatalogError> {
    let candidates = dids::select_expired_candidates(tx.raw(), limit.max(0).saturating_mul(total_workers.max(1) as i64))?;
    let mut out = Vec::new();
    for (key, did_type, created_at, purge_replicas) in candidates {
        if shard_of(&key.name, total_workers.max(1)) != worker {
            continue;
        }
        if rule_engine.has_locked_rule(&key)? {
            continue;
        }
        out.push(ExpiredDid {
            key,
            did_type,
            created_at,
            purge_replicas,
        });
        if out.len() as i64 >= limit {
            break;
        }
    }
    Ok(out)
}

/// `list_new_dids(did_type, thread, total_threads, chunk_size)` (spec
/// §4.7). No order guarantee, chunked by `chunk_size`.
pub fn list_new_dids(
    tx: &CatalogTx<'_>,
    did_type: DidType,
    thread: u64,
    total_threads: u64,
    chunk_size: i64,
    rule_engine: &dyn RuleEngine,
) -> Result<Vec<DidKey>, CatalogError> {
    let mut out = Vec::new();
    let mut offset = 0i64;
    loop {
        let page = dids::select_new_candidates(tx.raw(), did_type, chunk_size, offset)?;
        if page.is_empty() {
            break;
        }
        offset += page.len() as i64;
        for key in page {
            if shard_of(&key.name, total_threads.max(1)) != thread {
                continue;
            }
            if rule_engine.has_injecting_rule(&key)? {
                continue;
            }
            out.push(key);
        }
        if (out.len() as i64) >= chunk_size {
            break;
        }
    }
    Ok(out)
}
