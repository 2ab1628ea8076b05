//! Stack-based fallback for ancestor walks (spec §9: re-architect the
//! original's recursive-generator `list_all_parent_dids` as a bounded
//! stream). `catalog_storage::queries::graph::recursive_ancestors` is the
//! primary implementation, pushed down to a `WITH RECURSIVE` CTE; this
//! worklist walk exists for parity/testing against that CTE, not for
//! production use.

use std::collections::HashSet;

use catalog_core::errors::CatalogError;
use catalog_core::types::DidKey;
use catalog_storage::queries::associations;
use catalog_storage::CatalogTx;

/// Every ancestor of `child`, at any depth, visited via an explicit stack
/// with cycle-safe visited-set bookkeeping rather than recursion.
pub fn parent_walk_iterative(tx: &CatalogTx<'_>, child: &DidKey) -> Result<Vec<DidKey>, CatalogError> {
    let mut visited: HashSet<DidKey> = HashSet::new();
    let mut stack = vec![child.clone()];
    let mut out = Vec::new();

    while let Some(current) = stack.pop() {
        for parent in associations::list_parents(tx.raw(), &current)? {
            let parent_key = DidKey::new(parent.parent_scope, parent.parent_name);
            if visited.insert(parent_key.clone()) {
                out.push(parent_key.clone());
                stack.push(parent_key);
            }
        }
    }
    Ok(out)
}
