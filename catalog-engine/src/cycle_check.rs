//! Supplementary DAG verification: a Tarjan-SCC pass over the Association
//! subgraph reachable from a root, for tests and audit tooling. The
//! authoritative guard on `attach_dids_to_dids` is the SQL-CTE-based
//! `catalog_storage::queries::graph::would_create_cycle`, checked inline
//! before any edge is inserted; this module re-verifies the result
//! in-memory rather than gating writes.

use std::collections::HashMap;

use catalog_core::errors::CatalogError;
use catalog_core::types::DidKey;
use catalog_storage::queries::{associations, graph};
use catalog_storage::CatalogTx;
use petgraph::graph::{DiGraph, NodeIndex};

/// Any strongly-connected component with more than one member, found by
/// walking the descendants of `root`. An empty result means the subgraph
/// is acyclic.
pub fn verify_no_cycle(tx: &CatalogTx<'_>, root: &DidKey) -> Result<Vec<Vec<DidKey>>, CatalogError> {
    let mut nodes: Vec<DidKey> = graph::recursive_descendants(tx.raw(), root)?
        .into_iter()
        .map(|(key, _)| key)
        .collect();
    nodes.push(root.clone());

    let mut pg: DiGraph<DidKey, ()> = DiGraph::new();
    let mut index_of: HashMap<DidKey, NodeIndex> = HashMap::new();
    for key in &nodes {
        let idx = pg.add_node(key.clone());
        index_of.insert(key.clone(), idx);
    }

    for key in &nodes {
        for child in associations::list_children(tx.raw(), key)? {
            let child_key = DidKey::new(child.child_scope, child.child_name);
            if let (Some(&src), Some(&dst)) = (index_of.get(key), index_of.get(&child_key)) {
                pg.add_edge(src, dst, ());
            }
        }
    }

    let sccs = petgraph::algo::tarjan_scc(&pg);
    Ok(sccs
        .into_iter()
        .filter(|scc| scc.len() > 1)
        .map(|scc| scc.into_iter().map(|idx| pg[idx].clone()).collect())
        .collect())
}
