// src/graph/validate.rs

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::errors::{LoadcastError, Result};
use crate::graph::{NodeId, PageGraph};

/// Check that the request graph is acyclic.
///
/// The simulator does not require this: a cyclic graph trips its iteration
/// guard at run time. Callers that want the failure up front, with the node
/// involved in the cycle named, can run this first.
pub fn ensure_acyclic(graph: &PageGraph) -> Result<()> {
    // Edge direction: dependency -> dependent, i.e. the order in which the
    // simulation completes nodes.
    let mut dag: DiGraphMap<NodeId, ()> = DiGraphMap::new();

    for id in 0..graph.len() {
        dag.add_node(id);
        for &dep in graph.dependencies_of(id) {
            dag.add_edge(dep, id, ());
        }
    }

    // A topological sort will fail if there is a cycle.
    match toposort(&dag, None) {
        Ok(_order) => Ok(()),
        Err(cycle) => Err(LoadcastError::GraphCycle(format!(
            "cycle in request graph involving node {}",
            cycle.node_id()
        ))),
    }
}
