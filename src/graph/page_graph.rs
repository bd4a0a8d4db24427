// src/graph/page_graph.rs

use std::collections::{HashSet, VecDeque};

use tracing::warn;

use crate::graph::node::NodeKind;
use crate::graph::NodeId;

/// Internal node structure: payload plus adjacency in both directions.
#[derive(Debug, Clone)]
struct GraphNode {
    kind: NodeKind,
    /// Direct dependencies: nodes that must complete before this one starts.
    deps: Vec<NodeId>,
    /// Direct dependents: nodes that depend on this one.
    dependents: Vec<NodeId>,
}

/// Request dependency graph for one page load.
///
/// Nodes are addressed by the [`NodeId`] returned at insertion; the first
/// node inserted is the root: the document request the rest of the load
/// hangs off. Acyclicity is *not* enforced here (see
/// [`ensure_acyclic`](crate::graph::ensure_acyclic)); the simulator's
/// iteration guard catches cyclic inputs at run time.
#[derive(Debug, Clone, Default)]
pub struct PageGraph {
    nodes: Vec<GraphNode>,
}

impl PageGraph {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Insert a node and return its id. The first insertion becomes the root.
    pub fn add_node(&mut self, kind: NodeKind) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(GraphNode {
            kind,
            deps: Vec::new(),
            dependents: Vec::new(),
        });
        id
    }

    /// Record that `dependent` cannot start before `dependency` completes.
    ///
    /// Unknown ids are ignored with a warning rather than panicking; the
    /// graph is typically assembled from trace data that may reference
    /// requests filtered out upstream.
    pub fn add_dependency(&mut self, dependency: NodeId, dependent: NodeId) {
        if dependency >= self.nodes.len() || dependent >= self.nodes.len() {
            warn!(
                dependency,
                dependent,
                "edge references a node id that is not in the graph; ignoring"
            );
            return;
        }
        self.nodes[dependency].dependents.push(dependent);
        self.nodes[dependent].deps.push(dependency);
    }

    /// Number of nodes in the graph (reachable or not).
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The root node, i.e. the first node inserted.
    pub fn root(&self) -> Option<NodeId> {
        if self.nodes.is_empty() {
            None
        } else {
            Some(0)
        }
    }

    /// Payload of a node, or `None` for an unknown id.
    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.nodes.get(id).map(|n| &n.kind)
    }

    /// Immediate dependencies of a node.
    pub fn dependencies_of(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id).map(|n| n.deps.as_slice()).unwrap_or(&[])
    }

    /// Immediate dependents of a node.
    pub fn dependents_of(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id)
            .map(|n| n.dependents.as_slice())
            .unwrap_or(&[])
    }

    /// Visit every node reachable from the root exactly once.
    ///
    /// Traversal is breadth-first following dependent edges, in edge
    /// insertion order, so repeated calls see nodes in the same sequence.
    pub fn traverse<F>(&self, mut visit: F)
    where
        F: FnMut(NodeId, &NodeKind),
    {
        let root = match self.root() {
            Some(root) => root,
            None => return,
        };

        let mut queue: VecDeque<NodeId> = VecDeque::new();
        let mut seen: HashSet<NodeId> = HashSet::new();
        queue.push_back(root);
        seen.insert(root);

        while let Some(id) = queue.pop_front() {
            visit(id, &self.nodes[id].kind);

            for &dependent in &self.nodes[id].dependents {
                if seen.insert(dependent) {
                    queue.push_back(dependent);
                }
            }
        }
    }
}
