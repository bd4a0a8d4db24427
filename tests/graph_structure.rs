// tests/graph_structure.rs

use loadcast::graph::NodeId;
use loadcast_test_utils::builders::{GraphBuilder, RecordBuilder};

fn record(id: &str) -> loadcast::graph::NetworkRecord {
    RecordBuilder::new(id, 1_000.0).build()
}

#[test]
fn traversal_visits_each_reachable_node_once_in_insertion_order() {
    let mut builder = GraphBuilder::new();
    let root = builder.network(record("conn-root"));
    let a = builder.network(record("conn-a"));
    let b = builder.network(record("conn-b"));
    let c = builder.network(record("conn-c"));
    // Diamond: c is reachable through both a and b but visited once.
    builder.after(root, a).after(root, b).after(a, c).after(b, c);
    let graph = builder.build();

    let mut visited: Vec<NodeId> = Vec::new();
    graph.traverse(|id, _| visited.push(id));
    assert_eq!(visited, vec![root, a, b, c]);
}

#[test]
fn dependencies_and_dependents_are_mirrored() {
    let mut builder = GraphBuilder::new();
    let root = builder.network(record("conn-root"));
    let a = builder.network(record("conn-a"));
    let b = builder.network(record("conn-b"));
    builder.after(root, a).after(root, b).after(a, b);
    let graph = builder.build();

    assert!(graph.dependencies_of(root).is_empty());
    assert_eq!(graph.dependents_of(root).to_vec(), vec![a, b]);
    assert_eq!(graph.dependencies_of(b).to_vec(), vec![root, a]);
    assert_eq!(graph.dependents_of(a).to_vec(), vec![b]);
}

#[test]
fn the_first_node_inserted_is_the_root() {
    let mut builder = GraphBuilder::new();
    let root = builder.network(record("conn-root"));
    builder.cpu(10.0);
    let graph = builder.build();

    assert_eq!(graph.root(), Some(root));
    assert_eq!(graph.len(), 2);
}

#[test]
fn edges_to_unknown_nodes_are_ignored() {
    let mut builder = GraphBuilder::new();
    let root = builder.network(record("conn-root"));
    builder.after(root, 99);
    let graph = builder.build();

    assert!(graph.dependents_of(root).is_empty());
}
