//! Integration tests for hiding tables and bypass edges.

use lineage::graph::{assign_levels, LineageEdge, LineageGraph};
use lineage::table::LineageRecord;
use std::collections::BTreeSet;

fn abc() -> LineageGraph {
    LineageGraph::from_records(&[
        LineageRecord::new("a", "T1", "uses", "b", "T2"),
        LineageRecord::new("b", "T2", "reads", "c", "T1"),
    ])
}

fn hidden(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|n| n.to_string()).collect()
}

fn edge_set(graph: &LineageGraph) -> BTreeSet<(String, String, String, String)> {
    graph
        .edges()
        .map(|e| {
            (
                e.id.clone(),
                e.source.clone(),
                e.target.clone(),
                e.relationship.clone(),
            )
        })
        .collect()
}

#[test]
fn test_hiding_middle_table_bridges_its_neighbours() {
    let visible = abc().hide_nodes(&hidden(&["b"]));

    assert_eq!(visible.node_ids(), vec!["a", "c"]);
    let edges: Vec<&LineageEdge> = visible.edges().collect();
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].source, "c");
    assert_eq!(edges[0].target, "a");
    assert_eq!(edges[0].relationship, "via b");
    assert_eq!(edges[0].via.as_deref(), Some("b"));
    assert!(edges[0].id.starts_with("b-"));
}

#[test]
fn test_levels_follow_bypass_edges() {
    let visible = abc().hide_nodes(&hidden(&["b"]));
    let levels = assign_levels(&visible);
    assert_eq!(levels["c"], 0);
    assert_eq!(levels["a"], 1);
}

#[test]
fn test_hiding_a_leaf_adds_no_bypass() {
    let visible = abc().hide_nodes(&hidden(&["a"]));
    assert_eq!(visible.node_ids(), vec!["b", "c"]);
    assert_eq!(visible.edge_count(), 1);
    assert!(visible.edges().all(|e| !e.is_bypass()));
    assert!(visible.node("b").unwrap().children.is_empty());
}

#[test]
fn test_reveal_restores_the_original_edges() {
    let full = abc();
    let before = edge_set(&full);

    let hidden_view = full.hide_nodes(&hidden(&["b"]));
    assert_ne!(edge_set(&hidden_view), before);

    let revealed = full.hide_nodes(&BTreeSet::new());
    assert_eq!(edge_set(&revealed), before);
    assert_eq!(revealed.node_ids(), full.node_ids());
}

#[test]
fn test_adjacent_hidden_tables_are_not_bridged_transitively() {
    // a → b → c → d with b and c hidden
    let graph = LineageGraph::from_records(&[
        LineageRecord::new("b", "T", "uses", "a", "T"),
        LineageRecord::new("c", "T", "uses", "b", "T"),
        LineageRecord::new("d", "T", "uses", "c", "T"),
    ]);

    let visible = graph.hide_nodes(&hidden(&["b", "c"]));
    assert_eq!(visible.node_ids(), vec!["a", "d"]);
    assert_eq!(visible.edge_count(), 0);
}

#[test]
fn test_unknown_hidden_names_are_ignored() {
    let full = abc();
    let visible = full.hide_nodes(&hidden(&["nope"]));
    assert_eq!(edge_set(&visible), edge_set(&full));
    assert_eq!(visible.node_count(), 3);
}

#[test]
fn test_self_loop_on_hidden_table_is_dropped() {
    let graph = LineageGraph::from_records(&[
        LineageRecord::new("h", "T", "uses", "p", "T"),
        LineageRecord::new("h", "T", "refreshes", "h", "T"),
        LineageRecord::new("c", "T", "uses", "h", "T"),
    ]);

    let visible = graph.hide_nodes(&hidden(&["h"]));
    let pairs: Vec<(&str, &str)> = visible
        .edges()
        .map(|e| (e.source.as_str(), e.target.as_str()))
        .collect();
    assert_eq!(pairs, vec![("p", "c")]);
}

#[test]
fn test_roots_and_leaves_agree_with_levels_after_hiding() {
    let visible = abc().hide_nodes(&hidden(&["b"]));
    let levels = assign_levels(&visible);

    assert_eq!(visible.roots(), vec!["c"]);
    assert_eq!(visible.leaves(), vec!["a"]);
    for root in visible.roots() {
        assert_eq!(levels[root], 0);
    }
    // Adjacency lists only record direct links.
    assert!(visible.node("a").unwrap().parents.is_empty());
}
