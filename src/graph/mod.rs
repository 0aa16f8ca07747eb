//! Table-level lineage graph.
//!
//! Nodes are tables, edges are parent → child relationships read from the
//! input rows. The graph is a multigraph: every row produces its own edge,
//! while each table's `parents`/`children` lists are deduplicated.
//!
//! Pipeline:
//!
//! ```text
//! [LineageRecord] ──build──▶ LineageGraph ──hide_nodes──▶ LineageGraph (visible)
//!                                                             │
//!                                        assign_levels ◀──────┘
//!                                             │
//!                                           layout ──▶ [PositionedNode]
//! ```

mod builder;
mod hidden;
pub mod layout;
pub mod levels;
pub mod query;
pub mod types;

pub use layout::layout;
pub use levels::{assign_levels, LevelMap};
pub use types::*;

use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use std::collections::HashMap;

/// Directed lineage multigraph keyed by table name.
///
/// Node and edge iteration follow insertion order, which is the order in
/// which tables and rows were first encountered.
#[derive(Debug, Clone, Default)]
pub struct LineageGraph {
    /// The underlying directed graph
    graph: DiGraph<TableNode, LineageEdge>,

    /// Index: table name → NodeIndex
    node_index: HashMap<String, NodeIndex>,
}

impl LineageGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            node_index: HashMap::new(),
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn contains(&self, name: &str) -> bool {
        self.node_index.contains_key(name)
    }

    pub fn node(&self, name: &str) -> Option<&TableNode> {
        self.node_index.get(name).map(|&idx| &self.graph[idx])
    }

    /// Tables in order of first appearance.
    pub fn nodes(&self) -> impl Iterator<Item = &TableNode> {
        self.graph.node_weights()
    }

    /// Edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &LineageEdge> {
        self.graph.edge_weights()
    }

    /// Table names in order of first appearance.
    pub fn node_ids(&self) -> Vec<&str> {
        self.nodes().map(|n| n.name.as_str()).collect()
    }

    /// Insert a table, or overwrite the type of an existing one.
    pub(crate) fn upsert_node(&mut self, name: &str, table_type: &str) -> NodeIndex {
        if let Some(&idx) = self.node_index.get(name) {
            self.graph[idx].table_type = table_type.to_string();
            idx
        } else {
            self.insert_node(TableNode::new(name, table_type))
        }
    }

    /// Insert a fully formed node. An existing node of the same name is kept.
    pub(crate) fn insert_node(&mut self, node: TableNode) -> NodeIndex {
        if let Some(&idx) = self.node_index.get(&node.name) {
            return idx;
        }
        let name = node.name.clone();
        let idx = self.graph.add_node(node);
        self.node_index.insert(name, idx);
        idx
    }

    /// Record `parent` → `child` in both nodes' adjacency lists.
    pub(crate) fn link(&mut self, parent: &str, child: &str) {
        if let Some(&idx) = self.node_index.get(parent) {
            self.graph[idx].add_child(child);
        }
        if let Some(&idx) = self.node_index.get(child) {
            self.graph[idx].add_parent(parent);
        }
    }

    /// Append an edge between two existing tables.
    ///
    /// Returns `None` when either endpoint is not in the graph.
    pub(crate) fn push_edge(&mut self, edge: LineageEdge) -> Option<EdgeIndex> {
        let source = *self.node_index.get(&edge.source)?;
        let target = *self.node_index.get(&edge.target)?;
        Some(self.graph.add_edge(source, target, edge))
    }

    pub(crate) fn inner(&self) -> &DiGraph<TableNode, LineageEdge> {
        &self.graph
    }

    pub(crate) fn index_of(&self, name: &str) -> Option<NodeIndex> {
        self.node_index.get(name).copied()
    }
}
