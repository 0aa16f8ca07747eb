//! Hidden-node rewriting.
//!
//! Hiding a table removes it from view without breaking the lineage it
//! sits on. Every visible parent of a hidden table is linked straight to
//! every visible child of that table with a bypass edge labelled
//! `via {hidden}`:
//!
//! ```text
//! p1 ─┐        ┌─▶ c1           p1 ──via h──▶ c1
//!     ├─▶ h ───┤         ==>    p1 ──via h──▶ c2
//! p2 ─┘        └─▶ c2           p2 ──via h──▶ c1
//!                               p2 ──via h──▶ c2
//! ```
//!
//! Only links that touch exactly one hidden table are bridged. Two hidden
//! tables in a row leave a gap; nothing is bridged transitively.
//!
//! The rewrite always starts from the full graph, so revealing a table is
//! just rewriting again with a smaller hidden set.

use std::collections::BTreeSet;

use tracing::debug;

use super::{LineageEdge, LineageGraph, TableNode};

impl LineageGraph {
    /// The visible part of the graph with bypass edges added.
    ///
    /// - Visible tables keep their order; their parent/child lists drop
    ///   hidden names.
    /// - Edges between two visible tables are kept with their ids.
    /// - Bypass edges follow, numbered `b-{n}`, grouped by hidden table in
    ///   graph order.
    ///
    /// Names in `hidden` that are not tables of this graph are ignored.
    /// The `parents`/`children` lists never include bypass links; read the
    /// edges (as `assign_levels`, `roots` and `leaves` do) to see them.
    pub fn hide_nodes(&self, hidden: &BTreeSet<String>) -> LineageGraph {
        let is_visible = |name: &str| self.contains(name) && !hidden.contains(name);
        let mut visible = LineageGraph::new();

        for node in self.nodes().filter(|n| is_visible(n.name.as_str())) {
            visible.insert_node(TableNode {
                name: node.name.clone(),
                table_type: node.table_type.clone(),
                parents: node.parents.iter().filter(|p| is_visible(p.as_str())).cloned().collect(),
                children: node.children.iter().filter(|c| is_visible(c.as_str())).cloned().collect(),
            });
        }

        for edge in self.edges() {
            if is_visible(edge.source.as_str()) && is_visible(edge.target.as_str()) {
                visible.push_edge(edge.clone());
            }
        }

        let mut bypasses = 0usize;
        for node in self.nodes().filter(|n| hidden.contains(&n.name)) {
            for parent in node.parents.iter().filter(|p| is_visible(p.as_str())) {
                for child in node.children.iter().filter(|c| is_visible(c.as_str())) {
                    let id = format!("b-{}", bypasses);
                    visible.push_edge(LineageEdge::bypass(id, parent, child, &node.name));
                    bypasses += 1;
                }
            }
        }

        debug!(
            hidden = self.node_count() - visible.node_count(),
            bypasses, "rewrote lineage graph around hidden tables"
        );
        visible
    }
}
