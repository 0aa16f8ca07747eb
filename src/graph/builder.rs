//! Graph construction from lineage records.

use tracing::debug;

use crate::table::{LineageRecord, RowTable, TableResult};

use super::{LineageEdge, LineageGraph};

impl LineageGraph {
    /// Build the graph from lineage records.
    ///
    /// For each record both tables are created on first sight (parent
    /// first, then child), the parent/child lists are updated without
    /// duplicates, and one edge `e-{n}` is appended. Edge numbering starts
    /// at zero on every build.
    ///
    /// A table's type is whatever the last record mentioning it said.
    /// Records with a blank parent or child name do not identify a table
    /// and are skipped.
    pub fn from_records(records: &[LineageRecord]) -> Self {
        let mut graph = LineageGraph::new();
        let mut skipped = 0usize;

        for record in records {
            if record.parent_name.is_empty() || record.child_name.is_empty() {
                skipped += 1;
                continue;
            }

            graph.upsert_node(&record.parent_name, &record.parent_type);
            graph.upsert_node(&record.child_name, &record.child_type);
            graph.link(&record.parent_name, &record.child_name);

            let id = format!("e-{}", graph.edge_count());
            graph.push_edge(LineageEdge::new(
                id,
                &record.parent_name,
                &record.child_name,
                &record.relationship,
            ));
        }

        debug!(
            tables = graph.node_count(),
            edges = graph.edge_count(),
            skipped,
            "built lineage graph"
        );
        graph
    }

    /// Validate the table's lineage columns and build the graph.
    pub fn from_table(table: &RowTable) -> TableResult<Self> {
        let records = table.lineage_records()?;
        Ok(Self::from_records(&records))
    }
}
