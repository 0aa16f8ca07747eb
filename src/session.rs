//! End-to-end lineage view over one loaded dataset.
//!
//! A [`LineageSession`] owns the three pieces of user-facing state: the
//! validated table, the facet filter selections and the persisted view
//! state. [`LineageSession::display`] recomputes the displayed graph from
//! scratch out of that snapshot on every call:
//!
//! ```text
//! RowTable ─filter─▶ filtered RowTable ─build─▶ LineageGraph
//!     ─hide_nodes(hidden)─▶ visible graph ─assign_levels─▶ levels
//!     ─layout(positions)─▶ DisplayGraph
//! ```
//!
//! Nothing derived is cached, so the output can never drift from the
//! inputs.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::config::{LayoutSettings, Settings};
use crate::error::LineageResult;
use crate::filter::{FacetFilter, FilterState, RowCounts};
use crate::graph::{assign_levels, layout, LineageEdge, LineageGraph, Position, PositionedNode};
use crate::table::{DatasetStatus, RowTable};
use crate::view_state::{KeyValueStore, StoreResult, ViewStateManager};

/// The graph as it should be drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayGraph {
    /// Visible tables with their layer and position
    pub nodes: Vec<PositionedNode>,
    /// Direct edges followed by bypass edges
    pub edges: Vec<LineageEdge>,
    /// Hidden tables that exist in the current (filtered) graph
    pub hidden: Vec<String>,
    /// Row totals before and after filtering
    pub counts: RowCounts,
}

impl DisplayGraph {
    pub fn node(&self, id: &str) -> Option<&PositionedNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn bypass_edges(&self) -> impl Iterator<Item = &LineageEdge> {
        self.edges.iter().filter(|e| e.is_bypass())
    }

    pub fn direct_edges(&self) -> impl Iterator<Item = &LineageEdge> {
        self.edges.iter().filter(|e| !e.is_bypass())
    }
}

/// One loaded dataset with its filters and persisted view state.
pub struct LineageSession<S: KeyValueStore> {
    filter: FacetFilter,
    view: ViewStateManager<S>,
    layout: LayoutSettings,
    dataset_hash: String,
}

impl<S: KeyValueStore> LineageSession<S> {
    /// Validate a decoded grid and attach the stored view state for it.
    ///
    /// Fails without touching the store if the grid is empty or lacks
    /// lineage columns.
    pub fn open(grid: Vec<Vec<String>>, store: S, settings: &Settings) -> LineageResult<Self> {
        let table = RowTable::from_grid(grid)?;
        table.validate()?;

        let dataset_hash = table.dataset_hash();
        let view = ViewStateManager::load(store, settings.store.key.clone(), &dataset_hash);

        Ok(Self {
            filter: FacetFilter::new(table),
            view,
            layout: settings.layout.clone(),
            dataset_hash,
        })
    }

    pub fn table(&self) -> &RowTable {
        self.filter.table()
    }

    pub fn status(&self) -> DatasetStatus {
        self.table().status()
    }

    pub fn dataset_hash(&self) -> &str {
        &self.dataset_hash
    }

    pub fn filters(&self) -> &FilterState {
        self.filter.state()
    }

    pub fn view_state(&self) -> &ViewStateManager<S> {
        &self.view
    }

    pub fn row_counts(&self) -> RowCounts {
        self.filter.row_counts()
    }

    pub fn available_values(&self, column: &str) -> Vec<String> {
        self.filter.available_values(column)
    }

    pub fn toggle_filter(&mut self, column: &str, value: &str) -> bool {
        self.filter.toggle_value(column, value)
    }

    pub fn select_all(&mut self, column: &str) {
        self.filter.select_all(column)
    }

    pub fn clear_filter(&mut self, column: &str) {
        self.filter.clear_column(column)
    }

    pub fn clear_filters(&mut self) {
        self.filter.clear_all()
    }

    pub fn hide(&mut self, id: &str) -> StoreResult<bool> {
        self.view.hide(id)
    }

    pub fn reveal(&mut self, id: &str) -> StoreResult<bool> {
        self.view.reveal(id)
    }

    pub fn reveal_all(&mut self) -> StoreResult<()> {
        self.view.reveal_all()
    }

    /// Pin a table where the user dropped it.
    pub fn move_node(&mut self, id: &str, position: Position) -> StoreResult<()> {
        self.view.set_position(id, position)
    }

    /// Return a table to its computed position.
    pub fn unpin(&mut self, id: &str) -> StoreResult<bool> {
        self.view.clear_position(id)
    }

    /// Forget hidden tables and pinned positions for this dataset.
    pub fn reset_view(&mut self) -> StoreResult<()> {
        self.view.reset()
    }

    /// The full graph of the filtered rows, before hiding.
    pub fn graph(&self) -> LineageResult<LineageGraph> {
        Ok(LineageGraph::from_table(&self.filter.filtered_table())?)
    }

    /// Recompute the displayed graph from the current snapshot.
    pub fn display(&self) -> LineageResult<DisplayGraph> {
        let graph = self.graph()?;
        let hidden_ids = self.view.hidden_node_ids();
        let visible = graph.hide_nodes(hidden_ids);
        let levels = assign_levels(&visible);
        let nodes = layout(&visible, &levels, &self.layout, self.view.node_positions());

        let hidden: BTreeSet<&str> = hidden_ids
            .iter()
            .map(String::as_str)
            .filter(|id| graph.contains(id))
            .collect();

        Ok(DisplayGraph {
            nodes,
            edges: visible.edges().cloned().collect(),
            hidden: hidden.into_iter().map(str::to_string).collect(),
            counts: self.filter.row_counts(),
        })
    }
}
