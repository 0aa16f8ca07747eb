//! Layered layout.
//!
//! Tables are placed in columns by level and stacked in order of first
//! appearance within each column. Odd columns are shifted down by half a
//! row so edges between neighbouring columns overlap less:
//!
//! ```text
//! x = level * column_spacing
//! y = index_within_level * row_spacing + (level mod 2) * stagger
//! ```
//!
//! A stored manual position replaces the computed one entirely.

use std::collections::{BTreeMap, HashMap};

use crate::config::LayoutSettings;

use super::{LevelMap, LineageGraph, Position, PositionedNode};

/// Place every table of `graph`.
///
/// Output order follows the graph's node order. Tables missing from
/// `levels` are treated as level 0.
pub fn layout(
    graph: &LineageGraph,
    levels: &LevelMap,
    settings: &LayoutSettings,
    overrides: &BTreeMap<String, Position>,
) -> Vec<PositionedNode> {
    let mut next_slot: HashMap<usize, usize> = HashMap::new();

    graph
        .nodes()
        .map(|node| {
            let level = levels.get(&node.name).copied().unwrap_or(0);
            let slot = next_slot.entry(level).or_insert(0);
            let index = *slot;
            *slot += 1;

            let (position, pinned) = match overrides.get(&node.name) {
                Some(&manual) => (manual, true),
                None => (settings.position(level, index), false),
            };

            PositionedNode {
                id: node.name.clone(),
                table_type: node.table_type.clone(),
                level,
                position,
                pinned,
            }
        })
        .collect()
}

impl LayoutSettings {
    /// Computed position of the `index`-th table in column `level`.
    pub fn position(&self, level: usize, index: usize) -> Position {
        let stagger = if level % 2 == 1 { self.stagger } else { 0.0 };
        Position::new(
            level as f64 * self.column_spacing,
            index as f64 * self.row_spacing + stagger,
        )
    }
}
