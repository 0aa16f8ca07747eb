//! Cascading multi-select facet filters over row objects.
//!
//! Each column carries an optional set of selected values. A row passes
//! when, for every restricted column, its value is one of the selected
//! values (AND across columns, OR within a column).
//!
//! The candidate list shown for a column is computed with every *other*
//! column's filter applied but never its own, so a user can always widen
//! their own selection:
//!
//! ```text
//! available(col) = sorted distinct { row[col] | row passes all filters except col }
//! ```
//!
//! Everything is recomputed by a full scan, O(rows × columns) per call.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::table::{normalize_column_name, RowObject, RowTable};

/// Selected values per normalized column name.
///
/// An absent column and an empty set both mean "no restriction".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawFilterState")]
pub struct FilterState {
    selections: BTreeMap<String, BTreeSet<String>>,
}

/// Stored shape of a [`FilterState`], before column names are normalized.
#[derive(Deserialize)]
struct RawFilterState {
    #[serde(default)]
    selections: BTreeMap<String, BTreeSet<String>>,
}

impl From<RawFilterState> for FilterState {
    fn from(raw: RawFilterState) -> Self {
        let mut state = FilterState::new();
        for (column, values) in raw.selections {
            let merged: BTreeSet<String> = state
                .selected(&column)
                .into_iter()
                .flatten()
                .cloned()
                .chain(values)
                .collect();
            state.set(&column, merged);
        }
        state
    }
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected values for a column, if the column is restricted.
    pub fn selected(&self, column: &str) -> Option<&BTreeSet<String>> {
        self.selections
            .get(&normalize_column_name(column))
            .filter(|values| !values.is_empty())
    }

    pub fn is_restricted(&self, column: &str) -> bool {
        self.selected(column).is_some()
    }

    /// Replace a column's selection.
    pub fn set(&mut self, column: &str, values: impl IntoIterator<Item = String>) {
        let values: BTreeSet<String> = values.into_iter().collect();
        let column = normalize_column_name(column);
        if values.is_empty() {
            self.selections.remove(&column);
        } else {
            self.selections.insert(column, values);
        }
    }

    /// Add the value if absent, remove it if present.
    ///
    /// Returns true when the value is selected afterwards.
    pub fn toggle(&mut self, column: &str, value: &str) -> bool {
        let column = normalize_column_name(column);
        let values = self.selections.entry(column.clone()).or_default();
        let selected = if values.remove(value) {
            false
        } else {
            values.insert(value.to_string());
            true
        };
        if values.is_empty() {
            self.selections.remove(&column);
        }
        selected
    }

    pub fn clear(&mut self, column: &str) {
        self.selections.remove(&normalize_column_name(column));
    }

    pub fn clear_all(&mut self) {
        self.selections.clear();
    }

    /// Restricted columns and their selections.
    pub fn active(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.selections
            .iter()
            .filter(|(_, values)| !values.is_empty())
            .map(|(column, values)| (column.as_str(), values))
    }

    pub fn is_empty(&self) -> bool {
        self.active().next().is_none()
    }
}

/// Row totals before and after filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowCounts {
    pub total: usize,
    pub filtered: usize,
}

/// Facet filter engine bound to one table.
#[derive(Debug, Clone)]
pub struct FacetFilter {
    table: RowTable,
    rows: Vec<RowObject>,
    state: FilterState,
}

impl FacetFilter {
    pub fn new(table: RowTable) -> Self {
        Self::with_state(table, FilterState::new())
    }

    pub fn with_state(table: RowTable, state: FilterState) -> Self {
        let rows = table.row_objects();
        Self { table, rows, state }
    }

    pub fn table(&self) -> &RowTable {
        &self.table
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    /// Normalized names of the table's columns.
    pub fn columns(&self) -> Vec<String> {
        self.table.column_names()
    }

    /// Whether `row` satisfies every active filter except `excluding`.
    ///
    /// A column missing from the row reads as the empty string.
    pub fn passes_filters(&self, row: &RowObject, excluding: Option<&str>) -> bool {
        let excluding = excluding.map(normalize_column_name);
        self.state
            .active()
            .filter(|(column, _)| excluding.as_deref() != Some(*column))
            .all(|(column, values)| {
                let value = row.get(column).map(String::as_str).unwrap_or("");
                values.contains(value)
            })
    }

    /// Distinct values of `column` among rows passing every other filter,
    /// sorted ascending.
    pub fn available_values(&self, column: &str) -> Vec<String> {
        let column = normalize_column_name(column);
        let values: BTreeSet<&str> = self
            .rows
            .iter()
            .filter(|row| self.passes_filters(row, Some(column.as_str())))
            .map(|row| row.get(&column).map(String::as_str).unwrap_or(""))
            .collect();
        values.into_iter().map(str::to_string).collect()
    }

    /// Flip one value of one column. Other columns are untouched.
    pub fn toggle_value(&mut self, column: &str, value: &str) -> bool {
        self.state.toggle(column, value)
    }

    /// True when every currently available value of `column` is selected.
    ///
    /// Always evaluated against the live row set.
    pub fn is_fully_selected(&self, column: &str) -> bool {
        let Some(selected) = self.state.selected(column) else {
            return false;
        };
        let available = self.available_values(column);
        !available.is_empty() && available.iter().all(|value| selected.contains(value))
    }

    /// Select every available value, or clear the column when it is
    /// already fully selected.
    ///
    /// The selection is a snapshot of the values available right now, not
    /// a marker that matches future values.
    pub fn select_all(&mut self, column: &str) {
        if self.is_fully_selected(column) {
            self.state.clear(column);
        } else {
            let available = self.available_values(column);
            self.state.set(column, available);
        }
    }

    pub fn clear_column(&mut self, column: &str) {
        self.state.clear(column);
    }

    pub fn clear_all(&mut self) {
        self.state.clear_all();
    }

    /// Rows passing every filter, in table order.
    pub fn filtered_rows(&self) -> Vec<&RowObject> {
        self.rows
            .iter()
            .filter(|row| self.passes_filters(row, None))
            .collect()
    }

    /// The passing rows as a table with the original header.
    pub fn filtered_table(&self) -> RowTable {
        let rows = self
            .table
            .rows()
            .iter()
            .zip(&self.rows)
            .filter(|(_, object)| self.passes_filters(object, None))
            .map(|(row, _)| row.clone())
            .collect();
        self.table.with_rows(rows)
    }

    pub fn row_counts(&self) -> RowCounts {
        RowCounts {
            total: self.rows.len(),
            filtered: self.filtered_rows().len(),
        }
    }
}
