//! Row tables and lineage record extraction.
//!
//! A [`RowTable`] is the rectangular grid of strings handed over by the
//! input decoder: row 0 is the header, every other row is data. Columns
//! are looked up by their *normalized* name (lowercase, whitespace removed),
//! so `Child Table Name`, `childTableName` and ` CHILDTABLENAME ` all
//! resolve to the same column.
//!
//! # Lineage columns
//!
//! ```text
//! childTableName | childTableType | relationship | parentTableName | parentTableType
//! ```
//!
//! All five must be present in the header or the dataset fails structural
//! validation as a whole; there is no per-row failure.

mod hash;

pub use hash::grid_hash;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Canonical names of the required lineage columns, in header order.
pub const REQUIRED_COLUMNS: [&str; 5] = [
    "childTableName",
    "childTableType",
    "relationship",
    "parentTableName",
    "parentTableType",
];

/// Errors raised while validating an input grid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    #[error("Input grid is empty: expected a header row")]
    EmptyGrid,

    #[error(
        "Missing required columns: {} (found: {})",
        .missing.join(", "),
        .found.join(", ")
    )]
    MissingColumns {
        /// Canonical names of the columns that could not be resolved.
        missing: Vec<String>,
        /// Normalized header names that were present.
        found: Vec<String>,
    },
}

pub type TableResult<T> = Result<T, TableError>;

/// Normalize a column name for matching: lowercase, all whitespace removed.
pub fn normalize_column_name(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// A data row keyed by normalized column name.
pub type RowObject = HashMap<String, String>;

/// Whether a structurally valid dataset carries any data rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetStatus {
    /// Header only. Downstream this is a valid, empty graph.
    Empty,
    /// At least one data row.
    Populated { rows: usize },
}

/// One parent → child relationship read from a data row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineageRecord {
    pub child_name: String,
    pub child_type: String,
    pub relationship: String,
    pub parent_name: String,
    pub parent_type: String,
}

impl LineageRecord {
    pub fn new(
        child_name: impl Into<String>,
        child_type: impl Into<String>,
        relationship: impl Into<String>,
        parent_name: impl Into<String>,
        parent_type: impl Into<String>,
    ) -> Self {
        Self {
            child_name: child_name.into(),
            child_type: child_type.into(),
            relationship: relationship.into(),
            parent_name: parent_name.into(),
            parent_type: parent_type.into(),
        }
    }
}

/// Resolved positions of the five lineage columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMapping {
    pub child_name: usize,
    pub child_type: usize,
    pub relationship: usize,
    pub parent_name: usize,
    pub parent_type: usize,
}

impl ColumnMapping {
    fn record(&self, row: &[String]) -> LineageRecord {
        let cell = |idx: usize| row.get(idx).map(|s| s.trim().to_string()).unwrap_or_default();
        LineageRecord {
            child_name: cell(self.child_name),
            child_type: cell(self.child_type),
            relationship: cell(self.relationship),
            parent_name: cell(self.parent_name),
            parent_type: cell(self.parent_type),
        }
    }
}

/// A rectangular grid of strings with a header row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowTable {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
    /// Hash of the rows as given, before padding or truncation
    fingerprint: String,
}

impl RowTable {
    /// Build a table from a header and data rows.
    ///
    /// Short rows are padded with empty trailing cells and long rows are
    /// truncated, so every row has exactly the header's width.
    pub fn new(header: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let fingerprint = grid_hash(&header, &rows);
        let width = header.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self {
            header,
            rows,
            fingerprint,
        }
    }

    /// Build a table from a decoded grid whose first row is the header.
    pub fn from_grid(grid: Vec<Vec<String>>) -> TableResult<Self> {
        let mut iter = grid.into_iter();
        let header = iter.next().ok_or(TableError::EmptyGrid)?;
        if header.is_empty() {
            return Err(TableError::EmptyGrid);
        }
        Ok(Self::new(header, iter.collect()))
    }

    /// Header cells as given.
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Data rows (header excluded).
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn status(&self) -> DatasetStatus {
        if self.rows.is_empty() {
            DatasetStatus::Empty
        } else {
            DatasetStatus::Populated {
                rows: self.rows.len(),
            }
        }
    }

    /// Normalized header names, in header order.
    pub fn column_names(&self) -> Vec<String> {
        self.header.iter().map(|h| normalize_column_name(h)).collect()
    }

    /// Position of a column by (normalized) name. The first match wins.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let wanted = normalize_column_name(name);
        self.header
            .iter()
            .position(|h| normalize_column_name(h) == wanted)
    }

    /// A new table with the same header and the given subset of rows.
    pub fn with_rows(&self, rows: Vec<Vec<String>>) -> Self {
        Self::new(self.header.clone(), rows)
    }

    /// Data rows as column-name → value maps.
    pub fn row_objects(&self) -> Vec<RowObject> {
        let names = self.column_names();
        self.rows
            .iter()
            .map(|row| {
                let mut object = RowObject::with_capacity(names.len());
                for (name, value) in names.iter().zip(row) {
                    object.entry(name.clone()).or_insert_with(|| value.clone());
                }
                object
            })
            .collect()
    }

    /// Resolve the five lineage columns.
    ///
    /// Fails with every missing canonical name at once.
    pub fn validate(&self) -> TableResult<ColumnMapping> {
        let resolved: Vec<Option<usize>> = REQUIRED_COLUMNS
            .iter()
            .map(|name| self.column_index(name))
            .collect();

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .zip(&resolved)
            .filter(|(_, idx)| idx.is_none())
            .map(|(name, _)| name.to_string())
            .collect();

        match resolved.as_slice() {
            [Some(child_name), Some(child_type), Some(relationship), Some(parent_name), Some(parent_type)] => {
                Ok(ColumnMapping {
                    child_name: *child_name,
                    child_type: *child_type,
                    relationship: *relationship,
                    parent_name: *parent_name,
                    parent_type: *parent_type,
                })
            }
            _ => Err(TableError::MissingColumns {
                missing,
                found: self.column_names(),
            }),
        }
    }

    /// Extract one lineage record per data row.
    ///
    /// Cell values are trimmed; table names stay case-sensitive.
    pub fn lineage_records(&self) -> TableResult<Vec<LineageRecord>> {
        let mapping = self.validate()?;
        Ok(self.rows.iter().map(|row| mapping.record(row)).collect())
    }

    /// Fingerprint of the full grid (header + data) as it was given.
    ///
    /// Cells beyond the header width are dropped from the rows but still
    /// count towards the fingerprint.
    pub fn dataset_hash(&self) -> String {
        self.fingerprint.clone()
    }
}
