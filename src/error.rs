//! Crate-level error type.
//!
//! Each module reports its own error enum; [`LineageError`] wraps them for
//! callers that drive the whole pipeline (the session and the CLI).

use crate::config::SettingsError;
use crate::table::TableError;
use crate::view_state::StoreError;

/// Result type for pipeline operations.
pub type LineageResult<T> = Result<T, LineageError>;

#[derive(Debug, thiserror::Error)]
pub enum LineageError {
    /// The input grid is empty or lacks required lineage columns.
    #[error(transparent)]
    Table(#[from] TableError),

    /// The view state store could not be read or written.
    #[error("View state store error: {0}")]
    Store(#[from] StoreError),

    /// The configuration file is unreadable or invalid.
    #[error("Configuration error: {0}")]
    Settings(#[from] SettingsError),
}

impl LineageError {
    /// Canonical names of missing lineage columns, if that is the failure.
    pub fn missing_columns(&self) -> Option<&[String]> {
        match self {
            LineageError::Table(TableError::MissingColumns { missing, .. }) => Some(missing.as_slice()),
            _ => None,
        }
    }
}
