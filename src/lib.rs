//! # Lineage
//!
//! Table-level data lineage graphs built from tabular lineage descriptions.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                 RowTable (decoded grid)                  │
//! │  childTableName, childTableType, relationship, ...       │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [filter]
//! ┌─────────────────────────────────────────────────────────┐
//! │          FacetFilter (cascading multi-select)            │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [graph builder]
//! ┌─────────────────────────────────────────────────────────┐
//! │       LineageGraph (tables, labelled multi-edges)        │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [hidden-node rewrite + layout]
//! ┌─────────────────────────────────────────────────────────┐
//! │      DisplayGraph (positioned nodes, bypass edges)       │
//! └─────────────────────────────────────────────────────────┘
//!                          ▲
//!                          │ [view state: hidden ids, positions]
//!                    KeyValueStore
//! ```

pub mod config;
pub mod error;
pub mod filter;
pub mod graph;
pub mod session;
pub mod table;
pub mod view_state;

pub use error::{LineageError, LineageResult};
pub use session::{DisplayGraph, LineageSession};

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::config::{LayoutSettings, Settings};
    pub use crate::error::{LineageError, LineageResult};
    pub use crate::filter::{FacetFilter, FilterState, RowCounts};
    pub use crate::graph::{
        assign_levels, layout, LevelMap, LineageEdge, LineageGraph, Position, PositionedNode,
        TableNode,
    };
    pub use crate::session::{DisplayGraph, LineageSession};
    pub use crate::table::{DatasetStatus, LineageRecord, RowTable, TableError};
    pub use crate::view_state::{
        KeyValueStore, LineageViewState, MemoryStore, SqliteStore, ViewStateManager,
    };
}
