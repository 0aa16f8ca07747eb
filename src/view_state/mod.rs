//! Persisted per-dataset view state.
//!
//! The view state records which tables the user hid and where they dragged
//! tables to. It belongs to one dataset: on load, a stored record whose
//! `datasetHash` differs from the current dataset is discarded, so opening
//! a different file starts from a clean view.
//!
//! Stored shape (JSON, one fixed key):
//!
//! ```text
//! {
//!   "datasetHash": "…",
//!   "hiddenNodeIds": ["staging_orders", …],
//!   "nodePositions": { "orders": { "x": 120.0, "y": 40.0 }, … }
//! }
//! ```
//!
//! Decoding is lenient: each field is read on its own and falls back to
//! empty when missing or malformed.

mod store;

pub use store::{KeyValueStore, MemoryStore, SqliteStore, StoreError, StoreResult};

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::graph::Position;

/// Hidden tables and manual positions for one dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineageViewState {
    pub dataset_hash: String,
    pub hidden_node_ids: BTreeSet<String>,
    pub node_positions: BTreeMap<String, Position>,
}

impl LineageViewState {
    /// An empty state bound to a dataset.
    pub fn for_dataset(dataset_hash: impl Into<String>) -> Self {
        Self {
            dataset_hash: dataset_hash.into(),
            ..Self::default()
        }
    }

    /// Decode a stored blob, substituting empty values for anything
    /// missing or malformed. Never fails.
    pub fn decode(blob: &str) -> Self {
        let value: Value = match serde_json::from_str(blob) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "discarding unparseable view state");
                return Self::default();
            }
        };
        let Some(record) = value.as_object() else {
            warn!("discarding view state that is not a JSON object");
            return Self::default();
        };

        let dataset_hash = match record.get("datasetHash") {
            Some(Value::String(hash)) => hash.clone(),
            None => String::new(),
            Some(_) => {
                warn!("view state field datasetHash is not a string");
                String::new()
            }
        };

        let hidden_node_ids = match record.get("hiddenNodeIds") {
            Some(Value::Array(ids)) => ids
                .iter()
                .filter_map(|id| id.as_str().map(str::to_string))
                .collect(),
            None => BTreeSet::new(),
            Some(_) => {
                warn!("view state field hiddenNodeIds is not an array");
                BTreeSet::new()
            }
        };

        let node_positions = match record.get("nodePositions") {
            Some(Value::Object(positions)) => positions
                .iter()
                .filter_map(|(id, pos)| {
                    Position::deserialize(pos)
                        .ok()
                        .filter(|p| p.x.is_finite() && p.y.is_finite())
                        .map(|p| (id.clone(), p))
                })
                .collect(),
            None => BTreeMap::new(),
            Some(_) => {
                warn!("view state field nodePositions is not an object");
                BTreeMap::new()
            }
        };

        Self {
            dataset_hash,
            hidden_node_ids,
            node_positions,
        }
    }

    pub fn encode(&self) -> StoreResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn is_hidden(&self, id: &str) -> bool {
        self.hidden_node_ids.contains(id)
    }
}

/// Owns the view state of the loaded dataset and writes every change
/// through to the store.
///
/// Every mutation is a read-modify-write of the stored record, so fields a
/// mutation does not touch keep whatever value the store holds.
pub struct ViewStateManager<S: KeyValueStore> {
    store: S,
    key: String,
    state: LineageViewState,
}

impl<S: KeyValueStore> ViewStateManager<S> {
    /// Load the stored state for `dataset_hash`.
    ///
    /// A missing, unreadable or malformed record, or one belonging to a
    /// different dataset, yields an empty state.
    pub fn load(store: S, key: impl Into<String>, dataset_hash: &str) -> Self {
        let key = key.into();
        let stored = read_record(&store, &key);

        let state = match stored {
            Some(state) if state.dataset_hash == dataset_hash => state,
            Some(state) => {
                debug!(
                    stored = %state.dataset_hash,
                    current = %dataset_hash,
                    "dataset changed, starting from an empty view state"
                );
                LineageViewState::for_dataset(dataset_hash)
            }
            None => LineageViewState::for_dataset(dataset_hash),
        };

        Self { store, key, state }
    }

    pub fn state(&self) -> &LineageViewState {
        &self.state
    }

    pub fn hidden_node_ids(&self) -> &BTreeSet<String> {
        &self.state.hidden_node_ids
    }

    pub fn node_positions(&self) -> &BTreeMap<String, Position> {
        &self.state.node_positions
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Hide a table. Returns false if it was already hidden.
    pub fn hide(&mut self, id: &str) -> StoreResult<bool> {
        self.update(|state| state.hidden_node_ids.insert(id.to_string()))
    }

    /// Reveal a table. Returns false if it was not hidden.
    pub fn reveal(&mut self, id: &str) -> StoreResult<bool> {
        self.update(|state| state.hidden_node_ids.remove(id))
    }

    pub fn reveal_all(&mut self) -> StoreResult<()> {
        self.update(|state| state.hidden_node_ids.clear())
    }

    /// Pin a table at a manual position.
    pub fn set_position(&mut self, id: &str, position: Position) -> StoreResult<()> {
        self.update(|state| {
            state.node_positions.insert(id.to_string(), position);
        })
    }

    /// Drop a manual position. Returns false if there was none.
    pub fn clear_position(&mut self, id: &str) -> StoreResult<bool> {
        self.update(|state| state.node_positions.remove(id).is_some())
    }

    /// Forget everything for this dataset.
    pub fn reset(&mut self) -> StoreResult<()> {
        self.update(|state| {
            state.hidden_node_ids.clear();
            state.node_positions.clear();
        })
    }

    /// Apply `change` to the stored record and write it back.
    ///
    /// The in-memory state is updated even if the write fails.
    fn update<R>(&mut self, change: impl FnOnce(&mut LineageViewState) -> R) -> StoreResult<R> {
        let mut record = match read_record(&self.store, &self.key) {
            Some(stored) if stored.dataset_hash == self.state.dataset_hash => stored,
            _ => self.state.clone(),
        };

        let result = change(&mut record);
        self.state = record;

        let blob = self.state.encode()?;
        if let Err(e) = self.store.set(&self.key, &blob) {
            warn!(error = %e, key = %self.key, "failed to persist view state");
            return Err(e);
        }
        Ok(result)
    }
}

fn read_record<S: KeyValueStore>(store: &S, key: &str) -> Option<LineageViewState> {
    match store.get(key) {
        Ok(Some(blob)) => Some(LineageViewState::decode(&blob)),
        Ok(None) => None,
        Err(e) => {
            warn!(error = %e, key = %key, "failed to read view state");
            None
        }
    }
}
