//! Integration tests for persisted view state.

use lineage::config::DEFAULT_STATE_KEY;
use lineage::graph::Position;
use lineage::view_state::{
    KeyValueStore, LineageViewState, MemoryStore, SqliteStore, StoreError, StoreResult,
    ViewStateManager,
};

const KEY: &str = DEFAULT_STATE_KEY;

/// A store whose writes always fail.
#[derive(Default)]
struct ReadOnlyStore {
    inner: MemoryStore,
}

impl KeyValueStore for ReadOnlyStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.inner.get(key)
    }

    fn set(&mut self, _key: &str, _blob: &str) -> StoreResult<()> {
        Err(StoreError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only",
        )))
    }
}

#[test]
fn test_state_survives_a_reload() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    {
        let mut manager = ViewStateManager::load(&mut store, KEY, "hash-1");
        manager.hide("staging").unwrap();
        manager.set_position("orders", Position::new(10.0, 20.0)).unwrap();
    }

    let manager = ViewStateManager::load(&mut store, KEY, "hash-1");
    assert!(manager.state().is_hidden("staging"));
    assert_eq!(
        manager.node_positions().get("orders"),
        Some(&Position::new(10.0, 20.0))
    );
}

#[test]
fn test_other_dataset_starts_empty() {
    let mut store = MemoryStore::new();
    ViewStateManager::load(&mut store, KEY, "hash-1").hide("staging").unwrap();

    let manager = ViewStateManager::load(&mut store, KEY, "hash-2");
    assert!(manager.hidden_node_ids().is_empty());
    assert_eq!(manager.state().dataset_hash, "hash-2");
}

#[test]
fn test_first_write_for_new_dataset_replaces_old_record() {
    let mut store = MemoryStore::new();
    ViewStateManager::load(&mut store, KEY, "hash-1").hide("staging").unwrap();
    ViewStateManager::load(&mut store, KEY, "hash-2").hide("orders").unwrap();

    let stored = LineageViewState::decode(&store.get(KEY).unwrap().unwrap());
    assert_eq!(stored.dataset_hash, "hash-2");
    assert!(!stored.is_hidden("staging"));
    assert!(stored.is_hidden("orders"));
}

#[test]
fn test_garbage_blob_loads_as_empty() {
    let mut store = MemoryStore::new();
    store.set(KEY, "{not json").unwrap();

    let manager = ViewStateManager::load(&mut store, KEY, "hash-1");
    assert!(manager.hidden_node_ids().is_empty());
    assert!(manager.node_positions().is_empty());
}

#[test]
fn test_malformed_fields_are_replaced_individually() {
    let state = LineageViewState::decode(
        r#"{"datasetHash":"h","hiddenNodeIds":["a","b",3],"nodePositions":"oops"}"#,
    );
    assert_eq!(state.dataset_hash, "h");
    assert_eq!(state.hidden_node_ids.len(), 2);
    assert!(state.node_positions.is_empty());
}

#[test]
fn test_bad_position_entries_are_dropped() {
    let state = LineageViewState::decode(
        r#"{"datasetHash":"h","nodePositions":{"a":{"x":1,"y":2},"b":{"x":"left"},"c":null}}"#,
    );
    assert_eq!(state.node_positions.len(), 1);
    assert_eq!(state.node_positions["a"], Position::new(1.0, 2.0));
}

#[test]
fn test_record_uses_camel_case_fields() {
    let mut state = LineageViewState::for_dataset("h");
    state.hidden_node_ids.insert("a".to_string());
    let blob = state.encode().unwrap();

    insta::assert_snapshot!(blob, @r#"{"datasetHash":"h","hiddenNodeIds":["a"],"nodePositions":{}}"#);
}

#[test]
fn test_reveal_keeps_positions_from_another_writer() {
    let mut store = MemoryStore::new();
    let mut manager = ViewStateManager::load(&mut store, KEY, "hash-1");
    manager.hide("staging").unwrap();
    drop(manager);

    // Another writer pins a table behind this manager's back.
    let mut other = ViewStateManager::load(&mut store, KEY, "hash-1");
    other.set_position("orders", Position::new(5.0, 5.0)).unwrap();
    drop(other);

    let mut manager = ViewStateManager::load(&mut store, KEY, "hash-1");
    manager.reveal("staging").unwrap();
    assert!(manager.node_positions().contains_key("orders"));
    assert!(manager.hidden_node_ids().is_empty());
}

#[test]
fn test_reset_forgets_everything() {
    let mut manager = ViewStateManager::load(MemoryStore::new(), KEY, "hash-1");
    manager.hide("a").unwrap();
    manager.set_position("b", Position::new(1.0, 1.0)).unwrap();
    manager.reset().unwrap();

    assert_eq!(manager.state(), &LineageViewState::for_dataset("hash-1"));
}

#[test]
fn test_failed_write_still_updates_memory() {
    let mut manager = ViewStateManager::load(ReadOnlyStore::default(), KEY, "hash-1");

    assert!(manager.hide("staging").is_err());
    assert!(manager.state().is_hidden("staging"));
    assert!(manager.store().get(KEY).unwrap().is_none());
}

#[test]
fn test_hide_and_reveal_report_changes() {
    let mut manager = ViewStateManager::load(MemoryStore::new(), KEY, "hash-1");
    assert!(manager.hide("a").unwrap());
    assert!(!manager.hide("a").unwrap());
    assert!(manager.reveal("a").unwrap());
    assert!(!manager.reveal("a").unwrap());
    assert!(!manager.clear_position("a").unwrap());
}
