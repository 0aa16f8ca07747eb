//! Configuration module for lineage views.
//!
//! Handles layout spacing, the view state store location, and environment
//! variable expansion.

mod settings;

pub use settings::{
    expand_env_vars, LayoutSettings, Settings, SettingsError, StoreSettings, DEFAULT_STATE_KEY,
};
