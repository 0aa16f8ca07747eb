//! TOML-based configuration for lineage views.
//!
//! Supports a config file (lineage.toml) with environment variable expansion
//! in the store path.
//!
//! Example configuration:
//! ```toml
//! [layout]
//! column_spacing = 300.0
//! row_spacing = 120.0
//! stagger = 60.0
//!
//! [store]
//! path = "${HOME}/.lineage/state.db"
//! key = "lineage.viewState"
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Key the view state is stored under when none is configured.
pub const DEFAULT_STATE_KEY: &str = "lineage.viewState";

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Failed to determine home directory")]
    NoHomeDir,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Layered layout spacing.
    pub layout: LayoutSettings,

    /// Where view state is persisted.
    pub store: StoreSettings,
}

/// Layered layout spacing.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LayoutSettings {
    /// Horizontal distance between levels.
    pub column_spacing: f64,

    /// Vertical distance between tables of the same level.
    pub row_spacing: f64,

    /// Extra vertical offset applied to odd levels.
    pub stagger: f64,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            column_spacing: 300.0,
            row_spacing: 120.0,
            stagger: 60.0,
        }
    }
}

impl LayoutSettings {
    /// Reject spacings that would collapse or invert the layout.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let fields = [
            ("column_spacing", self.column_spacing),
            ("row_spacing", self.row_spacing),
            ("stagger", self.stagger),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(SettingsError::InvalidConfig(format!(
                    "layout.{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// View state store settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreSettings {
    /// SQLite file path (supports ${ENV_VAR} and a leading `~`).
    /// Defaults to `~/.lineage/state.db`.
    pub path: Option<String>,

    /// Key of the persisted view state record.
    pub key: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            path: None,
            key: DEFAULT_STATE_KEY.to_string(),
        }
    }
}

impl StoreSettings {
    /// The store file path with environment variables and `~` expanded.
    pub fn resolved_path(&self) -> Result<PathBuf, SettingsError> {
        let Some(path) = &self.path else {
            let home = dirs::home_dir().ok_or(SettingsError::NoHomeDir)?;
            return Ok(home.join(".lineage").join("state.db"));
        };

        let expanded = expand_env_vars(path)?;
        match expanded.strip_prefix("~/") {
            Some(rest) => {
                let home = dirs::home_dir().ok_or(SettingsError::NoHomeDir)?;
                Ok(home.join(rest))
            }
            None => Ok(PathBuf::from(expanded)),
        }
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate settings from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, SettingsError> {
        let settings: Settings = toml::from_str(content)?;
        settings.layout.validate()?;
        if settings.store.key.trim().is_empty() {
            return Err(SettingsError::InvalidConfig(
                "store.key must not be empty".to_string(),
            ));
        }
        Ok(settings)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `LINEAGE_CONFIG`
    /// 2. `./lineage.toml`
    /// 3. `~/.config/lineage/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var("LINEAGE_CONFIG") {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("lineage.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("lineage").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        Ok(Settings::default())
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        let mut var_name = String::new();
        if chars.peek() == Some(&'{') {
            chars.next();
            for ch in chars.by_ref() {
                if ch == '}' {
                    break;
                }
                var_name.push(ch);
            }
        } else {
            while let Some(&ch) = chars.peek() {
                if !(ch.is_alphanumeric() || ch == '_') {
                    break;
                }
                var_name.push(ch);
                chars.next();
            }
            if var_name.is_empty() {
                // Just a lone $, keep it
                result.push('$');
                continue;
            }
        }

        let value =
            env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name.clone()))?;
        result.push_str(&value);
    }

    Ok(result)
}
