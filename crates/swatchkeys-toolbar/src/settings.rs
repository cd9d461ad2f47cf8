//! Settings storage for the shortcut table and tuning
//!
//! # Storage Location
//!
//! Settings live in a single key/value document, by default at
//! `<config dir>/swatchkeys/settings.json`. A `.yaml` or `.yml` extension
//! selects YAML instead of JSON.
//!
//! # Keys
//!
//! ```json
//! {
//!   "shortcuts_v1": [["c-a-s-q", "selectColor", 0], ["c-a-s-t", "selectPen", 0]],
//!   "shortcuts_vDEFAULT": [["c-a-s-q", "selectColor", 0]],
//!   "dispatch": { "sequence_timeout_ms": 500 },
//!   "automation": { "wait_timeout_ms": 5000, "poll_interval_ms": 50 }
//! }
//! ```
//!
//! `shortcuts_v1` is the user's table; when absent the built-in table is used.
//! `shortcuts_vDEFAULT` is rewritten with the built-in table on every start so
//! it can be copied as a starting point.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use swatchkeys_shortcut::DispatchConfig;

use crate::actions::{default_shortcuts, ShortcutEntry};
use crate::error::SettingsError;
use crate::toolbar::AutomationConfig;

/// Key holding the user's shortcut table
pub const SHORTCUTS_KEY: &str = "shortcuts_v1";
/// Key the built-in table is published under
pub const DEFAULT_SHORTCUTS_KEY: &str = "shortcuts_vDEFAULT";
/// Key holding the dispatch engine configuration
pub const DISPATCH_KEY: &str = "dispatch";
/// Key holding the automation configuration
pub const AUTOMATION_KEY: &str = "automation";

/// Trait for key/value settings storage
pub trait SettingsStore {
    /// Read a value, `None` when the key is absent
    fn get_value(&self, key: &str) -> Result<Option<Value>, SettingsError>;

    /// Write a value, replacing any previous one
    fn set_value(&mut self, key: &str, value: Value) -> Result<(), SettingsError>;
}

/// In-memory settings, mostly for tests and embedding
#[derive(Debug, Clone, Default)]
pub struct MemorySettingsStore {
    values: HashMap<String, Value>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemorySettingsStore {
    fn get_value(&self, key: &str) -> Result<Option<Value>, SettingsError> {
        Ok(self.values.get(key).cloned())
    }

    fn set_value(&mut self, key: &str, value: Value) -> Result<(), SettingsError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// On-disk document format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsFormat {
    Json,
    Yaml,
}

impl SettingsFormat {
    /// Pick the format from a file extension, defaulting to JSON
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                SettingsFormat::Yaml
            }
            _ => SettingsFormat::Json,
        }
    }
}

/// File system based settings
pub struct FileSettingsStore {
    path: PathBuf,
    format: SettingsFormat,
}

impl FileSettingsStore {
    /// Use the document at `path`; it is created on first write
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let format = SettingsFormat::from_path(&path);
        FileSettingsStore { path, format }
    }

    /// Use `<config dir>/swatchkeys/settings.json`
    pub fn with_default_location() -> Self {
        Self::new(Self::default_path())
    }

    /// Default settings path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("swatchkeys")
            .join("settings.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> SettingsFormat {
        self.format
    }

    fn read_document(&self) -> Result<Map<String, Value>, SettingsError> {
        if !self.path.exists() {
            return Ok(Map::new());
        }

        let content = fs::read_to_string(&self.path).map_err(|e| {
            SettingsError::IoError(std::io::Error::new(
                e.kind(),
                format!("Failed to read settings file: {}", e),
            ))
        })?;
        if content.trim().is_empty() {
            return Ok(Map::new());
        }

        let document: Value = match self.format {
            SettingsFormat::Json => serde_json::from_str(&content)
                .map_err(|e| SettingsError::Corrupted(format!("Failed to parse JSON: {}", e)))?,
            SettingsFormat::Yaml => serde_yaml::from_str(&content)
                .map_err(|e| SettingsError::Corrupted(format!("Failed to parse YAML: {}", e)))?,
        };

        match document {
            Value::Object(map) => Ok(map),
            Value::Null => Ok(Map::new()),
            other => Err(SettingsError::Corrupted(format!(
                "Expected a mapping at the top level, found {}",
                other
            ))),
        }
    }

    fn write_document(&self, document: &Map<String, Value>) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    SettingsError::IoError(std::io::Error::new(
                        e.kind(),
                        format!("Failed to create settings directory: {}", e),
                    ))
                })?;
            }
        }

        let content = match self.format {
            SettingsFormat::Json => serde_json::to_string_pretty(document)
                .map_err(|e| SettingsError::SerializationError(e.to_string()))?,
            SettingsFormat::Yaml => serde_yaml::to_string(document)
                .map_err(|e| SettingsError::SerializationError(e.to_string()))?,
        };

        fs::write(&self.path, content).map_err(|e| {
            SettingsError::IoError(std::io::Error::new(
                e.kind(),
                format!("Failed to write settings file: {}", e),
            ))
        })?;
        Ok(())
    }
}

impl SettingsStore for FileSettingsStore {
    fn get_value(&self, key: &str) -> Result<Option<Value>, SettingsError> {
        Ok(self.read_document()?.remove(key))
    }

    fn set_value(&mut self, key: &str, value: Value) -> Result<(), SettingsError> {
        let mut document = self.read_document()?;
        document.insert(key.to_string(), value);
        self.write_document(&document)
    }
}

/// Read and deserialize a value, `None` when absent
pub fn get_typed<T: DeserializeOwned>(
    store: &dyn SettingsStore,
    key: &str,
) -> Result<Option<T>, SettingsError> {
    store
        .get_value(key)?
        .map(|value| {
            serde_json::from_value(value).map_err(|e| SettingsError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })
        })
        .transpose()
}

/// Serialize and write a value
pub fn set_typed<T: Serialize>(
    store: &mut dyn SettingsStore,
    key: &str,
    value: &T,
) -> Result<(), SettingsError> {
    let value =
        serde_json::to_value(value).map_err(|e| SettingsError::SerializationError(e.to_string()))?;
    store.set_value(key, value)
}

/// The user's shortcut table, or the built-in one when none is stored
pub fn load_shortcuts(store: &dyn SettingsStore) -> Result<Vec<ShortcutEntry>, SettingsError> {
    Ok(get_typed(store, SHORTCUTS_KEY)?.unwrap_or_else(default_shortcuts))
}

/// Store the user's shortcut table
pub fn save_shortcuts(
    store: &mut dyn SettingsStore,
    entries: &[ShortcutEntry],
) -> Result<(), SettingsError> {
    set_typed(store, SHORTCUTS_KEY, &entries)
}

/// Publish the built-in table under [`DEFAULT_SHORTCUTS_KEY`]
pub fn publish_defaults(store: &mut dyn SettingsStore) -> Result<(), SettingsError> {
    set_typed(store, DEFAULT_SHORTCUTS_KEY, &default_shortcuts())
}

/// Dispatch configuration, defaults when absent
pub fn load_dispatch_config(store: &dyn SettingsStore) -> Result<DispatchConfig, SettingsError> {
    Ok(get_typed(store, DISPATCH_KEY)?.unwrap_or_default())
}

/// Automation configuration, defaults when absent
pub fn load_automation_config(
    store: &dyn SettingsStore,
) -> Result<AutomationConfig, SettingsError> {
    Ok(get_typed(store, AUTOMATION_KEY)?.unwrap_or_default())
}
