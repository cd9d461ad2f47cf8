//! Drawing toolbar shortcuts
//!
//! This crate wires the shortcut engine to a drawing toolbar:
//! - A table of `[sequence, action, argument]` triples with built-in defaults
//! - A settings store (JSON or YAML) holding the user's table and tuning
//! - Async automation flows selecting colour swatches and pen presets
//! - An app that turns fired shortcuts into queued toolbar actions

pub mod actions;
pub mod app;
pub mod error;
pub mod settings;
pub mod simulated;
pub mod toolbar;

// Re-export public types
pub use actions::{default_shortcuts, ActionKind, ShortcutEntry, ToolbarAction};
pub use app::{run_actions, ShortcutApp};
pub use error::{ActionError, AppError, SettingsError};
pub use settings::{FileSettingsStore, MemorySettingsStore, SettingsFormat, SettingsStore};
pub use simulated::{SimulatedToolbar, ToolbarClick};
pub use toolbar::{AutomationConfig, DrawToolbar, ToolbarAutomation};
