//! Error types for the toolbar application

use swatchkeys_shortcut::EngineError;
use thiserror::Error;

/// Errors that can occur reading or writing settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Corrupted settings: {0}")]
    Corrupted(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Errors that can occur while automating the toolbar
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("Element not found: {0}")]
    MissingElement(String),

    #[error("Timed out after {waited_ms}ms waiting for {what}")]
    Timeout { what: String, waited_ms: u64 },
}

/// Errors that can occur setting up the application
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    #[error("Shortcut error: {0}")]
    Engine(#[from] EngineError),
}
