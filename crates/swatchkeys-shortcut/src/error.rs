//! Error types for shortcut operations

use thiserror::Error;

/// Errors that can occur while parsing shortcut specifications
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Unknown modifier key: {0}")]
    UnknownModifier(String),

    #[error("Invalid key syntax: {0}")]
    InvalidKeySyntax(String),
}

/// Errors that can occur in the dispatch engine
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
}
