//! Keyboard shortcut dispatch with multi-key sequences and context conditions
//!
//! This crate provides the shortcut core used by swatchkeys:
//! - Shortcut string normalization into canonical key tokens
//! - A prefix trie of key sequences, one per case-sensitivity mode
//! - Condition expressions over boolean context flags, cached per expression
//! - A dispatch engine that resolves each key event to at most one handler

pub mod condition;
pub mod engine;
pub mod error;
pub mod models;
pub mod normalizer;
pub mod trie;

// Re-export public types
pub use condition::{Condition, ConditionEvaluator, ConditionTerm};
pub use engine::{KeyOutcome, ShortcutEngine, ShortcutHandle, ShortcutOptions};
pub use error::{EngineError, ParseError};
pub use models::{DispatchConfig, HandlerId, KeyEvent, KeyToken, Modifier, Modifiers, Platform, Sequence};
pub use normalizer::{normalize_key, normalize_sequence, repr_key, KeyNormalizer};
pub use trie::TrieNode;
