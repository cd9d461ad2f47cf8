//! Core data models for shortcuts

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::error::ParseError;

/// Default time a partially typed sequence stays alive, in milliseconds
pub const DEFAULT_SEQUENCE_TIMEOUT_MS: u64 = 500;

/// Host platform, used to resolve the `ctrlcmd` modifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    MacOs,
    Other,
}

impl Platform {
    /// Detect the platform this binary was built for
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Platform::MacOs
        } else {
            Platform::Other
        }
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::current()
    }
}

/// Represents a keyboard modifier (Meta, Ctrl, Shift, Alt)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    Meta,
    Ctrl,
    Shift,
    Alt,
}

impl Modifier {
    /// Resolve a modifier alias, case-insensitively
    pub fn from_alias(alias: &str, platform: Platform) -> Option<Modifier> {
        match alias.to_lowercase().as_str() {
            "c" | "ctrl" | "control" => Some(Modifier::Ctrl),
            "s" | "shift" => Some(Modifier::Shift),
            "a" | "alt" => Some(Modifier::Alt),
            "m" | "meta" => Some(Modifier::Meta),
            "ctrlcmd" => Some(match platform {
                Platform::MacOs => Modifier::Meta,
                Platform::Other => Modifier::Ctrl,
            }),
            _ => None,
        }
    }

    /// Whether the string names a modifier on any platform
    pub fn is_alias(name: &str) -> bool {
        Self::from_alias(name, Platform::Other).is_some()
    }

    /// Single-letter prefix used in the canonical token form
    pub fn prefix(&self) -> &'static str {
        match self {
            Modifier::Meta => "m",
            Modifier::Ctrl => "c",
            Modifier::Shift => "s",
            Modifier::Alt => "a",
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Modifier::Meta => write!(f, "Meta"),
            Modifier::Ctrl => write!(f, "Ctrl"),
            Modifier::Shift => write!(f, "Shift"),
            Modifier::Alt => write!(f, "Alt"),
        }
    }
}

/// Set of held modifiers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Modifiers {
    pub meta: bool,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    /// No modifiers held
    pub fn none() -> Self {
        Self::default()
    }

    /// Mark a modifier as held
    pub fn insert(&mut self, modifier: Modifier) {
        match modifier {
            Modifier::Meta => self.meta = true,
            Modifier::Ctrl => self.ctrl = true,
            Modifier::Shift => self.shift = true,
            Modifier::Alt => self.alt = true,
        }
    }

    /// Builder form of [`Modifiers::insert`]
    pub fn with(mut self, modifier: Modifier) -> Self {
        self.insert(modifier);
        self
    }

    /// Held modifiers in canonical order: meta, ctrl, shift, alt
    pub fn iter(&self) -> impl Iterator<Item = Modifier> + '_ {
        [
            (self.meta, Modifier::Meta),
            (self.ctrl, Modifier::Ctrl),
            (self.shift, Modifier::Shift),
            (self.alt, Modifier::Alt),
        ]
        .into_iter()
        .filter_map(|(held, modifier)| held.then_some(modifier))
    }
}

/// Canonical encoding of one key press plus modifier state, e.g. `c-s-q`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyToken(String);

impl KeyToken {
    /// Wrap an already-canonical token string
    pub(crate) fn from_canonical(token: String) -> Self {
        KeyToken(token)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for KeyToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for KeyToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Ordered list of key tokens forming one shortcut
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sequence(Vec<KeyToken>);

impl Sequence {
    pub fn new(tokens: Vec<KeyToken>) -> Self {
        Sequence(tokens)
    }

    pub fn tokens(&self) -> &[KeyToken] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", token)?;
        }
        Ok(())
    }
}

impl std::ops::Deref for Sequence {
    type Target = [KeyToken];

    fn deref(&self) -> &[KeyToken] {
        &self.0
    }
}

/// Identifier of a registered handler, unique for the engine's lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(pub(crate) u64);

impl HandlerId {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A physical key press as reported by the host
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyEvent {
    /// Key identifier as produced by the keyboard layout (`"q"`, `"Q"`, `"Enter"`, ...)
    pub key: String,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub meta: bool,
}

impl KeyEvent {
    /// Create an event with no modifiers held
    pub fn new(key: impl Into<String>) -> Self {
        KeyEvent {
            key: key.into(),
            ..Default::default()
        }
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn with_alt(mut self) -> Self {
        self.alt = true;
        self
    }

    pub fn with_meta(mut self) -> Self {
        self.meta = true;
        self
    }

    /// Modifier state carried by this event
    pub fn modifiers(&self) -> Modifiers {
        Modifiers {
            meta: self.meta,
            ctrl: self.ctrl,
            shift: self.shift,
            alt: self.alt,
        }
    }

    /// Whether the event should be dropped before dispatch: no key at all,
    /// or a bare modifier key (`Shift`, `Control`, ...)
    pub fn is_ignorable(&self) -> bool {
        self.key.is_empty() || (self.key.chars().count() > 1 && Modifier::is_alias(&self.key))
    }

    /// Build the event a keyboard would produce for a press like `ctrl-alt-shift-q`.
    ///
    /// With shift held, a single lower-case character is reported upper-cased,
    /// the way a keyboard layout does. `ctrlcmd` resolves for the host platform.
    pub fn parse(spec: &str) -> Result<Self, ParseError> {
        Self::parse_with(spec, Platform::current())
    }

    /// Like [`KeyEvent::parse`], resolving `ctrlcmd` for `platform`
    pub fn parse_with(spec: &str, platform: Platform) -> Result<Self, ParseError> {
        let mut parts: Vec<&str> = spec.split('-').collect();
        let base = parts.pop().unwrap_or_default();
        if base.is_empty() {
            return Err(ParseError::InvalidKeySyntax(format!(
                "Missing key in press: {}",
                spec
            )));
        }

        let mut modifiers = Modifiers::none();
        for part in parts {
            let modifier = Modifier::from_alias(part, platform)
                .ok_or_else(|| ParseError::UnknownModifier(part.to_string()))?;
            modifiers.insert(modifier);
        }

        let key = if modifiers.shift && base.chars().count() == 1 {
            base.to_uppercase()
        } else {
            base.to_string()
        };

        Ok(KeyEvent {
            key,
            ctrl: modifiers.ctrl,
            shift: modifiers.shift,
            alt: modifiers.alt,
            meta: modifiers.meta,
        })
    }
}

/// Dispatch engine configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// How long a partially typed sequence waits for its next key
    pub sequence_timeout_ms: u64,
    /// Platform used to resolve `ctrlcmd`
    pub platform: Platform,
}

impl DispatchConfig {
    pub fn sequence_timeout(&self) -> Duration {
        Duration::from_millis(self.sequence_timeout_ms)
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        DispatchConfig {
            sequence_timeout_ms: DEFAULT_SEQUENCE_TIMEOUT_MS,
            platform: Platform::current(),
        }
    }
}
