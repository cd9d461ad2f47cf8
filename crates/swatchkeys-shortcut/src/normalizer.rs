//! Shortcut string normalization
//!
//! A shortcut token such as `ctrl-alt-shift-q` is split on `-`: every segment
//! but the last names a modifier, the last one is the base key. The result is
//! encoded as `[m-][c-][s-][a-]<base>` so that any permutation of the same
//! modifiers yields the same [`KeyToken`]. A full shortcut is a space-separated
//! list of such tokens.

use crate::error::ParseError;
use crate::models::{KeyToken, Modifier, Modifiers, Platform, Sequence};

/// Base key aliases applied after case folding
fn alias(base: &str) -> Option<&'static str> {
    match base {
        "arrowup" => Some("up"),
        "arrowdown" => Some("down"),
        "arrowleft" => Some("left"),
        "arrowright" => Some("right"),
        "enter" => Some("cr"),
        "escape" => Some("esc"),
        " " => Some("space"),
        _ => None,
    }
}

/// Encode a base key and modifier state as a canonical token.
///
/// The base is lower-cased unless `case_sensitive` is set and it is a single
/// character.
pub fn repr_key(base: &str, modifiers: Modifiers, case_sensitive: bool) -> KeyToken {
    let folded = if !case_sensitive || base.chars().count() > 1 {
        base.to_lowercase()
    } else {
        base.to_string()
    };
    let base = alias(&folded).map(str::to_string).unwrap_or(folded);

    let mut token = String::with_capacity(base.len() + 8);
    for modifier in modifiers.iter() {
        token.push_str(modifier.prefix());
        token.push('-');
    }
    token.push_str(&base);
    KeyToken::from_canonical(token)
}

/// Normalizes shortcut specifications for a given platform
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyNormalizer {
    platform: Platform,
}

impl KeyNormalizer {
    pub fn new(platform: Platform) -> Self {
        KeyNormalizer { platform }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Normalize one shortcut token, e.g. `c-a-s-q`
    pub fn key(&self, shortcut: &str, case_sensitive: bool) -> Result<KeyToken, ParseError> {
        let mut parts: Vec<&str> = shortcut.split('-').collect();
        let base = parts.pop().unwrap_or_default();

        let mut modifiers = Modifiers::none();
        for part in parts {
            let modifier = Modifier::from_alias(part, self.platform)
                .ok_or_else(|| ParseError::UnknownModifier(part.to_string()))?;
            modifiers.insert(modifier);
        }

        Ok(repr_key(base, modifiers, case_sensitive))
    }

    /// Normalize a space-separated sequence, e.g. `g g` or `c-k c-s`
    pub fn sequence(&self, sequence: &str, case_sensitive: bool) -> Result<Sequence, ParseError> {
        let tokens = sequence
            .split(' ')
            .map(|key| self.key(key, case_sensitive))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Sequence::new(tokens))
    }
}

/// Normalize one shortcut token using the host platform
pub fn normalize_key(shortcut: &str, case_sensitive: bool) -> Result<KeyToken, ParseError> {
    KeyNormalizer::default().key(shortcut, case_sensitive)
}

/// Normalize a space-separated shortcut sequence using the host platform
pub fn normalize_sequence(sequence: &str, case_sensitive: bool) -> Result<Sequence, ParseError> {
    KeyNormalizer::default().sequence(sequence, case_sensitive)
}
