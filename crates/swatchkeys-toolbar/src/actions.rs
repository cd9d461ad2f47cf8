//! Shortcut table entries and the toolbar actions they trigger

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of a toolbar action as stored in settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionKind {
    SelectColor,
    SelectPen,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionKind::SelectColor => write!(f, "selectColor"),
            ActionKind::SelectPen => write!(f, "selectPen"),
        }
    }
}

/// One row of the shortcut table, stored as `["c-a-s-q", "selectColor", 0]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortcutEntry(pub String, pub ActionKind, pub u32);

impl ShortcutEntry {
    pub fn new(sequence: impl Into<String>, kind: ActionKind, arg: u32) -> Self {
        ShortcutEntry(sequence.into(), kind, arg)
    }

    /// Shortcut sequence specification
    pub fn sequence(&self) -> &str {
        &self.0
    }

    pub fn kind(&self) -> ActionKind {
        self.1
    }

    pub fn arg(&self) -> u32 {
        self.2
    }

    /// The toolbar action this entry triggers
    pub fn action(&self) -> ToolbarAction {
        let index = self.2 as usize;
        match self.1 {
            ActionKind::SelectColor => ToolbarAction::SelectColor(index),
            ActionKind::SelectPen => ToolbarAction::SelectPen(index),
        }
    }
}

/// A toolbar action ready to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolbarAction {
    /// Select the n-th swatch of the selected pen's colour palette
    SelectColor(usize),
    /// Select the n-th pen preset
    SelectPen(usize),
}

impl fmt::Display for ToolbarAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolbarAction::SelectColor(index) => write!(f, "selectColor({})", index),
            ToolbarAction::SelectPen(index) => write!(f, "selectPen({})", index),
        }
    }
}

/// Built-in shortcut table used when no table is stored
pub fn default_shortcuts() -> Vec<ShortcutEntry> {
    use ActionKind::{SelectColor, SelectPen};

    [
        ("c-a-s-q", SelectColor, 0),
        ("c-a-s-w", SelectColor, 1),
        ("c-a-s-e", SelectColor, 2),
        ("c-a-s-r", SelectColor, 3),
        ("c-a-s-a", SelectColor, 4),
        ("c-a-s-s", SelectColor, 5),
        ("c-a-s-d", SelectColor, 6),
        ("c-a-s-f", SelectColor, 7),
        ("c-a-s-y", SelectColor, 16),
        ("c-a-s-x", SelectColor, 17),
        ("c-a-s-c", SelectColor, 18),
        ("c-a-s-v", SelectColor, 19),
        ("c-a-s-t", SelectPen, 0),
        ("c-a-s-g", SelectPen, 1),
        ("c-a-s-b", SelectPen, 2),
    ]
    .into_iter()
    .map(|(sequence, kind, arg)| ShortcutEntry::new(sequence, kind, arg))
    .collect()
}
