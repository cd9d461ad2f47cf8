//! Shortcut application: binds the shortcut table to toolbar actions
//!
//! Shortcut callbacks run synchronously inside the engine, so they only queue
//! the action on a channel. The queued actions are then executed one at a
//! time by [`ShortcutApp::run_pending`] or [`run_actions`].

use std::time::Instant;

use swatchkeys_shortcut::{
    DispatchConfig, KeyEvent, KeyOutcome, ParseError, ShortcutEngine, ShortcutHandle,
    ShortcutOptions,
};
use tokio::sync::mpsc;

use crate::actions::{default_shortcuts, ShortcutEntry, ToolbarAction};
use crate::error::AppError;
use crate::settings::{self, SettingsStore};
use crate::toolbar::{DrawToolbar, ToolbarAutomation};

/// Shortcut engine loaded with a shortcut table
pub struct ShortcutApp {
    engine: ShortcutEngine,
    bindings: Vec<(ShortcutEntry, ShortcutHandle)>,
    actions: mpsc::UnboundedReceiver<ToolbarAction>,
}

impl ShortcutApp {
    /// Register every entry of `entries`. Fails on the first invalid sequence.
    pub fn new(entries: Vec<ShortcutEntry>, config: DispatchConfig) -> Result<Self, AppError> {
        let (sender, actions) = mpsc::unbounded_channel();
        let mut engine = ShortcutEngine::with_config(config);
        let mut bindings = Vec::with_capacity(entries.len());

        for entry in entries {
            let sequence = entry.sequence().to_string();
            let action = entry.action();
            let sender = sender.clone();
            let handle = engine.register(entry.sequence(), ShortcutOptions::new(), move || {
                tracing::info!("Shortcut {}", sequence);
                sender
                    .send(action)
                    .map_err(|_| anyhow::anyhow!("action queue closed"))
            })?;
            bindings.push((entry, handle));
        }

        tracing::info!(shortcuts = bindings.len(), "shortcuts registered");
        Ok(ShortcutApp {
            engine,
            bindings,
            actions,
        })
    }

    /// Build from settings: publish the built-in table, then load the user's
    /// table (falling back to the built-in one if it cannot be read) and the
    /// dispatch configuration
    pub fn from_settings(store: &mut dyn SettingsStore) -> Result<Self, AppError> {
        if let Err(e) = settings::publish_defaults(store) {
            tracing::warn!("Failed to publish default shortcuts: {}", e);
        }

        let entries = settings::load_shortcuts(store).unwrap_or_else(|e| {
            tracing::warn!("Failed to load shortcuts, using defaults: {}", e);
            default_shortcuts()
        });
        let config = settings::load_dispatch_config(store).unwrap_or_else(|e| {
            tracing::warn!("Failed to load dispatch settings, using defaults: {}", e);
            DispatchConfig::default()
        });

        Self::new(entries, config)
    }

    pub fn engine(&self) -> &ShortcutEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut ShortcutEngine {
        &mut self.engine
    }

    /// Registered entries with their handles, in table order
    pub fn bindings(&self) -> &[(ShortcutEntry, ShortcutHandle)] {
        &self.bindings
    }

    /// Parse a press like `ctrlcmd-k`, resolving `ctrlcmd` for the engine's
    /// configured platform so it matches how shortcuts were registered
    pub fn parse_key(&self, spec: &str) -> Result<KeyEvent, ParseError> {
        KeyEvent::parse_with(spec, self.engine.config().platform)
    }

    pub fn handle_key(&mut self, event: &KeyEvent) -> KeyOutcome {
        self.engine.handle_key(event)
    }

    pub fn handle_key_at(&mut self, event: &KeyEvent, now: Instant) -> KeyOutcome {
        self.engine.handle_key_at(event, now)
    }

    /// Drain queued actions without running them
    pub fn take_actions(&mut self) -> Vec<ToolbarAction> {
        let mut taken = Vec::new();
        while let Ok(action) = self.actions.try_recv() {
            taken.push(action);
        }
        taken
    }

    /// Run every queued action in order. Failures are logged and skipped.
    /// Returns the number of actions that succeeded.
    pub async fn run_pending<T: DrawToolbar>(
        &mut self,
        automation: &mut ToolbarAutomation<T>,
    ) -> usize {
        let mut succeeded = 0;
        for action in self.take_actions() {
            if run_one(automation, action).await {
                succeeded += 1;
            }
        }
        succeeded
    }

    /// Split into the engine and the action queue, for hosts that run
    /// actions on their own task with [`run_actions`]
    pub fn into_parts(self) -> (ShortcutEngine, mpsc::UnboundedReceiver<ToolbarAction>) {
        (self.engine, self.actions)
    }
}

/// Run queued actions until every sender (the engine's callbacks) is gone.
/// Returns the number of actions that succeeded.
pub async fn run_actions<T: DrawToolbar>(
    mut actions: mpsc::UnboundedReceiver<ToolbarAction>,
    automation: &mut ToolbarAutomation<T>,
) -> usize {
    let mut succeeded = 0;
    while let Some(action) = actions.recv().await {
        if run_one(automation, action).await {
            succeeded += 1;
        }
    }
    succeeded
}

async fn run_one<T: DrawToolbar>(
    automation: &mut ToolbarAutomation<T>,
    action: ToolbarAction,
) -> bool {
    match automation.run(action).await {
        Ok(()) => {
            tracing::info!(%action, "action completed");
            true
        }
        Err(e) => {
            tracing::warn!(%action, "action failed: {}", e);
            false
        }
    }
}
