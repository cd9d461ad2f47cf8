//! Shortcut dispatch engine
//!
//! The engine owns two tries, one for case-sensitive shortcuts and one for
//! case-insensitive ones, and walks both in lock-step as keys arrive. A key
//! event either fires exactly one handler, extends an in-progress sequence
//! (armed with a reset deadline), or falls through.
//!
//! Time is passed in explicitly through [`ShortcutEngine::handle_key_at`] and
//! [`ShortcutEngine::check_timeout`] so hosts can drive the sequence timeout
//! from their own event loop.

use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use crate::condition::ConditionEvaluator;
use crate::error::EngineError;
use crate::models::{DispatchConfig, HandlerId, KeyEvent, KeyToken, Modifiers, Sequence};
use crate::normalizer::{repr_key, KeyNormalizer};
use crate::trie::TrieNode;

/// Callback run when a shortcut fires. Errors are swallowed by the engine.
pub type Callback = Box<dyn FnMut() -> anyhow::Result<()>>;

/// Per-shortcut registration options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShortcutOptions {
    /// Match single-character keys by their literal case
    pub case_sensitive: bool,
    /// Condition expression over context flags, e.g. `editing && !readonly`
    pub condition: Option<String>,
}

impl ShortcutOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }
}

/// Token returned by [`ShortcutEngine::register`], used to unregister
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShortcutHandle {
    id: HandlerId,
}

impl ShortcutHandle {
    pub fn id(&self) -> HandlerId {
        self.id
    }

    /// Unregister the shortcut from `engine`. Returns `false` if it was
    /// already gone.
    pub fn release(self, engine: &mut ShortcutEngine) -> bool {
        engine.unregister(self)
    }
}

/// What the engine did with a key event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The event was dropped before dispatch (engine disabled, no key, bare modifier)
    Ignored,
    /// A handler fired; the host should suppress the key's default behaviour
    Handled(HandlerId),
    /// The key is a prefix of a longer sequence; waiting for the next key
    Pending,
    /// Nothing matched
    Unmatched,
}

impl KeyOutcome {
    pub fn is_handled(&self) -> bool {
        matches!(self, KeyOutcome::Handled(_))
    }

    /// Whether the host should suppress the key's default behaviour
    pub fn prevents_default(&self) -> bool {
        self.is_handled()
    }
}

struct Handler {
    sequence: Sequence,
    condition: Option<String>,
    case_sensitive: bool,
    enabled: bool,
    callback: Callback,
}

/// Trie positions reached by one key, as paths from each root
#[derive(Debug, Default)]
struct Step {
    case_sensitive: Option<Vec<KeyToken>>,
    case_insensitive: Option<Vec<KeyToken>>,
}

/// Shortcut registry and key dispatcher
pub struct ShortcutEngine {
    config: DispatchConfig,
    enabled: bool,
    root_cs: TrieNode<HandlerId>,
    root_ci: TrieNode<HandlerId>,
    /// Registration order doubles as iteration order
    handlers: BTreeMap<HandlerId, Handler>,
    next_id: u64,
    conditions: ConditionEvaluator,
    cursor_cs: Option<Vec<KeyToken>>,
    cursor_ci: Option<Vec<KeyToken>>,
    deadline: Option<Instant>,
}

impl ShortcutEngine {
    /// Create an engine with the default configuration
    pub fn new() -> Self {
        Self::with_config(DispatchConfig::default())
    }

    /// Create an engine with a custom configuration
    pub fn with_config(config: DispatchConfig) -> Self {
        ShortcutEngine {
            config,
            enabled: true,
            root_cs: TrieNode::new(),
            root_ci: TrieNode::new(),
            handlers: BTreeMap::new(),
            next_id: 0,
            conditions: ConditionEvaluator::new(),
            cursor_cs: None,
            cursor_ci: None,
            deadline: None,
        }
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Mutable configuration; the sequence timeout is read on every key event
    pub fn config_mut(&mut self) -> &mut DispatchConfig {
        &mut self.config
    }

    /// Register `callback` for a space-separated shortcut sequence such as
    /// `c-a-s-q` or `g g`.
    ///
    /// Fails if the sequence names an unknown modifier. A shortcut whose
    /// condition is currently false is kept but not dispatchable until
    /// [`ShortcutEngine::set_context`] makes it true.
    pub fn register<F>(
        &mut self,
        sequence: &str,
        options: ShortcutOptions,
        callback: F,
    ) -> Result<ShortcutHandle, EngineError>
    where
        F: FnMut() -> anyhow::Result<()> + 'static,
    {
        let normalizer = KeyNormalizer::new(self.config.platform);
        let normalized = normalizer.sequence(sequence, options.case_sensitive)?;
        let condition = options.condition.filter(|c| !c.is_empty());

        let id = HandlerId(self.next_id);
        self.next_id += 1;

        if let Some(condition) = &condition {
            self.conditions.acquire(condition);
        }

        let mut handler = Handler {
            sequence: normalized,
            condition,
            case_sensitive: options.case_sensitive,
            enabled: false,
            callback: Box::new(callback),
        };
        Self::sync_handler(
            id,
            &mut handler,
            &self.conditions,
            &mut self.root_cs,
            &mut self.root_ci,
        );

        tracing::debug!(
            handler = %id,
            sequence = %handler.sequence,
            enabled = handler.enabled,
            "registered shortcut"
        );
        self.handlers.insert(id, handler);

        Ok(ShortcutHandle { id })
    }

    /// Remove a registered shortcut. Returns `false` if it was already removed.
    pub fn unregister(&mut self, handle: ShortcutHandle) -> bool {
        let Some(handler) = self.handlers.remove(&handle.id) else {
            return false;
        };

        if let Some(condition) = &handler.condition {
            self.conditions.release(condition);
        }
        let root = if handler.case_sensitive {
            &mut self.root_cs
        } else {
            &mut self.root_ci
        };
        root.remove(&handler.sequence, Some(&handle.id));

        tracing::debug!(handler = %handle.id, sequence = %handler.sequence, "unregistered shortcut");
        true
    }

    /// Set a context flag and enable or disable every shortcut whose
    /// condition changed as a result
    pub fn set_context(&mut self, flag: &str, value: bool) {
        self.conditions.set_flag(flag, value);

        for (id, handler) in self.handlers.iter_mut() {
            Self::sync_handler(
                *id,
                handler,
                &self.conditions,
                &mut self.root_cs,
                &mut self.root_ci,
            );
        }
    }

    /// Current value of a context flag
    pub fn context(&self, flag: &str) -> Option<bool> {
        self.conditions.flag(flag)
    }

    /// Bring a handler's presence in its trie in line with its condition
    fn sync_handler(
        id: HandlerId,
        handler: &mut Handler,
        conditions: &ConditionEvaluator,
        root_cs: &mut TrieNode<HandlerId>,
        root_ci: &mut TrieNode<HandlerId>,
    ) {
        let enabled = handler
            .condition
            .as_deref()
            .map_or(true, |condition| conditions.is_satisfied(condition));
        if handler.enabled == enabled {
            return;
        }

        handler.enabled = enabled;
        let root = if handler.case_sensitive { root_cs } else { root_ci };
        if enabled {
            root.add(&handler.sequence, id);
        } else {
            root.remove(&handler.sequence, Some(&id));
        }
    }

    /// Start consuming key events (the default)
    pub fn enable(&mut self) {
        self.enabled = true;
    }

    /// Stop consuming key events; any in-progress sequence is dropped
    pub fn disable(&mut self) {
        self.enabled = false;
        self.reset();
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Handle a key event at the current time
    pub fn handle_key(&mut self, event: &KeyEvent) -> KeyOutcome {
        self.handle_key_at(event, Instant::now())
    }

    /// Handle a key event that happened at `now`
    pub fn handle_key_at(&mut self, event: &KeyEvent, now: Instant) -> KeyOutcome {
        if !self.enabled || event.is_ignorable() {
            return KeyOutcome::Ignored;
        }

        self.check_timeout(now);
        self.deadline = None;

        // Shift is already folded into the literal character for the
        // case-sensitive form
        let key_cs = repr_key(
            &event.key,
            Modifiers {
                shift: false,
                ..event.modifiers()
            },
            true,
        );
        let key_ci = repr_key(&event.key, event.modifiers(), false);

        let step = self.advance(&key_cs, &key_ci);

        if let Some(id) = self.candidates(&step).first().copied() {
            self.reset();
            self.invoke(id);
            return KeyOutcome::Handled(id);
        }

        if self.has_continuation(&step) {
            self.cursor_cs = step.case_sensitive;
            self.cursor_ci = step.case_insensitive;
            self.deadline = Some(now + self.config.sequence_timeout());
            tracing::debug!(key = %key_ci, "waiting for next key in sequence");
            return KeyOutcome::Pending;
        }

        self.reset();
        KeyOutcome::Unmatched
    }

    /// Expire a pending sequence whose deadline has passed. Returns `true` if
    /// the engine was reset.
    pub fn check_timeout(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now > deadline => {
                tracing::debug!("sequence timed out");
                self.reset();
                true
            }
            _ => false,
        }
    }

    /// Drop any in-progress sequence
    pub fn reset(&mut self) {
        self.cursor_cs = None;
        self.cursor_ci = None;
        self.deadline = None;
    }

    /// Whether a multi-key sequence is in progress right now
    pub fn is_pending(&self) -> bool {
        self.is_pending_at(Instant::now())
    }

    /// Whether a multi-key sequence is still in progress at `now`. A sequence
    /// whose deadline has passed is no longer pending, even before
    /// [`check_timeout`](Self::check_timeout) resets it.
    pub fn is_pending_at(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| now <= deadline)
    }

    /// When the in-progress sequence expires, if any
    pub fn pending_deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Step the current positions by one key, retrying once from the roots
    /// when an in-progress sequence dead-ends
    fn advance(&self, key_cs: &KeyToken, key_ci: &KeyToken) -> Step {
        let resumed = self.cursor_cs.is_some() || self.cursor_ci.is_some();
        if resumed {
            let step = self.step(self.cursor_cs.clone(), self.cursor_ci.clone(), key_cs, key_ci);
            if !self.candidates(&step).is_empty() || self.has_continuation(&step) {
                return step;
            }
            tracing::debug!(key = %key_ci, "sequence dead end, retrying from root");
        }
        self.step(Some(Vec::new()), Some(Vec::new()), key_cs, key_ci)
    }

    fn step(
        &self,
        cursor_cs: Option<Vec<KeyToken>>,
        cursor_ci: Option<Vec<KeyToken>>,
        key_cs: &KeyToken,
        key_ci: &KeyToken,
    ) -> Step {
        fn extend(
            root: &TrieNode<HandlerId>,
            cursor: Option<Vec<KeyToken>>,
            key: &KeyToken,
        ) -> Option<Vec<KeyToken>> {
            let mut path = cursor?;
            path.push(key.clone());
            root.get(&path).map(|_| path)
        }

        Step {
            case_sensitive: extend(&self.root_cs, cursor_cs, key_cs),
            case_insensitive: extend(&self.root_ci, cursor_ci, key_ci),
        }
    }

    fn node_cs(&self, step: &Step) -> Option<&TrieNode<HandlerId>> {
        step.case_sensitive
            .as_ref()
            .and_then(|path| self.root_cs.get(path))
    }

    fn node_ci(&self, step: &Step) -> Option<&TrieNode<HandlerId>> {
        step.case_insensitive
            .as_ref()
            .and_then(|path| self.root_ci.get(path))
    }

    /// Handlers matched by a step, highest priority first: the most recently
    /// inserted case-sensitive handler, down to the oldest case-insensitive one
    fn candidates(&self, step: &Step) -> Vec<HandlerId> {
        let ci = self.node_ci(step).map(TrieNode::handlers).unwrap_or_default();
        let cs = self.node_cs(step).map(TrieNode::handlers).unwrap_or_default();
        ci.iter().chain(cs.iter()).rev().copied().collect()
    }

    fn has_continuation(&self, step: &Step) -> bool {
        self.node_cs(step).is_some_and(TrieNode::has_children)
            || self.node_ci(step).is_some_and(TrieNode::has_children)
    }

    fn invoke(&mut self, id: HandlerId) {
        let Some(handler) = self.handlers.get_mut(&id) else {
            return;
        };

        let result = panic::catch_unwind(AssertUnwindSafe(|| (handler.callback)()));
        match result {
            Ok(Ok(())) => {
                tracing::debug!(handler = %id, sequence = %handler.sequence, "shortcut fired");
            }
            Ok(Err(e)) => {
                tracing::debug!(handler = %id, sequence = %handler.sequence, "shortcut callback failed: {:#}", e);
            }
            Err(_) => {
                tracing::debug!(handler = %id, sequence = %handler.sequence, "shortcut callback panicked");
            }
        }
    }

    /// The trie for one case-sensitivity mode
    pub fn trie(&self, case_sensitive: bool) -> &TrieNode<HandlerId> {
        if case_sensitive {
            &self.root_cs
        } else {
            &self.root_ci
        }
    }

    /// Number of registered shortcuts, enabled or not
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Whether a shortcut is currently dispatchable; `None` once unregistered
    pub fn is_handler_enabled(&self, handle: ShortcutHandle) -> Option<bool> {
        self.handlers.get(&handle.id).map(|handler| handler.enabled)
    }

    /// Normalized sequence of a registered shortcut
    pub fn sequence(&self, handle: ShortcutHandle) -> Option<&Sequence> {
        self.handlers.get(&handle.id).map(|handler| &handler.sequence)
    }

    /// Number of distinct condition expressions in use
    pub fn condition_count(&self) -> usize {
        self.conditions.len()
    }
}

impl Default for ShortcutEngine {
    fn default() -> Self {
        Self::new()
    }
}
