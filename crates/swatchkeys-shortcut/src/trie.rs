//! Prefix trie of key sequences

use std::collections::HashMap;

use crate::models::KeyToken;

/// One node of the sequence trie.
///
/// Children are owned exclusively. Handlers are kept in insertion order, which
/// the dispatch engine uses as priority. Apart from the root, a node always has
/// at least one child or one handler.
#[derive(Debug, Clone)]
pub struct TrieNode<H> {
    children: HashMap<KeyToken, TrieNode<H>>,
    handlers: Vec<H>,
}

impl<H> Default for TrieNode<H> {
    fn default() -> Self {
        TrieNode {
            children: HashMap::new(),
            handlers: Vec::new(),
        }
    }
}

impl<H: PartialEq> TrieNode<H> {
    /// Create an empty node
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `handler` at the end of `sequence`, creating nodes as needed.
    /// Adding a handler that is already present leaves the node unchanged.
    pub fn add(&mut self, sequence: &[KeyToken], handler: H) {
        let mut node = self;
        for key in sequence {
            node = node.children.entry(key.clone()).or_default();
        }
        if !node.handlers.contains(&handler) {
            node.handlers.push(handler);
        }
    }

    /// Walk `sequence` from this node
    pub fn get(&self, sequence: &[KeyToken]) -> Option<&TrieNode<H>> {
        let mut node = self;
        for key in sequence {
            node = node.children.get(key)?;
        }
        Some(node)
    }

    /// Remove `handler` (or every handler when `None`) from the node at the end
    /// of `sequence`, then prune nodes on the path that were left with neither
    /// children nor handlers. This node itself is never pruned.
    ///
    /// Returns `false` if the path does not exist.
    pub fn remove(&mut self, sequence: &[KeyToken], handler: Option<&H>) -> bool {
        match sequence.split_first() {
            None => {
                match handler {
                    Some(handler) => self.handlers.retain(|h| h != handler),
                    None => self.handlers.clear(),
                }
                true
            }
            Some((key, rest)) => {
                let Some(child) = self.children.get_mut(key) else {
                    return false;
                };
                let found = child.remove(rest, handler);
                if child.is_empty() {
                    self.children.remove(key);
                }
                found
            }
        }
    }

    /// Handlers terminating at this node, oldest first
    pub fn handlers(&self) -> &[H] {
        &self.handlers
    }

    pub fn child(&self, key: &KeyToken) -> Option<&TrieNode<H>> {
        self.children.get(key)
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Whether the node has neither children nor handlers
    pub fn is_empty(&self) -> bool {
        self.children.is_empty() && self.handlers.is_empty()
    }

    /// Number of nodes in this subtree, this node included
    pub fn node_count(&self) -> usize {
        1 + self.children.values().map(TrieNode::node_count).sum::<usize>()
    }
}
