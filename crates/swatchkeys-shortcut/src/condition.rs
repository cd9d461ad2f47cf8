//! Context conditions gating shortcuts
//!
//! A condition is a conjunction of context flags, each optionally negated:
//! `editing && !readonly`. Parsed conditions and their last result are cached
//! per expression string and shared by every handler that uses the same text.

use std::collections::HashMap;

/// One term of a condition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionTerm {
    pub negated: bool,
    pub field: String,
}

/// Parsed condition expression (AND of terms)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Condition {
    terms: Vec<ConditionTerm>,
}

impl Condition {
    /// Parse an expression like `a && !b`. Empty terms are skipped.
    pub fn parse(expr: &str) -> Self {
        let terms = expr
            .split("&&")
            .filter_map(|term| {
                let term = term.trim();
                if term.is_empty() {
                    return None;
                }
                Some(match term.strip_prefix('!') {
                    Some(field) => ConditionTerm {
                        negated: true,
                        field: field.trim().to_string(),
                    },
                    None => ConditionTerm {
                        negated: false,
                        field: term.to_string(),
                    },
                })
            })
            .collect();
        Condition { terms }
    }

    pub fn terms(&self) -> &[ConditionTerm] {
        &self.terms
    }

    /// True iff every term holds. Missing flags read as `false`.
    pub fn evaluate(&self, context: &HashMap<String, bool>) -> bool {
        self.terms.iter().all(|term| {
            let value = context.get(&term.field).copied().unwrap_or(false);
            value != term.negated
        })
    }
}

#[derive(Debug, Clone)]
struct CachedCondition {
    condition: Condition,
    result: bool,
    ref_count: usize,
}

/// Context flags plus a reference-counted cache of condition results
#[derive(Debug, Clone, Default)]
pub struct ConditionEvaluator {
    context: HashMap<String, bool>,
    cache: HashMap<String, CachedCondition>,
}

impl ConditionEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start using `expr`: parse and evaluate it on first use, otherwise bump
    /// its reference count
    pub fn acquire(&mut self, expr: &str) {
        if let Some(cached) = self.cache.get_mut(expr) {
            cached.ref_count += 1;
            return;
        }
        let condition = Condition::parse(expr);
        let result = condition.evaluate(&self.context);
        self.cache.insert(
            expr.to_string(),
            CachedCondition {
                condition,
                result,
                ref_count: 1,
            },
        );
    }

    /// Stop using `expr`; the cache entry is evicted when nobody uses it
    pub fn release(&mut self, expr: &str) {
        if let Some(cached) = self.cache.get_mut(expr) {
            cached.ref_count = cached.ref_count.saturating_sub(1);
            if cached.ref_count == 0 {
                self.cache.remove(expr);
            }
        }
    }

    /// Cached result for `expr`. Expressions not in the cache count as satisfied.
    pub fn is_satisfied(&self, expr: &str) -> bool {
        self.cache.get(expr).map_or(true, |cached| cached.result)
    }

    /// Set a context flag and re-evaluate every cached condition
    pub fn set_flag(&mut self, name: impl Into<String>, value: bool) {
        self.context.insert(name.into(), value);
        for cached in self.cache.values_mut() {
            cached.result = cached.condition.evaluate(&self.context);
        }
    }

    pub fn flag(&self, name: &str) -> Option<bool> {
        self.context.get(name).copied()
    }

    /// Reference count of a cached expression, 0 when not cached
    pub fn ref_count(&self, expr: &str) -> usize {
        self.cache.get(expr).map_or(0, |cached| cached.ref_count)
    }

    /// Number of distinct cached expressions
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}
