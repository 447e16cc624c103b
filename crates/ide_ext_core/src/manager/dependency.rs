//! Reverse dependency ("used-by") edges between extensions.
//!
//! # Invariants
//! - Edges are sets: recording the same pair twice keeps one edge.
//! - Edges are never removed; liveness is decided by the caller's
//!   registration predicate at query time.

use std::collections::{BTreeMap, BTreeSet};

/// Tracks which extensions depend on which.
#[derive(Debug, Default, Clone)]
pub struct DependencyTracker {
    used_by: BTreeMap<String, BTreeSet<String>>,
}

impl DependencyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `dependent` requires `dependency`.
    ///
    /// Returns `false` when the edge already existed.
    pub fn record_use(&mut self, dependency: &str, dependent: &str) -> bool {
        self.used_by
            .entry(dependency.to_string())
            .or_default()
            .insert(dependent.to_string())
    }

    /// Every extension that ever depended on `dependency`, sorted by path.
    pub fn used_by(&self, dependency: &str) -> Vec<String> {
        self.used_by
            .get(dependency)
            .map(|users| users.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Dependents that still satisfy `is_registered`.
    pub fn active_dependents(
        &self,
        dependency: &str,
        is_registered: impl Fn(&str) -> bool,
    ) -> Vec<String> {
        let Some(users) = self.used_by.get(dependency) else {
            return vec![];
        };
        users
            .iter()
            .filter(|user| is_registered(user.as_str()))
            .cloned()
            .collect()
    }

    pub fn can_unregister(&self, dependency: &str, is_registered: impl Fn(&str) -> bool) -> bool {
        self.active_dependents(dependency, is_registered).is_empty()
    }
}
