// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dependency predicates over stateful objects.

use crate::object::ObjectKey;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Target state for a reverse dependent whose requirement has been broken.
///
/// The source allows this to be a plain state literal or a callable of the
/// new state (`new_state -> state`); a closure has no serializable, testable
/// analogue here, so it is represented as a tagged variant: either a fixed
/// literal or a finite lookup table keyed by the new state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FixState {
    Literal(String),
    Table(HashMap<String, String>),
}

impl FixState {
    pub fn literal(state: impl Into<String>) -> Self {
        Self::Literal(state.into())
    }

    pub fn table(entries: impl IntoIterator<Item = (String, String)>) -> Self {
        Self::Table(entries.into_iter().collect())
    }

    /// Resolve the fix state given the new state the broken dependency moved to.
    ///
    /// Returns `None` for a `Table` with no entry for `new_state` — callers
    /// should treat that as `DependencyContractViolation::MissingFixState`.
    pub fn resolve(&self, new_state: &str) -> Option<String> {
        match self {
            FixState::Literal(s) => Some(s.clone()),
            FixState::Table(map) => map.get(new_state).cloned(),
        }
    }
}

/// A predicate requiring `object` to be in one of `acceptable_states`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependOn {
    pub object: ObjectKey,
    pub acceptable_states: Vec<String>,
    /// State to drive `object` to when the requirement is unmet.
    pub preferred_state: String,
    /// Target for a *reverse* dependent whose requirement we are about to
    /// break. Required whenever this `DependOn` is evaluated as a reverse
    /// dependency (see `DependencyContractViolation::MissingFixState`).
    pub fix_state: Option<FixState>,
}

impl DependOn {
    pub fn new(
        object: ObjectKey,
        acceptable_states: impl IntoIterator<Item = impl Into<String>>,
        preferred_state: impl Into<String>,
    ) -> Self {
        Self {
            object,
            acceptable_states: acceptable_states.into_iter().map(Into::into).collect(),
            preferred_state: preferred_state.into(),
            fix_state: None,
        }
    }

    pub fn with_fix_state(mut self, fix_state: FixState) -> Self {
        self.fix_state = Some(fix_state);
        self
    }

    pub fn is_satisfied_by(&self, state: &str) -> bool {
        self.acceptable_states.iter().any(|s| s == state)
    }
}

/// Conjunction of [`DependOn`] predicates: all must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependAll(pub Vec<DependOn>);

impl DependAll {
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn iter(&self) -> impl Iterator<Item = &DependOn> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<DependOn> for DependAll {
    fn from_iter<T: IntoIterator<Item = DependOn>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for DependAll {
    type Item = DependOn;
    type IntoIter = std::vec::IntoIter<DependOn>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::ObjectClass;

    #[test]
    fn fix_state_literal_resolves_regardless_of_input() {
        let fs = FixState::literal("unmounted");
        assert_eq!(fs.resolve("lnet_down"), Some("unmounted".to_string()));
        assert_eq!(fs.resolve("anything"), Some("unmounted".to_string()));
    }

    #[test]
    fn fix_state_table_resolves_by_new_state() {
        let fs = FixState::table([("lnet_down".to_string(), "unmounted".to_string())]);
        assert_eq!(fs.resolve("lnet_down"), Some("unmounted".to_string()));
        assert_eq!(fs.resolve("lnet_unloaded"), None);
    }

    #[test]
    fn depend_on_is_satisfied_by_checks_acceptable_states() {
        let d = DependOn::new(
            ObjectKey::new(ObjectClass::Host, "1"),
            ["lnet_up"],
            "lnet_up",
        );
        assert!(d.is_satisfied_by("lnet_up"));
        assert!(!d.is_satisfied_by("lnet_down"));
    }
}
