// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ObjectGraph`: the live reverse-dependency adjacency the planner needs for
//! `dependents_of`.
//!
//! This is the stand-in for an ORM relationship query (`get_dependent_objects`
//! in spec terms): a real deployment would ask the model layer "what objects
//! point at me", here it is an explicit in-memory adjacency map, built once
//! from the same dependency table `Topology` loads (or populated directly by
//! tests/CLI callers that don't go through TOML at all).

use indexmap::IndexSet;
use lcm_core::object::ObjectKey;
use lcm_core::oracle::DependentsOracle;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct ObjectGraph {
    /// depends_on -> dependents, in first-insertion order so `dependents_of`
    /// returns a stable order across runs (the planner's linearize tie-break
    /// depends on traversal order being deterministic).
    reverse: HashMap<ObjectKey, IndexSet<ObjectKey>>,
}

impl ObjectGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_edge(&mut self, dependent: ObjectKey, depends_on: ObjectKey) {
        self.reverse.entry(depends_on).or_default().insert(dependent);
    }

    pub fn from_topology(topology: &crate::Topology) -> Self {
        let mut graph = Self::new();
        for dep in topology.dependency_entries() {
            let Some(object_class) = lcm_core::object::ObjectClass::parse(&dep.object.class) else {
                continue;
            };
            let Some(depends_on_class) = lcm_core::object::ObjectClass::parse(&dep.depends_on.class) else {
                continue;
            };
            graph.add_edge(
                ObjectKey::new(object_class, dep.object.id.clone()),
                ObjectKey::new(depends_on_class, dep.depends_on.id.clone()),
            );
        }
        graph
    }
}

impl DependentsOracle for ObjectGraph {
    fn dependents_of(&self, object: &ObjectKey) -> Vec<ObjectKey> {
        // `IndexSet` iterates in insertion order, so this is stable across runs.
        self.reverse
            .get(object)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lcm_core::object::ObjectClass;

    #[test]
    fn dependents_of_returns_edges_pointing_at_object() {
        let mut graph = ObjectGraph::new();
        let target = ObjectKey::new(ObjectClass::Target, "7");
        let host = ObjectKey::new(ObjectClass::Host, "1");
        graph.add_edge(target.clone(), host.clone());

        assert_eq!(graph.dependents_of(&host), vec![target]);
        assert!(graph.dependents_of(&ObjectKey::new(ObjectClass::Host, "2")).is_empty());
    }

    #[test]
    fn from_topology_builds_reverse_edges_from_default_registry() {
        let config = crate::load::load_default().expect("default parses");
        let topology = crate::Topology::from_config(config).expect("topology builds");
        let graph = ObjectGraph::from_topology(&topology);

        let host = ObjectKey::new(ObjectClass::Host, "1");
        let target = ObjectKey::new(ObjectClass::Target, "7");
        assert!(graph.dependents_of(&host).contains(&target));
    }
}
