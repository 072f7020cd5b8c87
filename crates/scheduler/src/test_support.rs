// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test fixtures: the default topology registry plus a fake
//! `ModelRegistry` standing in for the (not-yet-written) storage/CLI-layer
//! implementation.

use lcm_core::object::{ObjectClass, ObjectKey, StatefulObject};
use lcm_core::oracle::ModelRegistry;
use lcm_topology::{load_default, ObjectGraph, Topology};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug)]
struct FakeObject {
    key: ObjectKey,
    state: String,
}

impl StatefulObject for FakeObject {
    fn key(&self) -> ObjectKey {
        self.key.clone()
    }

    fn state(&self) -> &str {
        &self.state
    }

    fn states(&self) -> &'static [&'static str] {
        &[]
    }
}

pub struct FakeRegistry(HashMap<ObjectKey, String>);

impl ModelRegistry for FakeRegistry {
    fn resolve(&self, key: &ObjectKey) -> Option<Arc<dyn StatefulObject>> {
        self.0
            .get(key)
            .map(|state| Arc::new(FakeObject { key: key.clone(), state: state.clone() }) as Arc<dyn StatefulObject>)
    }
}

pub fn target() -> ObjectKey {
    ObjectKey::new(ObjectClass::Target, "7")
}

pub fn host() -> ObjectKey {
    ObjectKey::new(ObjectClass::Host, "1")
}

pub fn topology() -> Topology {
    Topology::from_config(load_default().expect("default parses")).expect("topology builds")
}

pub fn dependents(topology: &Topology) -> ObjectGraph {
    ObjectGraph::from_topology(topology)
}

pub fn registry(states: &[(ObjectKey, &str)]) -> FakeRegistry {
    FakeRegistry(states.iter().map(|(k, s)| (k.clone(), s.to_string())).collect())
}
