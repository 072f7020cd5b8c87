// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `Topology`: the concrete, TOML-backed implementation of
//! [`RouteOracle`] and [`DependencyOracle`].
//!
//! All lookups are plain `HashMap` gets built once at construction time —
//! the "memoization" the dependency/route oracles promise is intrinsic,
//! there is no per-call cache to invalidate.

use crate::model::{job_key, DependencyConfig, TopologyConfig};
use lcm_core::depend::{DependAll, DependOn};
use lcm_core::error::{DependencyContractViolation, SchedulingError};
use lcm_core::object::{ObjectClass, ObjectKey};
use lcm_core::oracle::{DependencyOracle, RouteOracle};
use std::collections::HashMap;
use tracing::instrument;

struct ClassData {
    states: Vec<String>,
    /// adjacency: from_state -> [(to_state, job_class)]
    adjacency: HashMap<String, Vec<(String, String)>>,
    /// (from, to) -> job_class, for O(1) hop lookup once a route is known
    hop_job_class: HashMap<(String, String), String>,
}

pub struct Topology {
    classes: HashMap<ObjectClass, ClassData>,
    /// (object, on) -> dependency entries
    dependencies: HashMap<(ObjectKey, String), Vec<DependencyConfig>>,
}

impl Topology {
    pub fn from_config(config: TopologyConfig) -> Result<Self, crate::error::TopologyLoadError> {
        let mut classes = HashMap::new();
        for (name, class_cfg) in config.classes {
            let class = ObjectClass::parse(&name)
                .ok_or_else(|| crate::error::TopologyLoadError::UnknownClass(name.clone()))?;

            let mut adjacency: HashMap<String, Vec<(String, String)>> = HashMap::new();
            let mut hop_job_class = HashMap::new();
            for route in &class_cfg.routes {
                adjacency
                    .entry(route.from.clone())
                    .or_default()
                    .push((route.to.clone(), route.job_class.clone()));
                hop_job_class.insert((route.from.clone(), route.to.clone()), route.job_class.clone());
            }

            classes.insert(
                class,
                ClassData {
                    states: class_cfg.states,
                    adjacency,
                    hop_job_class,
                },
            );
        }

        let mut dependencies: HashMap<(ObjectKey, String), Vec<DependencyConfig>> = HashMap::new();
        for dep in config.dependencies {
            let object_class = ObjectClass::parse(&dep.object.class)
                .ok_or_else(|| crate::error::TopologyLoadError::UnknownClass(dep.object.class.clone()))?;
            let key = ObjectKey::new(object_class, dep.object.id.clone());
            dependencies
                .entry((key, dep.on.clone()))
                .or_default()
                .push(dep);
        }

        Ok(Self { classes, dependencies })
    }

    pub(crate) fn dependency_entries(&self) -> impl Iterator<Item = &DependencyConfig> {
        self.dependencies.values().flatten()
    }

    fn to_depend_on(dep: &DependencyConfig) -> Result<DependOn, DependencyContractViolation> {
        let depends_on_class = ObjectClass::parse(&dep.depends_on.class).ok_or_else(|| {
            DependencyContractViolation::MissingJobClass {
                object: ObjectKey::new(ObjectClass::Host, dep.depends_on.id.clone()),
                from: String::new(),
                to: String::new(),
            }
        })?;
        let object = ObjectKey::new(depends_on_class, dep.depends_on.id.clone());
        let mut d = DependOn::new(object, dep.acceptable_states.clone(), dep.preferred_state.clone());
        if let Some(fix) = dep.fix_state.clone() {
            d = d.with_fix_state(fix.into());
        }
        Ok(d)
    }
}

impl RouteOracle for Topology {
    #[instrument(skip(self), fields(%class, from, to))]
    fn route(&self, class: ObjectClass, from: &str, to: &str) -> Result<Vec<String>, SchedulingError> {
        if from == to {
            return Ok(vec![from.to_string()]);
        }
        let data = self.classes.get(&class);
        let Some(data) = data else {
            return Err(SchedulingError::UnreachableState {
                object: ObjectKey::new(class, String::new()),
                from: from.to_string(),
                to: to.to_string(),
            });
        };

        // BFS over the adjacency graph; routes are short so this is plenty fast
        // and gives the shortest hop count, which is what the registry models.
        let mut queue = std::collections::VecDeque::new();
        let mut visited = std::collections::HashSet::new();
        queue.push_back(vec![from.to_string()]);
        visited.insert(from.to_string());

        while let Some(path) = queue.pop_front() {
            let last = path.last().expect("path always has at least one element");
            if last == to {
                return Ok(path);
            }
            if let Some(edges) = data.adjacency.get(last) {
                for (next, _job_class) in edges {
                    if visited.insert(next.clone()) {
                        let mut next_path = path.clone();
                        next_path.push(next.clone());
                        queue.push_back(next_path);
                    }
                }
            }
        }

        Err(SchedulingError::UnreachableState {
            object: ObjectKey::new(class, String::new()),
            from: from.to_string(),
            to: to.to_string(),
        })
    }

    fn job_class(
        &self,
        class: ObjectClass,
        from: &str,
        to: &str,
    ) -> Result<String, DependencyContractViolation> {
        self.classes
            .get(&class)
            .and_then(|data| data.hop_job_class.get(&(from.to_string(), to.to_string())))
            .cloned()
            .ok_or_else(|| DependencyContractViolation::MissingJobClass {
                object: ObjectKey::new(class, String::new()),
                from: from.to_string(),
                to: to.to_string(),
            })
    }

    fn states(&self, class: ObjectClass) -> &[String] {
        self.classes.get(&class).map(|d| d.states.as_slice()).unwrap_or(&[])
    }
}

impl DependencyOracle for Topology {
    fn deps_of_job(&self, job_class: &str, object: &ObjectKey) -> DependAll {
        self.lookup(object, &job_key(job_class))
    }

    fn deps_of_state(&self, object: &ObjectKey, state: &str) -> DependAll {
        self.lookup(object, state)
    }
}

impl Topology {
    fn lookup(&self, object: &ObjectKey, on: &str) -> DependAll {
        match self.dependencies.get(&(object.clone(), on.to_string())) {
            Some(entries) => entries
                .iter()
                .filter_map(|dep| Self::to_depend_on(dep).ok())
                .collect(),
            None => DependAll::empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topology() -> Topology {
        let config = crate::load::load_default().expect("default parses");
        Topology::from_config(config).expect("topology builds")
    }

    #[test]
    fn route_same_state_is_single_element() {
        let t = topology();
        let route = t.route(ObjectClass::Host, "lnet_up", "lnet_up").expect("route");
        assert_eq!(route, vec!["lnet_up".to_string()]);
    }

    #[test]
    fn route_single_hop() {
        let t = topology();
        let route = t.route(ObjectClass::Target, "unmounted", "mounted").expect("route");
        assert_eq!(route, vec!["unmounted".to_string(), "mounted".to_string()]);
    }

    #[test]
    fn route_multi_hop_matches_registered_scenario() {
        let t = topology();
        let route = t
            .route(ObjectClass::Target, "unformatted", "registered")
            .expect("route");
        assert_eq!(
            route,
            vec!["unformatted".to_string(), "formatted".to_string(), "registered".to_string()]
        );
    }

    #[test]
    fn route_unreachable_errors() {
        let t = topology();
        let err = t.route(ObjectClass::Host, "lnet_down", "nonexistent");
        assert!(err.is_err());
    }

    #[test]
    fn job_class_for_hop() {
        let t = topology();
        assert_eq!(
            t.job_class(ObjectClass::Target, "unmounted", "mounted").expect("job class"),
            "mount_target"
        );
    }

    #[test]
    fn deps_of_job_resolves_mount_target_requires_host_lnet_up() {
        let t = topology();
        let target = ObjectKey::new(ObjectClass::Target, "7");
        let deps = t.deps_of_job("mount_target", &target);
        assert_eq!(deps.iter().count(), 1);
        let d = deps.iter().next().expect("one dependency");
        assert_eq!(d.object, ObjectKey::new(ObjectClass::Host, "1"));
        assert!(d.is_satisfied_by("lnet_up"));
    }

    #[test]
    fn deps_of_state_mounted_carries_fix_state() {
        let t = topology();
        let target = ObjectKey::new(ObjectClass::Target, "7");
        let deps = t.deps_of_state(&target, "mounted");
        let d = deps.iter().next().expect("one dependency");
        assert_eq!(d.fix_state.as_ref().and_then(|f| f.resolve("lnet_down")), Some("unmounted".to_string()));
    }

    #[test]
    fn deps_of_state_for_unrelated_state_is_empty() {
        let t = topology();
        let target = ObjectKey::new(ObjectClass::Target, "7");
        assert!(t.deps_of_state(&target, "unmounted").is_empty());
    }
}
