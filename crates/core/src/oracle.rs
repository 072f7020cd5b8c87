// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Trait seams to the collaborators the core only consumes from: the route
//! registry, the dependency registry, the reverse-dependency graph, and the
//! model registry that resolves identities to live objects.
//!
//! These are implemented concretely by `lcm-topology` (route/dependency) and
//! by the storage/CLI layer (model registry, dependents), but the planner
//! itself is generic over them so it never depends on their concrete shape.

use crate::depend::DependAll;
use crate::error::{DependencyContractViolation, SchedulingError};
use crate::object::{ObjectClass, ObjectKey, StatefulObject};
use std::sync::Arc;

/// `route(object, from, to)` and the static `(class, from, to) -> job_class`
/// registry populated at startup (design note: "Dynamic dispatch on job
/// classes becomes a static registry the planner indexes directly").
pub trait RouteOracle: Send + Sync {
    /// Ordered list `[from, ..., to]`; empty intermediate hops when `from == to`.
    fn route(&self, class: ObjectClass, from: &str, to: &str) -> Result<Vec<String>, SchedulingError>;

    /// The job class that performs one atomic hop `from -> to` for `class`.
    fn job_class(
        &self,
        class: ObjectClass,
        from: &str,
        to: &str,
    ) -> Result<String, DependencyContractViolation>;

    /// The finite set of valid states for `class`.
    fn states(&self, class: ObjectClass) -> &[String];
}

/// `deps_of(job_class, object)` and `deps_of(object, state)`.
pub trait DependencyOracle: Send + Sync {
    /// Dependencies a job of this class has, given the object it acts on.
    fn deps_of_job(&self, job_class: &str, object: &ObjectKey) -> DependAll;

    /// Dependencies an object has while in a given (possibly hypothetical) state.
    fn deps_of_state(&self, object: &ObjectKey, state: &str) -> DependAll;
}

/// `dependents_of(object)`: objects that may carry a reverse `DependOn` on
/// this one. Separated from [`DependencyOracle`] because it needs the live
/// object graph (an ORM relationship query in the source), not static
/// per-class registry data.
pub trait DependentsOracle: Send + Sync {
    fn dependents_of(&self, object: &ObjectKey) -> Vec<ObjectKey>;
}

/// Resolves `(content_type, primary_key)` to a live stateful object.
pub trait ModelRegistry: Send + Sync {
    fn resolve(&self, key: &ObjectKey) -> Option<Arc<dyn StatefulObject>>;
}
