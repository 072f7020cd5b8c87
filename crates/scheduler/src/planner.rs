// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Transition Planner: expands a `(object, new_state)` request into a DAG of
//! atomic [`Transition`]s, then linearizes it into persist order.

use indexmap::IndexSet;
use lcm_core::depend::DependAll;
use lcm_core::error::{DependencyContractViolation, PlanError, SchedulingError};
use lcm_core::job::JobId;
use lcm_core::object::ObjectKey;
use lcm_core::oracle::{DependencyOracle, DependentsOracle, ModelRegistry, RouteOracle};
use lcm_core::transition::Transition;
use lcm_storage::LockCache;
use std::collections::{HashMap, HashSet};
use tracing::{debug, instrument};

/// The collaborators the planner consumes from. Generic over trait objects
/// so `lcm-scheduler` never depends on `lcm-topology`'s or the storage
/// layer's concrete shape.
pub struct PlanContext<'a> {
    pub routes: &'a dyn RouteOracle,
    pub deps: &'a dyn DependencyOracle,
    pub dependents: &'a dyn DependentsOracle,
    pub registry: &'a dyn ModelRegistry,
    pub lock_cache: &'a LockCache,
}

/// What `plan` determined needs to happen for an object to reach a state.
#[derive(Debug)]
pub enum PlanOutcome {
    /// The object is already at (or already expected to reach) `new_state`;
    /// nothing to do.
    NoOp,
    /// A pending job is already driving the object to `new_state`; attach it
    /// to the command instead of planning again.
    AlreadyPending(JobId),
    /// A fresh DAG of transitions to turn into jobs, already linearized.
    /// `edges` is the "depends on" relation: `(a, b)` means `a` cannot be
    /// scheduled before `b`.
    Planned { transitions: Vec<Transition>, edges: Vec<(Transition, Transition)> },
}

/// Per-request outcome inside a [`plan_many`] pass.
#[derive(Debug)]
pub enum RequestOutcome {
    NoOp,
    AlreadyPending(JobId),
    /// Expanded into the shared dependency set; carries the final hop
    /// emitted for this request, used to look up its persisted job id once
    /// the combined transition list is linearized and persisted. `None`
    /// only if `from == to`, which `plan_many` never reaches (such requests
    /// resolve to `NoOp`/`AlreadyPending` above).
    Planned(Option<Transition>),
}

/// One [`plan_many`] call's result: every request's outcome, plus the
/// single linearized transition list spanning all of them.
pub struct PlanManyOutcome {
    pub requests: Vec<RequestOutcome>,
    pub transitions: Vec<Transition>,
    pub edges: Vec<(Transition, Transition)>,
}

/// Plan every `(object, new_state)` request against one shared dependency
/// set: every request is fully expanded into `deps`/`edges` before
/// `linearize` runs once over the combined result, so two requests sharing
/// a prerequisite never each sort their own copy of it independently.
#[instrument(skip(ctx, requests))]
pub fn plan_many(ctx: &PlanContext, requests: &[(ObjectKey, String)]) -> Result<PlanManyOutcome, PlanError> {
    let pending_writes = ctx.lock_cache.get_write_by_locked_item();
    let mut expected_states: HashMap<ObjectKey, String> = HashMap::new();
    for (item, lock) in &pending_writes {
        if let Some(end_state) = &lock.end_state {
            expected_states.insert(item.clone(), end_state.clone());
        }
    }

    let mut planning = Planning {
        ctx,
        expected_states,
        deps: IndexSet::new(),
        edges: IndexSet::new(),
        visited: HashSet::new(),
    };

    let mut outcomes = Vec::with_capacity(requests.len());
    for (object, new_state) in requests {
        let committed = committed_state(ctx, object)?;
        let expected = planning.expected_states.get(object).cloned().unwrap_or_else(|| committed.clone());

        if &expected == new_state {
            if &committed != new_state {
                // A pending write is already driving this object to `new_state`.
                #[allow(clippy::expect_used)] // `expected` above came out of this same map, so the entry exists
                let job = pending_writes.get(object).map(|l| l.job).expect("expected came from a pending write");
                outcomes.push(RequestOutcome::AlreadyPending(job));
            } else {
                outcomes.push(RequestOutcome::NoOp);
            }
            continue;
        }

        let last = planning.emit_transition_deps(object, &expected, new_state, HashMap::new())?;
        outcomes.push(RequestOutcome::Planned(last));
    }

    let edges: Vec<(Transition, Transition)> = planning.edges.into_iter().collect();
    let transitions = linearize(planning.deps, &edges);
    debug!(count = transitions.len(), requests = outcomes.len(), "planned transitions");
    Ok(PlanManyOutcome { requests: outcomes, transitions, edges })
}

/// Run the Transition Planner for `object -> new_state`.
#[instrument(skip(ctx), fields(%object, new_state))]
pub fn plan(ctx: &PlanContext, object: &ObjectKey, new_state: &str) -> Result<PlanOutcome, PlanError> {
    let mut outcome = plan_many(ctx, std::slice::from_ref(&(object.clone(), new_state.to_string())))?;
    Ok(match outcome.requests.remove(0) {
        RequestOutcome::NoOp => PlanOutcome::NoOp,
        RequestOutcome::AlreadyPending(job) => PlanOutcome::AlreadyPending(job),
        RequestOutcome::Planned(_) => PlanOutcome::Planned { transitions: outcome.transitions, edges: outcome.edges },
    })
}

fn committed_state(ctx: &PlanContext, object: &ObjectKey) -> Result<String, SchedulingError> {
    let resolved = ctx
        .registry
        .resolve(object)
        .ok_or_else(|| SchedulingError::ObjectNotFound(object.clone()))?;
    Ok(resolved.state().to_string())
}

/// The plan-wide expected state of `object`: its pending write lock's
/// `end_state` if one is outstanding, else its committed state. Used by the
/// modification operation to decide whether an `add_jobs` dependency is
/// already satisfied without re-running the full planner.
pub fn expected_state(ctx: &PlanContext, object: &ObjectKey) -> Result<String, SchedulingError> {
    if let Some(end_state) = ctx
        .lock_cache
        .get_write_by_locked_item()
        .get(object)
        .and_then(|l| l.end_state.clone())
    {
        return Ok(end_state);
    }
    committed_state(ctx, object)
}

/// Mutable working set for one `plan` call.
struct Planning<'a> {
    ctx: &'a PlanContext<'a>,
    /// Committed-state override for objects under a pending write lock,
    /// seeded once at the start of planning.
    expected_states: HashMap<ObjectKey, String>,
    /// Transitions discovered so far, in first-discovery order — this order
    /// is the stable tie-break for linearization.
    deps: IndexSet<Transition>,
    /// `(a, b)`: `a` depends on `b`.
    edges: IndexSet<(Transition, Transition)>,
    /// Transitions already run through `collect_dependencies`, so sibling
    /// paths that rediscover the same transition don't redo its dependency
    /// work.
    visited: HashSet<Transition>,
}

impl<'a> Planning<'a> {
    /// The object's expected state as of this point on the current
    /// recursive path: first the per-path hypothetical stack, then the
    /// plan-wide pending-write seed, then its committed state.
    fn resolve_expected_state(&self, stack: &HashMap<ObjectKey, String>, object: &ObjectKey) -> Result<String, PlanError> {
        if let Some(s) = stack.get(object) {
            return Ok(s.clone());
        }
        if let Some(s) = self.expected_states.get(object) {
            return Ok(s.clone());
        }
        Ok(committed_state(self.ctx, object)?)
    }

    /// Expand a macro request `object: from -> to` into atomic hops via the
    /// route oracle, recording dependencies for each hop. Returns the last
    /// hop emitted, or `None` if `from == to`.
    ///
    /// `stack` is carried by value: each recursive branch gets its own copy,
    /// so sibling branches never see each other's hypothetical state.
    fn emit_transition_deps(
        &mut self,
        object: &ObjectKey,
        from: &str,
        to: &str,
        mut stack: HashMap<ObjectKey, String>,
    ) -> Result<Option<Transition>, PlanError> {
        if from == to {
            return Ok(None);
        }
        let route = self.ctx.routes.route(object.class, from, to)?;
        stack.insert(object.clone(), to.to_string());

        let mut prev: Option<Transition> = None;
        for hop in route.windows(2) {
            let t = Transition::new(object.clone(), hop[0].clone(), hop[1].clone());
            let first_sight = self.deps.insert(t.clone());
            if let Some(p) = &prev {
                // This hop cannot run before the one that puts the object
                // into its starting state.
                self.edges.insert((t.clone(), p.clone()));
            }
            if first_sight {
                self.collect_dependencies(&t, &stack)?;
            }
            prev = Some(t);
        }
        Ok(prev)
    }

    /// Dependency collection for one atomic transition: job
    /// prerequisites, state-static prerequisites of the destination state,
    /// and reverse dependencies this hop would break.
    fn collect_dependencies(&mut self, t: &Transition, stack: &HashMap<ObjectKey, String>) -> Result<(), PlanError> {
        if !self.visited.insert(t.clone()) {
            return Ok(());
        }

        let job_class = self.ctx.routes.job_class(t.object.class, &t.old_state, &t.new_state)?;

        let job_deps = self.ctx.deps.deps_of_job(&job_class, &t.object);
        self.satisfy_forward(t, &job_deps, stack)?;

        let state_deps = self.ctx.deps.deps_of_state(&t.object, &t.new_state);
        self.satisfy_forward(t, &state_deps, stack)?;

        self.satisfy_reverse(t, stack)
    }

    /// Drive every unmet `DependOn` in `deps` to its preferred state before `t`.
    fn satisfy_forward(&mut self, t: &Transition, deps: &DependAll, stack: &HashMap<ObjectKey, String>) -> Result<(), PlanError> {
        for d in deps.iter() {
            if stack.contains_key(&d.object) {
                continue;
            }
            let old = self.resolve_expected_state(stack, &d.object)?;
            if d.is_satisfied_by(&old) {
                continue;
            }
            if let Some(emitted) = self.emit_transition_deps(&d.object, &old, &d.preferred_state, stack.clone())? {
                self.edges.insert((t.clone(), emitted));
            }
        }
        Ok(())
    }

    /// For every object that may depend on `t.object`, check whether moving
    /// to `t.new_state` breaks that dependent's requirement — and if so,
    /// drive it to its declared `fix_state` first.
    fn satisfy_reverse(&mut self, t: &Transition, stack: &HashMap<ObjectKey, String>) -> Result<(), PlanError> {
        for dependent in self.ctx.dependents.dependents_of(&t.object) {
            if stack.contains_key(&dependent) {
                continue;
            }
            let ds = self.resolve_expected_state(stack, &dependent)?;
            let reverse_deps = self.ctx.deps.deps_of_state(&dependent, &ds);
            for d in reverse_deps.iter() {
                if d.object != t.object || d.is_satisfied_by(&t.new_state) {
                    continue;
                }
                let fix = d.fix_state.as_ref().ok_or_else(|| DependencyContractViolation::MissingFixState {
                    object: t.object.clone(),
                    dependent: dependent.clone(),
                    new_state: t.new_state.clone(),
                })?;
                let target = fix.resolve(&t.new_state).ok_or_else(|| DependencyContractViolation::UnresolvedFixState {
                    dependent: dependent.clone(),
                    new_state: t.new_state.clone(),
                })?;
                if let Some(emitted) = self.emit_transition_deps(&dependent, &ds, &target, stack.clone())? {
                    self.edges.insert((t.clone(), emitted));
                }
            }
        }
        Ok(())
    }
}

/// Topologically sort `deps` by longest "depends on" chain to a leaf
/// (leaves — transitions with no unmet dependencies of their own — first,
/// roots last), breaking ties by first-discovery order.
fn linearize(deps: IndexSet<Transition>, edges: &[(Transition, Transition)]) -> Vec<Transition> {
    let mut depends_on: HashMap<Transition, Vec<Transition>> = HashMap::new();
    for (a, b) in edges {
        depends_on.entry(a.clone()).or_default().push(b.clone());
    }

    let mut memo: HashMap<Transition, u32> = HashMap::new();
    let mut keyed: Vec<(u32, usize, Transition)> = deps
        .into_iter()
        .enumerate()
        .map(|(i, t)| {
            let h = height(&t, &depends_on, &mut memo);
            (h, i, t)
        })
        .collect();

    keyed.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));
    keyed.into_iter().map(|(_, _, t)| t).collect()
}

fn height(t: &Transition, depends_on: &HashMap<Transition, Vec<Transition>>, memo: &mut HashMap<Transition, u32>) -> u32 {
    if let Some(h) = memo.get(t) {
        return *h;
    }
    // Insert a guard value before recursing so a cycle (which should never
    // occur given an acyclic dependency registry) terminates instead of
    // overflowing the stack.
    memo.insert(t.clone(), 0);
    let h = match depends_on.get(t) {
        None => 0,
        Some(children) => children.iter().map(|c| 1 + height(c, depends_on, memo)).max().unwrap_or(0),
    };
    memo.insert(t.clone(), h);
    h
}

#[cfg(test)]
#[path = "planner_tests.rs"]
mod tests;

#[cfg(test)]
#[path = "linearize_proptest.rs"]
mod linearize_proptest;
