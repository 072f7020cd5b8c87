// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command API (C6): the RPC-facing entry points that group Jobs under one
//! user-issued Command.

use crate::modify::{add_jobs, set_state, ModifyError};
use crate::planner::{plan, PlanContext, PlanOutcome};
use lcm_core::command::{Command, CommandId};
use lcm_core::job::JobDescriptor;
use lcm_core::object::ObjectKey;
use lcm_storage::{Event, LockCache, Store};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// One object this Command API call should drive to a new state.
pub struct StateTarget {
    pub instance: ObjectKey,
    pub new_state: String,
}

/// `command_set_state`: drive every target to its requested state under one
/// Command, attaching whatever Jobs the planner produces for each.
#[instrument(skip(ctx, store, targets, message))]
pub fn command_set_state(
    ctx: &PlanContext,
    store: &Store,
    targets: Vec<StateTarget>,
    message: impl Into<String>,
    created_at_ms: u64,
) -> Result<CommandId, ModifyError> {
    let mut command = Command::new(message, created_at_ms);
    for target in targets {
        set_state(ctx, store, &target.instance, &target.new_state, &mut command)?;
    }
    let id = command.id;
    store.apply(Event::CommandCreated { command })?;
    Ok(id)
}

/// `command_run_jobs`: instantiate non-state-change Jobs directly.
#[instrument(skip(ctx, store, descriptors, message))]
pub fn command_run_jobs(
    ctx: &PlanContext,
    store: &Store,
    descriptors: Vec<JobDescriptor>,
    message: impl Into<String>,
    created_at_ms: u64,
) -> Result<CommandId, ModifyError> {
    let mut command = Command::new(message, created_at_ms);
    add_jobs(ctx, store, descriptors, &mut command)?;
    let id = command.id;
    store.apply(Event::CommandCreated { command })?;
    Ok(id)
}

/// One planned job, described for display without ever being persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionConsequence {
    pub class_name: String,
    pub description: String,
    pub stateful_object: ObjectKey,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionConsequences {
    pub transition_job: TransitionConsequence,
    pub dependency_jobs: Vec<TransitionConsequence>,
}

/// `get_transition_consequences`: a UI helper that runs the planner against
/// committed state only (ignoring pending writes) and never persists.
#[instrument(skip(ctx), fields(%instance, new_state))]
pub fn get_transition_consequences(
    ctx: &PlanContext,
    instance: &ObjectKey,
    new_state: &str,
) -> Result<Option<TransitionConsequences>, ModifyError> {
    let scratch_cache = LockCache::new();
    let scratch_ctx = PlanContext {
        routes: ctx.routes,
        deps: ctx.deps,
        dependents: ctx.dependents,
        registry: ctx.registry,
        lock_cache: &scratch_cache,
    };

    let outcome = plan(&scratch_ctx, instance, new_state)?;
    let PlanOutcome::Planned { transitions, .. } = outcome else {
        return Ok(None);
    };

    let mut consequences: Vec<TransitionConsequence> = transitions
        .iter()
        .map(|t| {
            let class_name = ctx
                .routes
                .job_class(t.object.class, &t.old_state, &t.new_state)
                .map(|c| c.to_string())
                .unwrap_or_else(|_| "unknown".to_string());
            TransitionConsequence {
                description: format!("{class_name} {}: {} -> {}", t.object, t.old_state, t.new_state),
                class_name,
                stateful_object: t.object.clone(),
            }
        })
        .collect();

    // `PlanOutcome::Planned` is only ever constructed with a non-empty
    // `transitions` list (see `planner::plan_many`), so `consequences`,
    // built 1:1 from it above, is never empty here.
    #[allow(clippy::expect_used)]
    let transition_job = consequences.pop().expect("a Planned outcome always has at least one transition");
    Ok(Some(TransitionConsequences { transition_job, dependency_jobs: consequences }))
}

#[cfg(test)]
#[path = "command_api_tests.rs"]
mod tests;
