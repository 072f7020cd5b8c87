// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Modification Operation (C5): turns a planned transition DAG into
//! persisted Jobs with locks and `wait_for` wired up.

use crate::planner::{self, plan, PlanContext, PlanOutcome, RequestOutcome};
use lcm_core::command::Command;
use lcm_core::error::SchedulingError;
use lcm_core::job::{Job, JobDescriptor, JobId, JobKind, JobState};
use lcm_core::lock::StateLock;
use lcm_core::object::ObjectKey;
use lcm_core::transition::Transition;
use lcm_storage::{Event, LockCache, Store};
use std::collections::{HashMap, HashSet};
use tracing::instrument;

#[derive(Debug, thiserror::Error)]
pub enum ModifyError {
    #[error(transparent)]
    Plan(#[from] lcm_core::error::PlanError),
    #[error(transparent)]
    Scheduling(#[from] SchedulingError),
    #[error(transparent)]
    Storage(#[from] lcm_storage::StorageError),
}

/// Drive `instance` to `new_state`, creating and persisting whatever Jobs
/// the planner determines are necessary, all attached to `command`.
#[instrument(skip(ctx, store, command), fields(%instance, new_state))]
pub fn set_state(
    ctx: &PlanContext,
    store: &Store,
    instance: &ObjectKey,
    new_state: &str,
    command: &mut Command,
) -> Result<(), ModifyError> {
    if !ctx.routes.states(instance.class).iter().any(|s| s == new_state) {
        return Err(SchedulingError::InvalidState {
            object: instance.clone(),
            state: new_state.to_string(),
        }
        .into());
    }

    match plan(ctx, instance, new_state)? {
        PlanOutcome::NoOp => Ok(()),
        PlanOutcome::AlreadyPending(job) => {
            command.attach(job);
            Ok(())
        }
        PlanOutcome::Planned { transitions, .. } => {
            persist_transitions(ctx, store, command, &transitions)?;
            Ok(())
        }
    }
}

/// Turn one already-linearized transition list into Jobs and persist them as
/// a single batch. Wait-for derivation needs each earlier transition's locks
/// visible to the ones after it, so a `staged` cache (seeded from the real
/// one, never mutated until the whole batch lands) stands in for the shared
/// Lock Cache while the jobs are built; only the final [`Store::apply_batch`]
/// call touches the real one.
///
/// Returns each transition's assigned job id, so a caller with its own
/// follow-on jobs (see `add_jobs`) can look up what to `wait_for`.
fn persist_transitions(
    ctx: &PlanContext,
    store: &Store,
    command: &mut Command,
    transitions: &[Transition],
) -> Result<HashMap<Transition, JobId>, ModifyError> {
    struct Pending {
        job_id: JobId,
        job_class: String,
        locks: Vec<StateLock>,
    }

    let mut pending = Vec::with_capacity(transitions.len());
    let mut touched: HashSet<ObjectKey> = HashSet::new();
    for t in transitions {
        let job_id = store.next_job_id();
        let job_class = ctx.routes.job_class(t.object.class, &t.old_state, &t.new_state)?;
        let locks = build_state_change_locks(ctx, job_id, t, &job_class);
        touched.extend(locks.iter().map(|l| l.locked_item.clone()));
        pending.push(Pending { job_id, job_class, locks });
    }

    let staged = LockCache::new();
    for item in &touched {
        for lock in ctx.lock_cache.get_by_item(item) {
            staged.add(lock);
        }
    }

    let mut job_ids = HashMap::with_capacity(transitions.len());
    let mut events = Vec::with_capacity(transitions.len());
    for (t, Pending { job_id, job_class, locks }) in transitions.iter().zip(pending) {
        let wait_for = derive_wait_for(&staged, job_id, &locks)?;
        for lock in &locks {
            staged.add(lock.clone());
        }
        let description = format!("{job_class} {}: {} -> {}", t.object, t.old_state, t.new_state);

        let job = Job {
            id: job_id,
            command_id: command.id,
            class_name: job_class,
            args: Default::default(),
            kind: JobKind::StateChange {
                from_states: vec![t.old_state.clone()],
                to_state: t.new_state.clone(),
                stateful_object: t.object.clone(),
            },
            locks,
            wait_for,
            state: JobState::Pending,
            description,
        };

        command.attach(job_id);
        job_ids.insert(t.clone(), job_id);
        events.push(Event::JobCreated { job });
    }

    store.apply_batch(events)?;
    Ok(job_ids)
}

/// Locks a `StateChange` job holds: read locks for every object named by the
/// job's own `DependOn`s and by the endpoints' state-static dependencies,
/// plus the write lock on the transitioning object itself.
fn build_state_change_locks(ctx: &PlanContext, job_id: JobId, t: &Transition, job_class: &str) -> Vec<StateLock> {
    let mut read_targets: HashSet<ObjectKey> = HashSet::new();
    for d in ctx.deps.deps_of_job(job_class, &t.object).iter() {
        read_targets.insert(d.object.clone());
    }
    for d in ctx.deps.deps_of_state(&t.object, &t.old_state).iter() {
        read_targets.insert(d.object.clone());
    }
    for d in ctx.deps.deps_of_state(&t.object, &t.new_state).iter() {
        read_targets.insert(d.object.clone());
    }
    read_targets.remove(&t.object);

    let mut locks: Vec<StateLock> = read_targets.into_iter().map(|obj| StateLock::read(job_id, obj)).collect();
    locks.push(StateLock::write(job_id, t.object.clone(), t.old_state.clone(), t.new_state.clone()));
    locks
}

/// Wait-for derivation, run against the Lock Cache as it
/// stands *before* `job_id`'s own locks are registered — callers must
/// persist (which registers the locks) only after calling this.
fn derive_wait_for(lock_cache: &LockCache, job_id: JobId, locks: &[StateLock]) -> Result<Vec<JobId>, SchedulingError> {
    let mut wait_for = Vec::new();
    for l in locks {
        if l.write {
            let pw = lock_cache.get_latest_write(&l.locked_item, Some(job_id));
            let barrier = match &pw {
                Some(pw) => {
                    // `l`/`pw` are both write locks here, and `build_state_change_locks`
                    // never builds a write lock without begin/end state.
                    #[allow(clippy::expect_used)]
                    let begin = l.begin_state.as_deref().expect("write lock always carries begin_state");
                    #[allow(clippy::expect_used)]
                    let pw_end = pw.end_state.as_deref().expect("write lock always carries end_state");
                    if begin != pw_end {
                        return Err(SchedulingError::StateChainMismatch {
                            object: l.locked_item.clone(),
                            expected: pw_end.to_string(),
                            actual: begin.to_string(),
                        });
                    }
                    wait_for.push(pw.job);
                    pw.job
                }
                None => JobId::new(0),
            };
            for r in lock_cache.get_read_locks(&l.locked_item, barrier, Some(job_id)) {
                wait_for.push(r.job);
            }
        } else if let Some(pw) = lock_cache.get_latest_write(&l.locked_item, Some(job_id)) {
            wait_for.push(pw.job);
        }
    }
    wait_for.sort();
    wait_for.dedup();
    Ok(wait_for)
}

/// Instantiate non-state-change Jobs directly (`command_run_jobs`): each
/// descriptor may need prerequisite state transitions ahead of itself. Every
/// descriptor's unmet prerequisites are expanded into one shared dependency
/// set and linearized in a single pass (`planner::plan_many`) before
/// anything is persisted, then the descriptors' own Jobs persist as a second
/// batch once their prerequisites have landed.
#[instrument(skip(ctx, store, descriptors, command))]
pub fn add_jobs(
    ctx: &PlanContext,
    store: &Store,
    descriptors: Vec<JobDescriptor>,
    command: &mut Command,
) -> Result<(), ModifyError> {
    let mut requests: Vec<(ObjectKey, String)> = Vec::new();
    let mut descriptor_requests: Vec<Vec<usize>> = Vec::with_capacity(descriptors.len());
    let mut descriptor_read_targets: Vec<HashSet<ObjectKey>> = Vec::with_capacity(descriptors.len());

    for descriptor in &descriptors {
        let mut read_targets: HashSet<ObjectKey> = HashSet::new();
        let mut indices = Vec::new();

        if let Some(obj) = &descriptor.stateful_object {
            for d in ctx.deps.deps_of_job(&descriptor.class_name, obj).iter() {
                read_targets.insert(d.object.clone());
                let current = planner::expected_state(ctx, &d.object)?;
                if !d.is_satisfied_by(&current) {
                    indices.push(requests.len());
                    requests.push((d.object.clone(), d.preferred_state.clone()));
                }
            }
        }

        descriptor_requests.push(indices);
        descriptor_read_targets.push(read_targets);
    }

    let (request_outcomes, transition_job_ids) = if requests.is_empty() {
        (Vec::new(), HashMap::new())
    } else {
        let outcome = planner::plan_many(ctx, &requests)?;
        let job_ids = persist_transitions(ctx, store, command, &outcome.transitions)?;
        (outcome.requests, job_ids)
    };

    let mut events = Vec::with_capacity(descriptors.len());
    let descriptors = descriptors.into_iter().zip(descriptor_requests).zip(descriptor_read_targets);
    for ((descriptor, indices), read_targets) in descriptors {
        let prerequisite_jobs: Vec<JobId> = indices
            .into_iter()
            .filter_map(|i| match &request_outcomes[i] {
                RequestOutcome::NoOp => None,
                RequestOutcome::AlreadyPending(job) => Some(*job),
                RequestOutcome::Planned(Some(t)) => transition_job_ids.get(t).copied(),
                RequestOutcome::Planned(None) => None,
            })
            .collect();

        let job_id = store.next_job_id();
        let locks: Vec<StateLock> = read_targets.into_iter().map(|obj| StateLock::read(job_id, obj)).collect();
        let mut wait_for = derive_wait_for(ctx.lock_cache, job_id, &locks)?;
        wait_for.extend(prerequisite_jobs);
        wait_for.sort();
        wait_for.dedup();

        let description = match &descriptor.stateful_object {
            Some(obj) => format!("{} {obj}", descriptor.class_name),
            None => descriptor.class_name.clone(),
        };

        let job = Job {
            id: job_id,
            command_id: command.id,
            class_name: descriptor.class_name,
            args: descriptor.args,
            kind: JobKind::Action { stateful_object: descriptor.stateful_object },
            locks,
            wait_for,
            state: JobState::Pending,
            description,
        };

        command.attach(job_id);
        events.push(Event::JobCreated { job });
    }

    store.apply_batch(events)?;
    Ok(())
}

#[cfg(test)]
#[path = "modify_tests.rs"]
mod tests;
