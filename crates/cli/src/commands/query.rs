// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Read-only RPC entries: `available-transitions`, `available-jobs`,
//! `get-locks`, `get-transition-consequences`. Each prints a [`lcm_wire::Response`]
//! as JSON, resolving a [`lcm_wire::Query`] against the live [`App`].

use crate::app::App;
use crate::object_key::ObjectKeyArg;
use anyhow::{Context, Result};
use clap::Args;
use lcm_core::object::ObjectKey;
use lcm_core::oracle::{ModelRegistry, RouteOracle};
use lcm_wire::{ObjectJobs, ObjectLocks, ObjectTransitions, Response, TransitionConsequence, TransitionConsequences};
use std::collections::HashMap;

#[derive(Args)]
pub struct TargetsArgs {
    #[arg(required = true)]
    pub targets: Vec<ObjectKeyArg>,
}

#[derive(Args)]
pub struct TargetArgs {
    pub target: ObjectKeyArg,
}

#[derive(Args)]
pub struct TransitionConsequencesArgs {
    pub instance: ObjectKeyArg,
    pub new_state: String,
}

fn committed_state(app: &App, object: &ObjectKey) -> Result<String> {
    let resolved =
        app.inventory.resolve(object).with_context(|| format!("object not found in inventory: {object}"))?;
    Ok(resolved.state().to_string())
}

/// Every state with an `Ok` route from the object's committed state.
pub fn available_transitions(app: &App, args: TargetsArgs) -> Result<()> {
    let mut results = Vec::with_capacity(args.targets.len());
    for key in args.targets {
        let object = key.0;
        let current = committed_state(app, &object)?;
        let states: Vec<String> = app
            .topology
            .states(object.class)
            .iter()
            .filter(|candidate| {
                candidate.as_str() != current && app.topology.route(object.class, &current, candidate).is_ok()
            })
            .cloned()
            .collect();
        results.push(ObjectTransitions { object, states });
    }
    print_response(Response::AvailableTransitions { results })
}

/// The job descriptors directly runnable against an object: the one-hop
/// routes out of its committed state (cf. the Open Question resolution in
/// DESIGN.md — `RouteOracle::route` returns `[from, ..., to]`, so a direct
/// job is exactly a route of length 2).
pub fn available_jobs(app: &App, args: TargetsArgs) -> Result<()> {
    let mut results = Vec::with_capacity(args.targets.len());
    for key in args.targets {
        let object = key.0;
        let current = committed_state(app, &object)?;
        let mut jobs = Vec::new();
        for candidate in app.topology.states(object.class) {
            if candidate == &current {
                continue;
            }
            let Ok(path) = app.topology.route(object.class, &current, candidate) else {
                continue;
            };
            if path.len() != 2 {
                continue;
            }
            if let Ok(class_name) = app.topology.job_class(object.class, &current, candidate) {
                jobs.push(lcm_core::job::JobDescriptor {
                    class_name,
                    args: HashMap::new(),
                    stateful_object: Some(object.clone()),
                });
            }
        }
        results.push(ObjectJobs { object, jobs });
    }
    print_response(Response::AvailableJobs { results })
}

/// Every read and write lock currently held on one object.
pub fn get_locks(app: &App, args: TargetArgs) -> Result<()> {
    let locks = app.store.lock_cache().get_by_item(&args.target.0);
    let (write, read) = locks.into_iter().partition::<Vec<_>, _>(|lock| lock.write);
    let locks = ObjectLocks {
        read: read.into_iter().map(|lock| lock.job).collect(),
        write: write.into_iter().map(|lock| lock.job).collect(),
    };
    print_response(Response::Locks { locks })
}

/// Preview the jobs a transition would produce, without persisting anything.
pub fn get_transition_consequences(app: &App, args: TransitionConsequencesArgs) -> Result<()> {
    let ctx = app.plan_context();
    let consequences =
        lcm_scheduler::get_transition_consequences(&ctx, &args.instance.0, &args.new_state)?.map(convert);
    print_response(Response::TransitionConsequences { consequences })
}

fn convert(consequences: lcm_scheduler::TransitionConsequences) -> TransitionConsequences {
    TransitionConsequences {
        transition_job: convert_one(consequences.transition_job),
        dependency_jobs: consequences.dependency_jobs.into_iter().map(convert_one).collect(),
    }
}

fn convert_one(c: lcm_scheduler::TransitionConsequence) -> TransitionConsequence {
    TransitionConsequence { class_name: c.class_name, description: c.description, stateful_object: c.stateful_object }
}

fn print_response(response: Response) -> Result<()> {
    println!("{}", serde_json::to_string(&response)?);
    Ok(())
}
