// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `lcm run-jobs` - instantiate non-state-change jobs directly under one Command.

use crate::app::App;
use crate::object_key::ObjectKeyArg;
use anyhow::Result;
use clap::Args;
use lcm_core::clock::{Clock, SystemClock};
use lcm_core::job::JobDescriptor;
use lcm_scheduler::command_run_jobs;
use std::collections::HashMap;

#[derive(Args)]
pub struct RunJobsArgs {
    /// The job class to instantiate, e.g. `UpdateNidsJob`.
    #[arg(long)]
    pub class_name: String,

    /// The object the job acts on, if any.
    #[arg(long)]
    pub object: Option<ObjectKeyArg>,

    /// Extra `key=value` arguments passed through to the job.
    #[arg(long = "arg", value_parser = parse_kv)]
    pub args: Vec<(String, String)>,

    /// Human-readable reason attached to the Command.
    #[arg(long, default_value = "")]
    pub message: String,
}

fn parse_kv(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw.split_once('=').ok_or_else(|| format!("expected key=value, got `{raw}`"))?;
    Ok((key.to_string(), value.to_string()))
}

pub fn run_jobs(app: &App, args: RunJobsArgs) -> Result<()> {
    let ctx = app.plan_context();
    let descriptor = JobDescriptor {
        class_name: args.class_name,
        args: args.args.into_iter().collect::<HashMap<_, _>>(),
        stateful_object: args.object.map(|o| o.0),
    };

    let command_id = command_run_jobs(&ctx, &app.store, vec![descriptor], args.message, SystemClock.epoch_ms())?;
    println!("{}", serde_json::json!({ "command_id": command_id.as_str() }));
    Ok(())
}
