// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `lcm set-state` - drive one or more objects to a new state under one Command.

use crate::app::App;
use crate::object_key::ObjectKeyArg;
use anyhow::Result;
use clap::Args;
use lcm_core::clock::{Clock, SystemClock};
use lcm_scheduler::{command_set_state, StateTarget};

#[derive(Args)]
pub struct SetStateArgs {
    /// One or more `class/id=new_state` targets, e.g. `target/7=mounted`.
    #[arg(required = true, value_parser = parse_target)]
    pub targets: Vec<(ObjectKeyArg, String)>,

    /// Human-readable reason attached to the Command.
    #[arg(long, default_value = "")]
    pub message: String,
}

fn parse_target(raw: &str) -> Result<(ObjectKeyArg, String), String> {
    let (key, new_state) = raw.split_once('=').ok_or_else(|| format!("expected class/id=new_state, got `{raw}`"))?;
    Ok((key.parse()?, new_state.to_string()))
}

pub fn set_state(app: &App, args: SetStateArgs) -> Result<()> {
    let ctx = app.plan_context();
    let targets =
        args.targets.into_iter().map(|(key, new_state)| StateTarget { instance: key.0, new_state }).collect();

    let command_id = command_set_state(&ctx, &app.store, targets, args.message, SystemClock.epoch_ms())?;
    println!("{}", serde_json::json!({ "command_id": command_id.as_str() }));
    Ok(())
}
