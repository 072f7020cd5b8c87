// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! lcm-scheduler: the Transition Planner (C4) and Modification Operation
//! (C5)/Command API (C6) built on top of it.

mod command_api;
mod modify;
mod planner;
#[cfg(test)]
mod test_support;

pub use command_api::{
    command_run_jobs, command_set_state, get_transition_consequences, StateTarget, TransitionConsequence,
    TransitionConsequences,
};
pub use modify::{add_jobs, set_state, ModifyError};
pub use planner::{expected_state, plan, PlanContext, PlanOutcome};
