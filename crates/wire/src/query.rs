// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Request types for the RPC surface the (external) REST layer consumes.

use lcm_core::job::JobDescriptor;
use lcm_core::object::ObjectKey;
use serde::{Deserialize, Serialize};

/// One `(instance, new_state)` pair within a `CommandSetState` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateChangeTarget {
    pub instance: ObjectKey,
    pub new_state: String,
}

/// Request types for reading scheduler state and issuing Commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Query {
    /// States each target could transition to from its committed state.
    AvailableTransitions { targets: Vec<ObjectKey> },
    /// Job descriptors available to run against each target.
    AvailableJobs { targets: Vec<ObjectKey> },
    /// Read and write locks currently held on one object.
    GetLocks { target: ObjectKey },
    /// Preview the jobs a transition would produce, without persisting.
    GetTransitionConsequences { instance: ObjectKey, new_state: String },
    /// Drive every target to its requested state under one new Command.
    CommandSetState { targets: Vec<StateChangeTarget>, message: String },
    /// Instantiate non-state-change jobs directly under one new Command.
    CommandRunJobs { descriptors: Vec<JobDescriptor>, message: String },
}
