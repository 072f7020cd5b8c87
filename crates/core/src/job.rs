// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job identifier, lifecycle state, and the Job record itself.

use crate::lock::StateLock;
use crate::object::ObjectKey;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Unique identifier for a persisted job.
///
/// Unlike [`crate::command::CommandId`] (a `define_id!` nanoid, opaque and
/// unordered), `JobId` is a bare monotonic ordinal: the store assigns these
/// in strictly increasing insertion order, and that monotonicity is the
/// substrate the planner's linearization and wait-for derivation compare
/// directly (`get_latest_write`, `get_read_locks(after: id)`). A random id
/// would not support those comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub u64);

impl JobId {
    pub const fn new(n: u64) -> Self {
        Self(n)
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "job-{}", self.0)
    }
}

/// Lifecycle state of a persisted job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Pending,
    Tasked,
    Complete,
    Errored,
    Cancelled,
}

crate::simple_display! {
    JobState {
        Pending => "pending",
        Tasked => "tasked",
        Complete => "complete",
        Errored => "errored",
        Cancelled => "cancelled",
    }
}

impl JobState {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobState::Complete | JobState::Errored | JobState::Cancelled)
    }
}

/// Polymorphism over Job kind: a tagged variant standing in for the source's
/// dynamic dispatch on job subclasses.
///
/// Only `StateChange` jobs promise a write-lock end state; `Action` jobs
/// (from `command_run_jobs`) carry no state transition of their own, though
/// the dependency cache may still insert state-change prerequisites for them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JobKind {
    StateChange {
        /// `(from_states, to_state)` — `from_states` is the set of states
        /// the route-hop's class is registered as handling.
        from_states: Vec<String>,
        to_state: String,
        stateful_object: ObjectKey,
    },
    Action {
        stateful_object: Option<ObjectKey>,
    },
}

impl JobKind {
    pub fn stateful_object(&self) -> Option<&ObjectKey> {
        match self {
            JobKind::StateChange { stateful_object, .. } => Some(stateful_object),
            JobKind::Action { stateful_object } => stateful_object.as_ref(),
        }
    }

    pub fn is_state_change(&self) -> bool {
        matches!(self, JobKind::StateChange { .. })
    }
}

/// A persistent record of planned work.
///
/// Immutable once persisted except `state`, `locks`, and `wait_for` — those
/// are filled in during the same transaction that creates the job and never
/// touched again by the scheduler (the runner owns completion).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub command_id: crate::command::CommandId,
    pub class_name: String,
    pub args: HashMap<String, String>,
    pub kind: JobKind,
    pub locks: Vec<StateLock>,
    pub wait_for: Vec<JobId>,
    pub state: JobState,
    pub description: String,
}

impl Job {
    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }
}

/// Request payload for `command_run_jobs`: a job to instantiate directly,
/// outside of a state-change request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDescriptor {
    pub class_name: String,
    pub args: HashMap<String, String>,
    pub stateful_object: Option<ObjectKey>,
}
