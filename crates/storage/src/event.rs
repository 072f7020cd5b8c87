// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! WAL-recorded events: the only way [`crate::state::SchedulerState`] changes.

use lcm_core::command::{Command, CommandId};
use lcm_core::job::{Job, JobId, JobState};
use serde::{Deserialize, Serialize};

/// A single durable fact. Handlers in [`crate::state`] must be idempotent:
/// replaying the same event twice against the same state must be a no-op the
/// second time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    CommandCreated { command: Command },
    JobCreated { job: Job },
    JobStateChanged { job: JobId, state: JobState },
    /// The runner (external) signals lock release on completion.
    JobLocksReleased { job: JobId },
    /// Control event; replay must skip it rather than act on it, matching the
    /// teacher's treatment of its own `Shutdown` marker.
    Shutdown,
    #[allow(dead_code)]
    CommandNoop { command_id: CommandId },
}
