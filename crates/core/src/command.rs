// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Commands: the grouping of Jobs produced by one user request.

use crate::job::{JobId, JobState};
use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Unique identifier for a command.
    pub struct CommandId("cmd-");
}

/// Groups the Jobs created by one user request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub id: CommandId,
    pub message: String,
    pub created_at_ms: u64,
    pub jobs: Vec<JobId>,
}

impl Command {
    pub fn new(message: impl Into<String>, created_at_ms: u64) -> Self {
        Self {
            id: CommandId::new(),
            message: message.into(),
            created_at_ms,
            jobs: Vec::new(),
        }
    }

    pub fn attach(&mut self, job: JobId) {
        if !self.jobs.contains(&job) {
            self.jobs.push(job);
        }
    }

    /// Completion is derived, never stored: a command is complete once every
    /// attached job reaches a terminal state.
    pub fn is_complete(&self, job_states: impl Fn(JobId) -> Option<JobState>) -> bool {
        self.jobs.iter().all(|id| {
            job_states(*id).map(JobState::is_terminal).unwrap_or(false)
        })
    }
}
