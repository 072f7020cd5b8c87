// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Materialized state built by replaying the WAL.

use crate::event::Event;
use lcm_core::command::{Command, CommandId};
use lcm_core::job::{Job, JobId, JobState};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The scheduler's full durable state: every job and command ever created,
/// plus the ordinal the store will assign to the next job.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct SchedulerState {
    pub jobs: HashMap<JobId, Job>,
    pub commands: HashMap<CommandId, Command>,
    pub next_job_id: u64,
}

impl SchedulerState {
    pub fn get_job(&self, id: JobId) -> Option<&Job> {
        self.jobs.get(&id)
    }

    pub fn get_command(&self, id: &CommandId) -> Option<&Command> {
        self.commands.get(id)
    }

    pub fn command_is_complete(&self, command: &Command) -> bool {
        command.is_complete(|id| self.jobs.get(&id).map(|j| j.state))
    }

    /// Apply `event`, deriving the next state.
    ///
    /// All handlers here must be idempotent: replaying the same event twice
    /// (recovery re-applying an event that was also applied live) must leave
    /// state unchanged on the second application.
    pub fn apply_event(&mut self, event: &Event) {
        match event {
            Event::CommandCreated { command } => {
                self.commands.entry(command.id.clone()).or_insert_with(|| command.clone());
            }

            Event::JobCreated { job } => {
                if job.id.0 >= self.next_job_id {
                    self.next_job_id = job.id.0 + 1;
                }
                self.jobs.entry(job.id).or_insert_with(|| job.clone());
            }

            Event::JobStateChanged { job, state } => {
                if let Some(record) = self.jobs.get_mut(job) {
                    record.state = *state;
                }
            }

            Event::JobLocksReleased { job } => {
                if let Some(record) = self.jobs.get_mut(job) {
                    record.locks.clear();
                }
            }

            // Control events and no-ops carry no state of their own; the
            // replay loop is responsible for skipping Shutdown rather than
            // acting on it.
            Event::Shutdown | Event::CommandNoop { .. } => {}
        }
    }

    pub fn jobs_in_state(&self, state: JobState) -> impl Iterator<Item = &Job> {
        self.jobs.values().filter(move |j| j.state == state)
    }
}
