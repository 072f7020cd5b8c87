// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `Store`: the facade tying the WAL, snapshot, materialized state, and
//! Lock Cache together behind one write path.
//!
//! Every mutation goes through [`Store::apply`]: append to the WAL first,
//! then fold into [`SchedulerState`] and, for lock-bearing events, into the
//! [`LockCache`]. Nothing is visible to either until the WAL append
//! succeeds: a crash between the two never leaves a half-applied event visible.
//!
//! A whole planning pass persists several jobs at once; [`Store::apply_batch`]
//! appends and flushes all of them as one WAL write before folding any of
//! them into materialized state, so a crash mid-pass leaves either every job
//! in the pass visible on restart or none of them - never a structurally
//! partial plan. [`Store::apply`] is the single-event special case of the
//! same call.
//!
//! That per-pass atomicity doesn't cover two *overlapping* passes against
//! the same `Store`: interleaving them could still violate `wait_for`
//! ordering. Serializing concurrent Command API calls against one `Store` is
//! the caller's job; `lcm-cli` never needs it since each invocation is a
//! fresh process making exactly one such call.

use crate::checkpoint::{load_snapshot, Checkpointer};
use crate::error::StorageError;
use crate::event::Event;
use crate::lock_cache::LockCache;
use crate::state::SchedulerState;
use crate::wal::Wal;
use lcm_core::job::JobId;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use tracing::instrument;

pub struct Store {
    wal: Mutex<Wal>,
    state: Mutex<SchedulerState>,
    lock_cache: LockCache,
    checkpointer: Mutex<Checkpointer>,
}

impl Store {
    /// Open the store rooted at `dir` (`dir/state.wal`, `dir/snapshot.json`),
    /// replaying the WAL over the last snapshot and rebuilding the Lock
    /// Cache from every non-terminal job's locks.
    #[instrument(skip_all, fields(dir = %dir.as_ref().display()))]
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let dir = dir.as_ref();
        let snapshot_path = dir.join("snapshot.json");
        let wal_path = dir.join("state.wal");

        let snapshot = load_snapshot(&snapshot_path)?;
        let (mut state, processed_seq) = match snapshot {
            Some(s) => (s.state, s.seq),
            None => (SchedulerState::default(), 0),
        };

        let mut wal = Wal::open(&wal_path, processed_seq)?;
        while let Some(entry) = wal.next_unprocessed()? {
            if !matches!(entry.event, Event::Shutdown) {
                state.apply_event(&entry.event);
            }
            wal.mark_processed(entry.seq);
        }

        let lock_cache = LockCache::new();
        for job in state.jobs.values() {
            if !job.is_terminal() {
                for lock in &job.locks {
                    lock_cache.add(lock.clone());
                }
            }
        }

        Ok(Self {
            checkpointer: Mutex::new(Checkpointer::new(snapshot_path, wal.processed_seq())),
            wal: Mutex::new(wal),
            state: Mutex::new(state),
            lock_cache,
        })
    }

    pub fn lock_cache(&self) -> &LockCache {
        &self.lock_cache
    }

    /// Allocate the next `JobId` without yet persisting a job for it.
    pub fn next_job_id(&self) -> JobId {
        let mut state = self.state.lock();
        let id = JobId::new(state.next_job_id);
        state.next_job_id += 1;
        id
    }

    /// Append `event` to the WAL and fold it into materialized state,
    /// flushing (and checkpointing, if due) before returning.
    pub fn apply(&self, event: Event) -> Result<(), StorageError> {
        self.apply_batch(vec![event])
    }

    /// Append every event in `events` to the WAL and flush once, before
    /// folding any of them into materialized state. A crash before that one
    /// flush completes leaves none of `events` on disk - replaying the WAL
    /// after restart sees either the whole batch or nothing, never a prefix
    /// of it. Used to persist a planning pass's jobs as a single unit.
    pub fn apply_batch(&self, events: Vec<Event>) -> Result<(), StorageError> {
        if events.is_empty() {
            return Ok(());
        }

        let mut wal = self.wal.lock();
        let mut last_seq = 0;
        for event in &events {
            last_seq = wal.append(event)?;
        }
        wal.flush()?;

        for event in &events {
            {
                let mut state = self.state.lock();
                state.apply_event(event);
            }
            if let Event::JobStateChanged { job, .. } = event {
                let state = self.state.lock();
                if let Some(record) = state.get_job(*job) {
                    if record.is_terminal() {
                        self.lock_cache.remove(*job);
                    }
                }
            }
            if let Event::JobCreated { job } = event {
                for lock in &job.locks {
                    self.lock_cache.add(lock.clone());
                }
            }
        }

        let mut checkpointer = self.checkpointer.lock();
        if checkpointer.is_due(last_seq) {
            let state = self.state.lock();
            checkpointer.checkpoint(&mut wal, &state)?;
        }
        Ok(())
    }

    pub fn with_state<R>(&self, f: impl FnOnce(&SchedulerState) -> R) -> R {
        f(&self.state.lock())
    }

    pub fn wal_path(dir: impl AsRef<Path>) -> PathBuf {
        dir.as_ref().join("state.wal")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lcm_core::command::CommandId;
    use lcm_core::job::{Job, JobKind, JobState};
    use lcm_core::lock::StateLock;
    use lcm_core::object::{ObjectClass, ObjectKey};
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn job(id: JobId) -> Job {
        let target = ObjectKey::new(ObjectClass::Target, "7");
        Job {
            id,
            command_id: CommandId::new(),
            class_name: "mount_target".to_string(),
            args: HashMap::new(),
            kind: JobKind::StateChange {
                from_states: vec!["unmounted".to_string()],
                to_state: "mounted".to_string(),
                stateful_object: target.clone(),
            },
            locks: vec![StateLock::write(id, target, "unmounted", "mounted")],
            wait_for: Vec::new(),
            state: JobState::Pending,
            description: "mount target/7".to_string(),
        }
    }

    #[test]
    fn open_on_empty_dir_starts_fresh() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        assert_eq!(store.next_job_id(), JobId::new(0));
    }

    #[test]
    fn apply_job_created_populates_lock_cache() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        let id = JobId::new(store.with_state(|s| s.next_job_id));
        store.apply(Event::JobCreated { job: job(id) }).unwrap();

        let target = ObjectKey::new(ObjectClass::Target, "7");
        assert!(store.lock_cache().get_latest_write(&target, None).is_some());
    }

    #[test]
    fn terminal_state_evicts_lock_cache_entry() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        let id = JobId::new(0);
        store.apply(Event::JobCreated { job: job(id) }).unwrap();
        store.apply(Event::JobStateChanged { job: id, state: JobState::Complete }).unwrap();

        let target = ObjectKey::new(ObjectClass::Target, "7");
        assert!(store.lock_cache().get_latest_write(&target, None).is_none());
    }

    #[test]
    fn apply_batch_persists_every_event_as_one_unit() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        let other_target = ObjectKey::new(ObjectClass::Target, "8");
        let mut second = job(JobId::new(1));
        second.locks = vec![StateLock::write(JobId::new(1), other_target.clone(), "unmounted", "mounted")];

        store
            .apply_batch(vec![
                Event::JobCreated { job: job(JobId::new(0)) },
                Event::JobCreated { job: second },
            ])
            .unwrap();

        let store = Store::open(dir.path()).unwrap();
        assert!(store.with_state(|s| s.get_job(JobId::new(0)).is_some()));
        assert!(store.with_state(|s| s.get_job(JobId::new(1)).is_some()));
        assert!(store.lock_cache().get_latest_write(&ObjectKey::new(ObjectClass::Target, "7"), None).is_some());
        assert!(store.lock_cache().get_latest_write(&other_target, None).is_some());
    }

    #[test]
    fn reopen_recovers_state_and_lock_cache() {
        let dir = tempdir().unwrap();
        {
            let store = Store::open(dir.path()).unwrap();
            store.apply(Event::JobCreated { job: job(JobId::new(0)) }).unwrap();
        }

        let store = Store::open(dir.path()).unwrap();
        assert!(store.with_state(|s| s.get_job(JobId::new(0)).is_some()));
        let target = ObjectKey::new(ObjectClass::Target, "7");
        assert!(store.lock_cache().get_latest_write(&target, None).is_some());
    }
}
