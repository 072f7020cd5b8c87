// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory index of pending and running locks.
//!
//! Authoritative for **pending and running** work only — a job's locks are
//! evicted the instant the runner reports completion via `remove`. Ordering
//! is defined by `JobId`, which the store guarantees is monotonically
//! increasing in insertion order.

use lcm_core::job::JobId;
use lcm_core::lock::StateLock;
use lcm_core::object::ObjectKey;
use parking_lot::RwLock;
use std::collections::HashMap;

#[derive(Debug, Default)]
struct Index {
    by_item: HashMap<ObjectKey, Vec<StateLock>>,
    by_job: HashMap<JobId, Vec<StateLock>>,
}

/// Thread-safe lock cache. Safe to read and write from multiple threads,
/// but the *planner*'s single-writer requirement (no two overlapping
/// planning passes for the same `Store`) is the caller's responsibility —
/// see the concurrency note on [`crate::store::Store`].
#[derive(Debug, Default)]
pub struct LockCache {
    inner: RwLock<Index>,
}

impl LockCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, lock: StateLock) {
        let mut index = self.inner.write();
        index.by_item.entry(lock.locked_item.clone()).or_default().push(lock.clone());
        index.by_job.entry(lock.job).or_default().push(lock);
    }

    pub fn get_by_job(&self, job: JobId) -> Vec<StateLock> {
        self.inner.read().by_job.get(&job).cloned().unwrap_or_default()
    }

    /// The highest-job-id write lock on `item`, excluding `not_job`.
    pub fn get_latest_write(&self, item: &ObjectKey, not_job: Option<JobId>) -> Option<StateLock> {
        self.inner
            .read()
            .by_item
            .get(item)?
            .iter()
            .filter(|l| l.write && Some(l.job) != not_job)
            .max_by_key(|l| l.job)
            .cloned()
    }

    /// All read locks on `item` with `job.id > after`, excluding `not_job`.
    pub fn get_read_locks(&self, item: &ObjectKey, after: JobId, not_job: Option<JobId>) -> Vec<StateLock> {
        self.inner
            .read()
            .by_item
            .get(item)
            .map(|locks| {
                locks
                    .iter()
                    .filter(|l| !l.write && l.job > after && Some(l.job) != not_job)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Every lock — read or write — currently held on `item`, for reporting
    /// (cf. the `get_locks` RPC entry: callers want the full picture, not the
    /// planner's after/not_job-filtered views above).
    pub fn get_by_item(&self, item: &ObjectKey) -> Vec<StateLock> {
        self.inner.read().by_item.get(item).cloned().unwrap_or_default()
    }

    /// `item -> latest write lock`, across every locked item — used to seed
    /// expected-state in the transition planner.
    pub fn get_write_by_locked_item(&self) -> HashMap<ObjectKey, StateLock> {
        let index = self.inner.read();
        let mut out = HashMap::new();
        for (item, locks) in &index.by_item {
            if let Some(latest) = locks.iter().filter(|l| l.write).max_by_key(|l| l.job) {
                out.insert(item.clone(), latest.clone());
            }
        }
        out
    }

    /// Evict every lock held by `job`. Called by the runner on completion.
    pub fn remove(&self, job: JobId) {
        let mut index = self.inner.write();
        if let Some(locks) = index.by_job.remove(&job) {
            for lock in locks {
                if let Some(item_locks) = index.by_item.get_mut(&lock.locked_item) {
                    item_locks.retain(|l| l.job != job);
                    if item_locks.is_empty() {
                        index.by_item.remove(&lock.locked_item);
                    }
                }
            }
        }
    }
}
