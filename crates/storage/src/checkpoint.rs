// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Periodic snapshotting, so restart replay never has to walk an unbounded WAL.

use crate::error::SnapshotError;
use crate::snapshot::Snapshot;
use crate::state::SchedulerState;
use crate::wal::Wal;
use chrono::Utc;
use std::path::{Path, PathBuf};
use tracing::info;

/// Snapshot once this many WAL entries have accumulated since the last one.
const DEFAULT_CHECKPOINT_INTERVAL: u64 = 500;

pub fn load_snapshot(path: impl AsRef<Path>) -> Result<Option<Snapshot>, SnapshotError> {
    Snapshot::load(path)
}

/// Tracks when the next snapshot is due and performs it.
pub struct Checkpointer {
    snapshot_path: PathBuf,
    interval: u64,
    last_checkpoint_seq: u64,
}

impl Checkpointer {
    pub fn new(snapshot_path: impl Into<PathBuf>, last_checkpoint_seq: u64) -> Self {
        Self { snapshot_path: snapshot_path.into(), interval: DEFAULT_CHECKPOINT_INTERVAL, last_checkpoint_seq }
    }

    pub fn with_interval(mut self, interval: u64) -> Self {
        self.interval = interval;
        self
    }

    pub fn is_due(&self, write_seq: u64) -> bool {
        write_seq.saturating_sub(self.last_checkpoint_seq) >= self.interval
    }

    /// Snapshot `state` at `wal`'s current write sequence, then truncate the
    /// WAL up to and including that sequence.
    pub fn checkpoint(&mut self, wal: &mut Wal, state: &SchedulerState) -> Result<(), SnapshotError> {
        let seq = wal.write_seq();
        let snapshot = Snapshot::new(seq, state.clone(), Utc::now());
        snapshot.save(&self.snapshot_path)?;
        wal.truncate_before(seq + 1).map_err(|e| SnapshotError::Io(std::io::Error::other(e)))?;
        self.last_checkpoint_seq = seq;
        info!(seq, path = %self.snapshot_path.display(), "checkpointed scheduler state");
        Ok(())
    }
}
