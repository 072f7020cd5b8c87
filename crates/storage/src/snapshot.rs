// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Snapshot persistence for crash recovery.
//!
//! A snapshot captures the complete materialized state at a point in time,
//! tagged with the WAL sequence it was taken at. Recovery loads the newest
//! snapshot and replays WAL entries after that sequence.

use crate::backup::rotate_bak_path;
use crate::error::SnapshotError;
use crate::state::SchedulerState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const CURRENT_SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(rename = "v")]
    pub version: u32,
    pub seq: u64,
    pub state: SchedulerState,
    pub created_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn new(seq: u64, state: SchedulerState, created_at: DateTime<Utc>) -> Self {
        Self { version: CURRENT_SNAPSHOT_VERSION, seq, state, created_at }
    }

    /// Load the snapshot at `path`, or `None` if it doesn't exist yet.
    pub fn load(path: impl AsRef<Path>) -> Result<Option<Self>, SnapshotError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(path)?;
        let snapshot: Snapshot = serde_json::from_str(&raw)?;
        if snapshot.version > CURRENT_SNAPSHOT_VERSION {
            return Err(SnapshotError::UnknownVersion {
                found: snapshot.version,
                max: CURRENT_SNAPSHOT_VERSION,
            });
        }
        Ok(Some(snapshot))
    }

    /// Write the snapshot to `path`, rotating any existing file to `.bak`
    /// first so a crash mid-write never loses both copies.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
        let path = path.as_ref();
        if path.exists() {
            let bak = rotate_bak_path(path);
            fs::rename(path, &bak)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn load_absent_snapshot_is_none() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        assert!(Snapshot::load(&path).unwrap().is_none());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        let snapshot = Snapshot::new(5, SchedulerState::default(), Utc::now());
        snapshot.save(&path).unwrap();

        let loaded = Snapshot::load(&path).unwrap().expect("snapshot exists");
        assert_eq!(loaded.seq, 5);
        assert_eq!(loaded.version, CURRENT_SNAPSHOT_VERSION);
    }

    #[test]
    fn save_rotates_previous_snapshot_to_bak() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        Snapshot::new(1, SchedulerState::default(), Utc::now()).save(&path).unwrap();
        Snapshot::new(2, SchedulerState::default(), Utc::now()).save(&path).unwrap();

        assert!(path.with_extension("bak").exists());
        let current = Snapshot::load(&path).unwrap().expect("snapshot exists");
        assert_eq!(current.seq, 2);
    }
}
