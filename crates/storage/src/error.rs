// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// Errors from the write-ahead log.
#[derive(Debug, Error)]
pub enum WalError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors from snapshot persistence.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("snapshot version {found} is newer than the version this build understands ({max})")]
    UnknownVersion { found: u32, max: u32 },
}

/// Top-level storage error, covering recovery and the facade over WAL + snapshot.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error(transparent)]
    Wal(#[from] WalError),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    #[error("job {0} not found")]
    JobNotFound(lcm_core::job::JobId),
    #[error("command {0} not found")]
    CommandNotFound(lcm_core::command::CommandId),
    /// The append itself did not land (e.g. the WAL file was momentarily
    /// unwritable). Callers retry by rolling back the in-progress planning
    /// transaction and re-entering with fresh `expected_states` rather than
    /// assuming the store is now inconsistent.
    #[error("transient store error, retry with fresh expected state: {0}")]
    Transient(String),
}
