// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! lcm-storage: write-ahead log, snapshots, materialized scheduler state,
//! and the Lock Cache.

mod backup;
mod checkpoint;
mod error;
mod event;
mod lock_cache;
mod snapshot;
mod state;
mod store;
mod wal;

pub use checkpoint::{load_snapshot, Checkpointer};
pub use error::{SnapshotError, StorageError, WalError};
pub use event::Event;
pub use lock_cache::LockCache;
pub use snapshot::{Snapshot, CURRENT_SNAPSHOT_VERSION};
pub use state::SchedulerState;
pub use store::Store;
pub use wal::{Wal, WalEntry};
