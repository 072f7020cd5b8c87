// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! State locks: read/write intents jobs hold over objects.

use crate::job::JobId;
use crate::object::ObjectKey;
use serde::{Deserialize, Serialize};

/// A read or write intent a [`crate::job::Job`] holds over an object.
///
/// Write locks carry `begin_state`/`end_state`; read locks carry neither.
/// Invariant: for any object, the sequence of write locks ordered by job id
/// is state-consistent — each write's `begin_state` equals the previous
/// write's `end_state`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateLock {
    pub job: JobId,
    pub locked_item: ObjectKey,
    pub write: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub begin_state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_state: Option<String>,
}

impl StateLock {
    pub fn read(job: JobId, locked_item: ObjectKey) -> Self {
        Self {
            job,
            locked_item,
            write: false,
            begin_state: None,
            end_state: None,
        }
    }

    pub fn write(
        job: JobId,
        locked_item: ObjectKey,
        begin_state: impl Into<String>,
        end_state: impl Into<String>,
    ) -> Self {
        Self {
            job,
            locked_item,
            write: true,
            begin_state: Some(begin_state.into()),
            end_state: Some(end_state.into()),
        }
    }
}
