// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error taxonomy for the planner and modification operation.
//!
//! `SchedulingError` is user-visible and recoverable; `DependencyContractViolation`
//! is a programmer error that aborts the enclosing transaction.

use crate::object::ObjectKey;
use thiserror::Error;

/// User-visible, recoverable scheduling errors. The REST adapter (out of
/// scope here) is expected to map these to a 400-equivalent response.
#[derive(Debug, Error)]
pub enum SchedulingError {
    #[error("{state:?} is not a valid state for {object}")]
    InvalidState { object: ObjectKey, state: String },

    #[error("{0} is not registered in the model registry")]
    ObjectNotFound(ObjectKey),

    #[error("no route from {from:?} to {to:?} for {object}")]
    UnreachableState {
        object: ObjectKey,
        from: String,
        to: String,
    },

    #[error(
        "write lock chaining mismatch on {object}: expected begin_state {expected:?}, got {actual:?}"
    )]
    StateChainMismatch {
        object: ObjectKey,
        expected: String,
        actual: String,
    },
}

/// Programmer error: the dependency/route registry is internally
/// inconsistent. Modeled as an inspectable `Result` variant rather than a
/// real `panic!`/assertion so tests can observe it, but callers should treat
/// it like an assertion failure — it aborts the enclosing transaction and is
/// never surfaced to end users.
#[derive(Debug, Error)]
pub enum DependencyContractViolation {
    #[error("reverse dependency of {object} on {dependent} excludes {new_state:?} but declares no fix_state")]
    MissingFixState {
        object: ObjectKey,
        dependent: ObjectKey,
        new_state: String,
    },

    #[error("no job class registered for {object} hop {from:?} -> {to:?}")]
    MissingJobClass {
        object: ObjectKey,
        from: String,
        to: String,
    },

    #[error("fix_state table for {dependent} has no entry for new state {new_state:?}")]
    UnresolvedFixState {
        dependent: ObjectKey,
        new_state: String,
    },
}

/// Planner-level error: either kind can come out of `plan`/`set_state`.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error(transparent)]
    Scheduling(#[from] SchedulingError),
    #[error(transparent)]
    Contract(#[from] DependencyContractViolation),
}
