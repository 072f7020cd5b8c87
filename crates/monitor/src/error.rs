// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Monitor error taxonomy. Both kinds are per-device and never bubble up to
//! the scheduler: a [`MonitorError`] is logged and turned into an alert, a
//! [`WorkerFault`] kills the worker task so the supervisor restarts it.

use lcm_core::power::Sockaddr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MonitorError {
    /// The device row backing this worker vanished from the registry mid-task
    /// (the original's `PowerControlDevice.DoesNotExist`). Treated as a
    /// graceful delete: the worker stops itself rather than faulting.
    #[error("power device {0} no longer exists")]
    DeviceNotFound(Sockaddr),

    #[error("dispatching {task:?} to {device} failed: {reason}")]
    Dispatch {
        device: Sockaddr,
        task: String,
        reason: String,
    },

    #[error("availability probe for {device} failed: {reason}")]
    Probe { device: Sockaddr, reason: String },
}

/// An uncaught error from task dispatch. Raised only for failures that are
/// not [`MonitorError::DeviceNotFound`] — the worker loop logs it and exits,
/// and the next supervisor reconciliation pass restarts the worker.
#[derive(Debug, Error)]
#[error("worker for {device} faulted: {source}")]
pub struct WorkerFault {
    pub device: Sockaddr,
    #[source]
    pub source: MonitorError,
}
