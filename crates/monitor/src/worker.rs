// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One long-running worker per power device: drains a small task queue,
//! probes availability, and sleeps bounded on a cooperative stop signal.
//!
//! Translated from `PowerDeviceMonitor` (`original_source/monitor_daemon.py`):
//! `threading.Thread` → `tokio::task`, `Queue` → bounded `mpsc`,
//! `threading.Event` → `tokio_util::sync::CancellationToken`.

use crate::alert::AlertStore;
use crate::device::PowerDevice;
use crate::error::{MonitorError, WorkerFault};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument, warn};

const TASK_QUEUE_DEPTH: usize = 32;
const STOP_TASK: &str = "stop";

/// Abstracts the (external) power device transport and task dispatch that
/// `original_source`'s `PowerControlManager` performs via `getattr`. Owned by
/// the CLI/storage layer; the monitor only ever sees this seam.
#[async_trait]
pub trait PowerDeviceManager: Send + Sync {
    async fn dispatch(&self, device: &PowerDevice, task: &str, kwargs: serde_json::Value) -> Result<(), MonitorError>;

    async fn check_availability(&self, device: &PowerDevice) -> bool;
}

/// A unit of work enqueued by the supervisor for a specific device's worker.
#[derive(Debug, Clone)]
pub struct WorkerTask {
    pub name: String,
    pub kwargs: serde_json::Value,
}

impl WorkerTask {
    pub fn new(name: impl Into<String>, kwargs: serde_json::Value) -> Self {
        Self { name: name.into(), kwargs }
    }

    fn stop() -> Self {
        Self { name: STOP_TASK.to_string(), kwargs: serde_json::Value::Null }
    }
}

/// A handle to a spawned worker task. Dropping it does not stop the worker —
/// call [`WorkerHandle::stop`] explicitly, matching the supervisor's
/// reap-then-remove contract.
pub struct WorkerHandle {
    device: PowerDevice,
    tx: mpsc::Sender<WorkerTask>,
    token: CancellationToken,
    join: JoinHandle<()>,
}

impl WorkerHandle {
    pub fn device(&self) -> &PowerDevice {
        &self.device
    }

    /// Fire-and-forget enqueue: tasks run in the order enqueued per device.
    pub fn enqueue(&self, task: WorkerTask) {
        if self.tx.try_send(task).is_err() {
            warn!(device = %self.device.sockaddr, "worker task queue full or closed, dropping task");
        }
    }

    /// True once the worker loop has exited, whether by graceful stop or by
    /// an uncaught dispatch error ([`crate::error::WorkerFault`]). The
    /// supervisor treats both the same way: start a replacement.
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Signal the worker to stop and wait for it to exit. Used by the
    /// supervisor when a device is no longer configured.
    pub async fn stop_and_join(self) {
        self.token.cancel();
        let _ = self.join.await;
    }
}

/// Spawn the worker task for `device`. The returned handle is fire-and-forget
/// for task enqueueing; only `stop_and_join` blocks.
pub fn spawn_worker(
    device: PowerDevice,
    manager: Arc<dyn PowerDeviceManager>,
    alerts: Arc<AlertStore>,
    probe_interval: Duration,
) -> WorkerHandle {
    let (tx, rx) = mpsc::channel(TASK_QUEUE_DEPTH);
    let token = CancellationToken::new();
    let join = tokio::spawn(run_worker(device.clone(), manager, alerts, rx, token.clone(), probe_interval));
    WorkerHandle { device, tx, token, join }
}

#[instrument(skip(manager, alerts, rx, token), fields(device = %device.sockaddr))]
async fn run_worker(
    device: PowerDevice,
    manager: Arc<dyn PowerDeviceManager>,
    alerts: Arc<AlertStore>,
    mut rx: mpsc::Receiver<WorkerTask>,
    token: CancellationToken,
    probe_interval: Duration,
) {
    info!("starting monitor worker");

    loop {
        if token.is_cancelled() {
            break;
        }

        match rx.try_recv() {
            Ok(task) if task.name == STOP_TASK => {
                token.cancel();
                break;
            }
            Ok(task) => {
                if let Err(err) = manager.dispatch(&device, &task.name, task.kwargs).await {
                    match err {
                        MonitorError::DeviceNotFound(_) => {
                            warn!("device no longer exists, stopping worker");
                            break;
                        }
                        other => {
                            let fault = WorkerFault { device: device.sockaddr.clone(), source: other };
                            error!(error = %fault, "worker faulted, exiting for the supervisor to restart");
                            break;
                        }
                    }
                }
            }
            Err(mpsc::error::TryRecvError::Empty) => {}
            Err(mpsc::error::TryRecvError::Disconnected) => break,
        }

        let available = manager.check_availability(&device).await;
        alerts.notify(&device.sockaddr, !available);

        tokio::select! {
            _ = token.cancelled() => break,
            _ = tokio::time::sleep(probe_interval) => {}
        }
    }

    alerts.release(&device.sockaddr);
    info!("monitor worker stopped");
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
