// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reconciliation loop: every 10s, start workers for newly-configured devices
//! and reap workers for devices that are no longer configured.
//!
//! Translated from `PowerMonitorDaemon.run` (`original_source/monitor_daemon.py`).

use crate::alert::AlertStore;
use crate::config::Config;
use crate::device::DeviceRegistry;
use crate::worker::{spawn_worker, PowerDeviceManager, WorkerHandle};
use lcm_core::power::Sockaddr;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::info;

pub struct Supervisor {
    registry: Arc<dyn DeviceRegistry>,
    manager: Arc<dyn PowerDeviceManager>,
    alerts: Arc<AlertStore>,
    config: Config,
    workers: HashMap<Sockaddr, WorkerHandle>,
}

impl Supervisor {
    pub fn new(registry: Arc<dyn DeviceRegistry>, manager: Arc<dyn PowerDeviceManager>, alerts: Arc<AlertStore>, config: Config) -> Self {
        Self { registry, manager, alerts, config, workers: HashMap::new() }
    }

    /// One pass of the 10s reconciliation loop: ensure
    /// every configured device has a live worker, then reap workers for
    /// devices no longer configured.
    pub async fn reconcile(&mut self) {
        let configured = self.registry.devices();
        let configured_addrs: HashSet<Sockaddr> = configured.iter().map(|d| d.sockaddr.clone()).collect();

        for device in configured {
            let already_running = self.workers.get(&device.sockaddr).is_some_and(|h| !h.is_finished());
            if already_running {
                continue;
            }
            if self.workers.contains_key(&device.sockaddr) {
                info!(device = %device.sockaddr, "monitor worker died, restarting");
            } else {
                info!(device = %device.sockaddr, "found new power device to monitor");
            }
            let handle = spawn_worker(device, self.manager.clone(), self.alerts.clone(), self.config.probe_interval);
            self.workers.insert(handle.device().sockaddr.clone(), handle);
        }

        let stale: Vec<Sockaddr> =
            self.workers.keys().filter(|addr| !configured_addrs.contains(*addr)).cloned().collect();
        for addr in stale {
            if let Some(handle) = self.workers.remove(&addr) {
                info!(device = %addr, "reaping monitor for removed power device");
                handle.stop_and_join().await;
            }
        }
    }

    /// Run the reconciliation loop forever on a 10s interval. Intended to be
    /// spawned as its own long-lived task by the CLI's daemon entry point.
    pub async fn run_forever(mut self) -> ! {
        let mut ticker = tokio::time::interval(self.config.reconcile_interval);
        loop {
            ticker.tick().await;
            self.reconcile().await;
        }
    }

    /// Stop and reap every worker. Used on daemon shutdown.
    pub async fn shutdown(mut self) {
        for (_, handle) in self.workers.drain() {
            handle.stop_and_join().await;
        }
    }

    #[cfg(test)]
    fn worker_count(&self) -> usize {
        self.workers.len()
    }
}

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
