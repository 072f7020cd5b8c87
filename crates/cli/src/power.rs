// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Concrete [`PowerDeviceManager`]: dispatches by invoking an external
//! fence-agent-style executable per device, the same shape the monitor
//! daemon's `PowerControlManager` used — `getattr(manager, task)(**kwargs)`
//! against the out-of-tree agent library. Here that becomes one external
//! process per call, configured by `LCM_POWER_AGENT_PATH`.

use async_trait::async_trait;
use lcm_monitor::{MonitorError, PowerDevice, PowerDeviceManager};
use tokio::process::Command;
use tracing::{debug, warn};

const DEFAULT_AGENT: &str = "lcm-power-agent";
pub const POWER_AGENT_PATH_ENV: &str = "LCM_POWER_AGENT_PATH";

fn agent_path() -> String {
    std::env::var(POWER_AGENT_PATH_ENV).unwrap_or_else(|_| DEFAULT_AGENT.to_string())
}

/// Invokes `<agent> <task> --host <host> --port <port> [--arg k=v]...` and
/// treats a non-zero exit as a dispatch failure, a missing binary as
/// [`MonitorError::Probe`]/[`MonitorError::Dispatch`] rather than a panic.
pub struct ProcessPowerManager;

#[async_trait]
impl PowerDeviceManager for ProcessPowerManager {
    async fn dispatch(&self, device: &PowerDevice, task: &str, kwargs: serde_json::Value) -> Result<(), MonitorError> {
        let mut cmd = Command::new(agent_path());
        cmd.arg(task).arg("--host").arg(&device.sockaddr.host).arg("--port").arg(device.sockaddr.port.to_string());
        if let Some(map) = kwargs.as_object() {
            for (key, value) in map {
                cmd.arg("--arg").arg(format!("{key}={value}"));
            }
        }

        debug!(device = %device.sockaddr, task, "dispatching power agent task");
        let output = cmd.output().await.map_err(|err| MonitorError::Dispatch {
            device: device.sockaddr.clone(),
            task: task.to_string(),
            reason: err.to_string(),
        })?;

        if !output.status.success() {
            return Err(MonitorError::Dispatch {
                device: device.sockaddr.clone(),
                task: task.to_string(),
                reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }

    async fn check_availability(&self, device: &PowerDevice) -> bool {
        let status = Command::new(agent_path())
            .arg("status")
            .arg("--host")
            .arg(&device.sockaddr.host)
            .arg("--port")
            .arg(device.sockaddr.port.to_string())
            .status()
            .await;

        match status {
            Ok(status) => status.success(),
            Err(err) => {
                warn!(device = %device.sockaddr, error = %err, "power agent status probe failed to launch");
                false
            }
        }
    }
}
