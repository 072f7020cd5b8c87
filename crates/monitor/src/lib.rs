// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! lcm-monitor: the Power Monitor Supervisor (C7) and its per-device workers.

mod alert;
mod config;
mod device;
mod error;
mod supervisor;
mod worker;

pub use alert::AlertStore;
pub use config::Config;
pub use device::{DeviceRegistry, PowerDevice};
pub use error::{MonitorError, WorkerFault};
pub use supervisor::Supervisor;
pub use worker::{spawn_worker, PowerDeviceManager, WorkerHandle, WorkerTask};
