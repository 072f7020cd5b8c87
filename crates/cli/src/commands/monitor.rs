// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `lcm monitor` - run the Power Monitor Supervisor in the foreground.

use crate::app::App;
use crate::power::ProcessPowerManager;
use anyhow::Result;
use lcm_monitor::{AlertStore, Config, Supervisor};
use std::sync::Arc;
use tracing::info;

pub async fn monitor(app: App) -> Result<()> {
    let supervisor =
        Supervisor::new(app.inventory, Arc::new(ProcessPowerManager), Arc::new(AlertStore::new()), Config::from_env());

    info!("power monitor supervisor starting");
    supervisor.run_forever().await;
}
