// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wires the scheduler's collaborator seams to their concrete
//! implementations for one CLI invocation: `lcm-topology` for routes and
//! static dependencies, `ObjectGraph` for reverse dependents, and this
//! crate's [`InventorySource`] for the model registry and device registry.

use crate::inventory::InventorySource;
use anyhow::{Context, Result};
use lcm_scheduler::PlanContext;
use lcm_storage::Store;
use lcm_topology::{ObjectGraph, Topology};
use std::path::PathBuf;
use std::sync::Arc;

pub const STORE_DIR_ENV: &str = "LCM_STORE_DIR";
const DEFAULT_STORE_DIR: &str = "./lcm-data";

pub struct App {
    pub store: Store,
    pub topology: Topology,
    pub graph: ObjectGraph,
    pub inventory: Arc<InventorySource>,
}

impl App {
    pub fn open() -> Result<Self> {
        let store_dir = std::env::var(STORE_DIR_ENV).unwrap_or_else(|_| DEFAULT_STORE_DIR.to_string());
        let store = Store::open(PathBuf::from(&store_dir)).with_context(|| format!("opening store at {store_dir}"))?;

        let topology_config = lcm_topology::load_from_env().context("loading topology registry")?;
        let topology = Topology::from_config(topology_config).context("building topology")?;
        let graph = ObjectGraph::from_topology(&topology);

        let inventory = Arc::new(crate::inventory::load_from_env().context("loading object/power-device inventory")?);

        Ok(Self { store, topology, graph, inventory })
    }

    pub fn plan_context(&self) -> PlanContext<'_> {
        PlanContext {
            routes: &self.topology,
            deps: &self.topology,
            dependents: &self.graph,
            registry: self.inventory.as_ref(),
            lock_cache: self.store.lock_cache(),
        }
    }
}
