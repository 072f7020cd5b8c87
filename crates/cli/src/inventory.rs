// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! TOML-backed inventory of stateful objects and power devices.
//!
//! This is the CLI-layer stand-in for the ORM-backed model store spec.md
//! treats as out of core scope: an explicit discriminator plus registry
//! from `(content_type, id)` to a concrete variant,
//! mirroring how `lcm-topology::load` embeds a default and allows
//! `LCM_INVENTORY_PATH` to override it.

use lcm_core::object::{ObjectClass, ObjectKey};
use lcm_core::oracle::ModelRegistry;
use lcm_core::power::Sockaddr;
use lcm_core::StatefulObject;
use lcm_monitor::{DeviceRegistry, PowerDevice};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

const DEFAULT_TOML: &str = include_str!("../default_inventory.toml");
pub const INVENTORY_PATH_ENV: &str = "LCM_INVENTORY_PATH";

#[derive(Debug, Error)]
pub enum InventoryLoadError {
    #[error("reading {path}: {source}")]
    Io { path: String, source: std::io::Error },
    #[error("parsing {path}: {source}")]
    Parse { path: String, source: toml::de::Error },
    #[error("parsing embedded default inventory: {0}")]
    ParseDefault(toml::de::Error),
    #[error("object class {0:?} is not a recognized class name")]
    UnknownClass(String),
}

#[derive(Debug, Clone, Deserialize, Serialize)]
struct ObjectEntry {
    class: String,
    id: String,
    state: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
struct PowerDeviceEntry {
    id: String,
    host: String,
    port: u16,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
struct InventoryConfig {
    #[serde(default)]
    objects: Vec<ObjectEntry>,
    #[serde(default)]
    power_devices: Vec<PowerDeviceEntry>,
}

pub fn load_from_env() -> Result<InventorySource, InventoryLoadError> {
    match std::env::var(INVENTORY_PATH_ENV) {
        Ok(path) => load_from_path(&path),
        Err(_) => load_default(),
    }
}

pub fn load_default() -> Result<InventorySource, InventoryLoadError> {
    let config: InventoryConfig = toml::from_str(DEFAULT_TOML).map_err(InventoryLoadError::ParseDefault)?;
    InventorySource::from_config(config)
}

fn load_from_path(path: &str) -> Result<InventorySource, InventoryLoadError> {
    let contents = std::fs::read_to_string(path)
        .map_err(|source| InventoryLoadError::Io { path: path.to_string(), source })?;
    let config: InventoryConfig =
        toml::from_str(&contents).map_err(|source| InventoryLoadError::Parse { path: path.to_string(), source })?;
    InventorySource::from_config(config)
}

/// A stateful object whose committed state is the inventory's own field,
/// mutated only through [`InventorySource::commit_state`] (called once a
/// transition's job reaches a terminal state — out of scope here, since
/// job completion is the external runner's job).
#[derive(Debug, Clone)]
struct SimpleObject {
    key: ObjectKey,
    state: String,
}

impl StatefulObject for SimpleObject {
    fn key(&self) -> ObjectKey {
        self.key.clone()
    }

    fn state(&self) -> &str {
        &self.state
    }

    fn states(&self) -> &'static [&'static str] {
        class_states(self.key.class)
    }
}

/// In-memory, mutable object + power-device inventory, implementing both
/// [`ModelRegistry`] (for the planner) and [`DeviceRegistry`] (for the
/// monitor supervisor) over the same seed data.
pub struct InventorySource {
    objects: RwLock<HashMap<ObjectKey, SimpleObject>>,
    power_devices: Vec<PowerDevice>,
}

impl InventorySource {
    fn from_config(config: InventoryConfig) -> Result<Self, InventoryLoadError> {
        let mut objects = HashMap::new();
        for entry in config.objects {
            let class = ObjectClass::parse(&entry.class).ok_or(InventoryLoadError::UnknownClass(entry.class))?;
            let key = ObjectKey::new(class, entry.id);
            objects.insert(key.clone(), SimpleObject { key, state: entry.state });
        }

        let power_devices = config
            .power_devices
            .into_iter()
            .map(|d| PowerDevice {
                object: ObjectKey::new(ObjectClass::PowerDevice, d.id),
                sockaddr: Sockaddr::new(d.host, d.port),
            })
            .collect();

        Ok(Self { objects: RwLock::new(objects), power_devices })
    }

    /// Record that `object` has committed to `new_state`. Called by the CLI
    /// once an external runner reports a job complete; this crate never
    /// calls it on its own; job execution is an external runner's job.
    pub fn commit_state(&self, object: &ObjectKey, new_state: &str) {
        if let Some(entry) = self.objects.write().get_mut(object) {
            entry.state = new_state.to_string();
        }
    }
}

impl ModelRegistry for InventorySource {
    fn resolve(&self, key: &ObjectKey) -> Option<Arc<dyn StatefulObject>> {
        self.objects.read().get(key).cloned().map(|obj| Arc::new(obj) as Arc<dyn StatefulObject>)
    }
}

impl DeviceRegistry for InventorySource {
    fn devices(&self) -> Vec<PowerDevice> {
        self.power_devices.clone()
    }
}

const HOST_STATES: &[&str] = &["lnet_down", "lnet_up"];
const TARGET_STATES: &[&str] = &["unformatted", "formatted", "registered", "unmounted", "mounted"];
const FILESYSTEM_STATES: &[&str] = &["stopped", "available"];
const POWER_DEVICE_STATES: &[&str] = &["off", "on"];
const CONFIG_PARAM_STATES: &[&str] = &["unset", "set"];

fn class_states(class: ObjectClass) -> &'static [&'static str] {
    match class {
        ObjectClass::Host => HOST_STATES,
        ObjectClass::Target => TARGET_STATES,
        ObjectClass::Filesystem => FILESYSTEM_STATES,
        ObjectClass::PowerDevice => POWER_DEVICE_STATES,
        ObjectClass::ConfigParam => CONFIG_PARAM_STATES,
    }
}
