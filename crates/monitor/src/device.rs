// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The configured set of power devices. Read-only from the worker's point of
//! view; the supervisor alone decides when a device appears or disappears.

use lcm_core::object::ObjectKey;
use lcm_core::power::Sockaddr;

/// A power device the supervisor should keep a worker running for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PowerDevice {
    pub object: ObjectKey,
    pub sockaddr: Sockaddr,
}

/// Source of truth for which devices are currently configured.
///
/// Implemented by the storage/CLI layer (cf. `lcm_core::oracle::ModelRegistry`)
/// so the monitor stays agnostic of how devices are actually persisted.
pub trait DeviceRegistry: Send + Sync {
    fn devices(&self) -> Vec<PowerDevice>;
}
