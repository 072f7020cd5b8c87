// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `Unavailable` alert: one boolean per device, raised or cleared on
//! every probe. Shared across all workers; updates are atomic per device.

use lcm_core::power::Sockaddr;
use parking_lot::Mutex;
use std::collections::HashMap;
use tracing::{info, warn};

/// Atomic per-device alert state. Cheap to clone-share via `Arc`.
#[derive(Debug, Default)]
pub struct AlertStore {
    unavailable: Mutex<HashMap<Sockaddr, bool>>,
}

impl AlertStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the result of an availability probe. Only logs on a state
    /// transition, matching the original's `Alert.notify` dedup behavior —
    /// a device that stays unavailable across many 10s cycles logs once.
    pub fn notify(&self, device: &Sockaddr, unavailable: bool) {
        let mut state = self.unavailable.lock();
        let was_unavailable = state.insert(device.clone(), unavailable).unwrap_or(false);
        if unavailable && !was_unavailable {
            warn!(%device, "power device unavailable, raising alert");
        } else if !unavailable && was_unavailable {
            info!(%device, "power device available again, clearing alert");
        }
    }

    pub fn is_unavailable(&self, device: &Sockaddr) -> bool {
        self.unavailable.lock().get(device).copied().unwrap_or(false)
    }

    /// Release any alert state tied to a worker's task context. Called when
    /// a worker exits so a stale alert doesn't linger for a removed device.
    pub fn release(&self, device: &Sockaddr) {
        self.unavailable.lock().remove(device);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sockaddr() -> Sockaddr {
        Sockaddr::new("pdu-1", 23)
    }

    #[test]
    fn notify_unavailable_then_available_round_trips() {
        let alerts = AlertStore::new();
        assert!(!alerts.is_unavailable(&sockaddr()));

        alerts.notify(&sockaddr(), true);
        assert!(alerts.is_unavailable(&sockaddr()));

        alerts.notify(&sockaddr(), false);
        assert!(!alerts.is_unavailable(&sockaddr()));
    }

    #[test]
    fn release_drops_the_device_entirely() {
        let alerts = AlertStore::new();
        alerts.notify(&sockaddr(), true);
        alerts.release(&sockaddr());
        assert!(!alerts.is_unavailable(&sockaddr()));
    }
}
