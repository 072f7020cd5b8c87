// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the monitor crate: one
//! function per variable, each with its own documented default.

use std::time::Duration;

const DEFAULT_RECONCILE_MS: u64 = 10_000;
const DEFAULT_PROBE_MS: u64 = 10_000;

/// Monitor-level configuration resolved from the process environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// How often the supervisor reconciles the live worker set against the
    /// configured device set. Overridable via `LCM_MONITOR_RECONCILE_MS`.
    pub reconcile_interval: Duration,
    /// How long each worker sleeps between availability probes, bounded on
    /// its stop signal. Overridable via `LCM_MONITOR_PROBE_MS`.
    pub probe_interval: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            reconcile_interval: duration_var("LCM_MONITOR_RECONCILE_MS", DEFAULT_RECONCILE_MS),
            probe_interval: duration_var("LCM_MONITOR_PROBE_MS", DEFAULT_PROBE_MS),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self { reconcile_interval: Duration::from_millis(DEFAULT_RECONCILE_MS), probe_interval: Duration::from_millis(DEFAULT_PROBE_MS) }
    }
}

fn duration_var(name: &str, default_ms: u64) -> Duration {
    std::env::var(name).ok().and_then(|s| s.parse::<u64>().ok()).map(Duration::from_millis).unwrap_or(Duration::from_millis(default_ms))
}
