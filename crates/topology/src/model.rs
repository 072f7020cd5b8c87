// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Serde shapes for the TOML-backed topology registry.

use lcm_core::depend::FixState;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TopologyConfig {
    pub classes: std::collections::HashMap<String, ClassConfig>,
    #[serde(default)]
    pub dependencies: Vec<DependencyConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClassConfig {
    pub states: Vec<String>,
    #[serde(default)]
    pub routes: Vec<RouteConfig>,
}

/// One registered atomic hop: `from -> to` via `job_class`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    pub from: String,
    pub to: String,
    pub job_class: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObjectKeyConfig {
    pub class: String,
    pub id: String,
}

/// A single dependency entry, keyed by `(object, on)`.
///
/// `on` is either a state name (serving `deps_of_state(object, state)`, used
/// both for the new-state's own prerequisites and, symmetrically, as the
/// dependency examined when `object` is a reverse dependent of some other
/// transitioning object) or `job:<job_class>` (serving
/// `deps_of_job(job_class, object)`).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DependencyConfig {
    pub object: ObjectKeyConfig,
    pub on: String,
    pub depends_on: ObjectKeyConfig,
    pub acceptable_states: Vec<String>,
    pub preferred_state: String,
    #[serde(default)]
    pub fix_state: Option<FixStateConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FixStateConfig {
    Literal { value: String },
    Table { entries: std::collections::HashMap<String, String> },
}

impl From<FixStateConfig> for FixState {
    fn from(cfg: FixStateConfig) -> Self {
        match cfg {
            FixStateConfig::Literal { value } => FixState::Literal(value),
            FixStateConfig::Table { entries } => FixState::Table(entries),
        }
    }
}

pub(crate) fn job_key(job_class: &str) -> String {
    format!("job:{job_class}")
}
