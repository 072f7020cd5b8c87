// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Loading the topology registry: an embedded default, overridable by
//! `LCM_TOPOLOGY_PATH`.

use crate::error::TopologyLoadError;
use crate::model::TopologyConfig;

const DEFAULT_TOML: &str = include_str!("../default.toml");

pub const TOPOLOGY_PATH_ENV: &str = "LCM_TOPOLOGY_PATH";

/// Parse the registry embedded at build time.
pub fn load_default() -> Result<TopologyConfig, TopologyLoadError> {
    toml::from_str(DEFAULT_TOML).map_err(TopologyLoadError::ParseDefault)
}

/// Load from `LCM_TOPOLOGY_PATH` if set, otherwise fall back to the embedded
/// default. This is the entry point `lcm-cli` and test harnesses use.
pub fn load_from_env() -> Result<TopologyConfig, TopologyLoadError> {
    match std::env::var(TOPOLOGY_PATH_ENV) {
        Ok(path) => load_from_path(&path),
        Err(_) => load_default(),
    }
}

pub fn load_from_path(path: &str) -> Result<TopologyConfig, TopologyLoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| TopologyLoadError::Io {
        path: path.to_string(),
        source,
    })?;
    toml::from_str(&contents).map_err(|source| TopologyLoadError::Parse {
        path: path.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_topology_parses() {
        let config = load_default().expect("embedded default must parse");
        assert!(config.classes.contains_key("host"));
        assert!(config.classes.contains_key("target"));
    }

    #[test]
    fn load_from_path_reads_override_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("topology.toml");
        std::fs::write(
            &path,
            r#"
            [classes.host]
            states = ["down", "up"]
            [[classes.host.routes]]
            from = "down"
            to = "up"
            job_class = "boot_host"
            "#,
        )
        .expect("write override");

        let config = load_from_path(path.to_str().expect("utf8 path")).expect("parse override");
        assert_eq!(config.classes["host"].states, vec!["down", "up"]);
    }
}
